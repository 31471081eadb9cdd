//! Params Module - action parameter trees and their transformation
//!
//! - `value`: The parameter tree (`ParamValue`)
//! - `transform`: Shape-preserving rendering (`transform_action_params`, `Transformer`)
//! - `refs`: Static reference extraction and namespace validation
//!
//! ```text
//! ParamValue ──walk──▶ String leaf ──template::render──▶ String leaf
//!      │                                                      │
//!      └── Absent/Null/Bool/Number ── cloned as-is ───────────┘
//! ```

mod refs;
mod transform;
mod value;

pub use refs::{collect_references, validate_references};
pub use transform::{transform_action_params, Transformed, Transformer};
pub use value::ParamValue;
