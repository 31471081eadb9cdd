//! action-params - template rendering for alert action parameters
//!
//! ## Module Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        DOMAIN MODEL                          │
//! │  params/    ParamValue tree, Transformer, reference checks   │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       TEMPLATE ENGINE                        │
//! │  template/  Tokenizer + cache, scopes, render, escaping      │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       INFRASTRUCTURE                         │
//! │  input      JSON/YAML loading                                │
//! │  config     TOML config + env overrides                      │
//! │  util/      Constants                                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use action_params::{transform_action_params, ParamValue, VariableScope};
//! use serde_json::json;
//!
//! let params = ParamValue::from(json!({"message": "Value \"{{context.foo}}\" exists"}));
//! let mut context = VariableScope::new();
//! context.set("foo", "fooVal");
//!
//! let result = transform_action_params(&params, &VariableScope::new(), &context);
//! assert_eq!(result, ParamValue::from(json!({"message": "Value \"fooVal\" exists"})));
//! ```

// ═══════════════════════════════════════════════════════════════
// DOMAIN MODEL
// ═══════════════════════════════════════════════════════════════
pub mod params;

// ═══════════════════════════════════════════════════════════════
// TEMPLATE ENGINE
// ═══════════════════════════════════════════════════════════════
pub mod template;

// ═══════════════════════════════════════════════════════════════
// INFRASTRUCTURE / CROSS-CUTTING
// ═══════════════════════════════════════════════════════════════
pub mod config;
pub mod error;
pub mod input;
pub mod util;

// ═══════════════════════════════════════════════════════════════
// PUBLIC API RE-EXPORTS
// ═══════════════════════════════════════════════════════════════

pub use config::ParamsConfig;
pub use error::{FixSuggestion, ParamsError, Result};
pub use params::{
    collect_references, transform_action_params, validate_references, ParamValue, Transformed,
    Transformer,
};
pub use template::{
    EscapePolicy, MissingPolicy, Namespace, Reference, RenderOptions, Scopes, VariableScope,
};
