//! Template Module - placeholder substitution for string leaves
//!
//! - `token`: Tokenizer and cache (`Token`, `Reference`, `TemplateCache`)
//! - `scope`: The two variable scopes and dotted lookup (`VariableScope`, `Scopes`)
//! - `render`: Substitution, escaping and policies (`render`, `EscapePolicy`, `MissingPolicy`)
//!
//! Placeholder syntax:
//! ```text
//! {{context.key}}          escaped per EscapePolicy
//! {{ state.key }}          whitespace allowed
//! {{{context.key}}}        never escaped
//! {{context.alert.tags.0}} nested object field / array index
//! ```
//!
//! Data flow:
//! ```text
//! string leaf → TemplateCache::tokenize → [Literal | Placeholder]
//!                                              ↓
//!                               Scopes::lookup(reference)
//!                                  ↓                 ↓
//!                              Some(value)          None
//!                        value_to_string + escape   ""  (reported as unresolved)
//! ```

mod render;
mod scope;
mod token;

pub use render::{render, value_to_string, EscapePolicy, MissingPolicy, RenderOptions, Rendered};
pub use scope::{Namespace, Scopes, VariableScope};
pub use token::{extract_refs, tokenize, Reference, TemplateCache, Token};

use crate::error::{ParamsError, Result};

/// Validate that every reference in a template uses a known namespace
///
/// Returns Err with the first unknown namespace.
pub fn validate_refs(template: &str) -> Result<()> {
    for reference in extract_refs(template) {
        if Namespace::parse(&reference.namespace).is_none() {
            return Err(ParamsError::UnknownNamespace {
                reference: reference.to_string(),
                namespace: reference.namespace,
            });
        }
    }
    Ok(())
}
