// The #[error] attribute from thiserror uses struct fields via string interpolation,
// but Rust's unused_assignments lint doesn't recognize this.
#![allow(unused_assignments)]

//! Error Types with Error Codes
//!
//! Error code ranges:
//! - PARAMS-000-009: Input errors
//! - PARAMS-010-019: Template/reference errors
//! - PARAMS-020-029: Config errors
//! - PARAMS-030-039: IO/serialization errors
//!
//! Unresolved placeholders are NOT errors under the default
//! `MissingPolicy::Empty`; `UnresolvedReferences` only surfaces in strict mode.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParamsError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug, Diagnostic)]
pub enum ParamsError {
    // ═══════════════════════════════════════════
    // INPUT ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[PARAMS-001] Failed to parse '{path}': {details}")]
    #[diagnostic(
        code(action_params::parse_error),
        help("Check JSON/YAML syntax of the input file")
    )]
    ParseError { path: String, details: String },

    #[error("[PARAMS-002] Input file not found: {path}")]
    #[diagnostic(code(action_params::input_not_found), help("Check the file path exists"))]
    InputNotFound { path: String },

    #[error("[PARAMS-003] Scope '{namespace}' must be an object, got {found}")]
    #[diagnostic(
        code(action_params::invalid_scope),
        help("A variable scope is a flat mapping of name to value")
    )]
    InvalidScope { namespace: String, found: String },

    // ═══════════════════════════════════════════
    // TEMPLATE ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[PARAMS-010] {count} unresolved reference(s): {refs}")]
    #[diagnostic(
        code(action_params::unresolved_references),
        help("Provide the missing keys or render with the default 'empty' missing policy")
    )]
    UnresolvedReferences { count: usize, refs: String },

    #[error("[PARAMS-011] Unknown namespace '{namespace}' in '{{{{{reference}}}}}'")]
    #[diagnostic(code(action_params::unknown_namespace))]
    UnknownNamespace { namespace: String, reference: String },

    // ═══════════════════════════════════════════
    // CONFIG ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[PARAMS-020] Config error: {reason}")]
    ConfigError { reason: String },

    #[error("[PARAMS-021] Invalid value '{value}' for '{key}' (expected one of: {expected})")]
    InvalidConfigValue {
        key: String,
        value: String,
        expected: String,
    },

    // ═══════════════════════════════════════════
    // IO / SERIALIZATION ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[PARAMS-030] IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("[PARAMS-031] JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ParamsError {
    /// Stable error code, e.g. "PARAMS-010"
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParseError { .. } => "PARAMS-001",
            Self::InputNotFound { .. } => "PARAMS-002",
            Self::InvalidScope { .. } => "PARAMS-003",
            Self::UnresolvedReferences { .. } => "PARAMS-010",
            Self::UnknownNamespace { .. } => "PARAMS-011",
            Self::ConfigError { .. } => "PARAMS-020",
            Self::InvalidConfigValue { .. } => "PARAMS-021",
            Self::IoError(_) => "PARAMS-030",
            Self::JsonError(_) => "PARAMS-031",
        }
    }
}

impl FixSuggestion for ParamsError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ParamsError::ParseError { .. } => Some("Check JSON/YAML syntax: brackets, commas and quoting"),
            ParamsError::InputNotFound { .. } => Some("Check the file path and permissions"),
            ParamsError::InvalidScope { .. } => {
                Some("Pass a JSON object such as {\"value\": 42} for --state/--context")
            }
            ParamsError::UnresolvedReferences { .. } => {
                Some("Add the missing keys to the state/context scope, or drop --strict")
            }
            ParamsError::UnknownNamespace { .. } => {
                Some("Use {{state.key}} or {{context.key}} - only these namespaces exist")
            }
            ParamsError::ConfigError { .. } => {
                Some("Check ~/.config/action-params/config.toml for syntax errors")
            }
            ParamsError::InvalidConfigValue { .. } => Some("Use one of the listed values"),
            ParamsError::IoError(_) => Some("Check file path and permissions"),
            ParamsError::JsonError(_) => Some("Ensure input is valid JSON (try parsing with jq)"),
        }
    }
}
