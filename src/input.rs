//! Input files - parameter trees and scopes from JSON or YAML
//!
//! `.yaml`/`.yml` files are read as YAML, everything else as JSON.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ParamsError, Result};
use crate::params::ParamValue;
use crate::template::{Namespace, VariableScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parse text in the given format into a JSON value
pub fn parse_value(text: &str, format: InputFormat, origin: &str) -> Result<Value> {
    let parsed: std::result::Result<Value, String> = match format {
        InputFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        InputFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|details| ParamsError::ParseError {
        path: origin.to_string(),
        details,
    })
}

fn read_value(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(ParamsError::InputNotFound {
            path: path.display().to_string(),
        });
    }

    let format = InputFormat::from_path(path);
    debug!(path = %path.display(), ?format, "reading input");
    let text = fs::read_to_string(path)?;
    parse_value(&text, format, &path.display().to_string())
}

/// Load a parameter tree from file
pub fn load_params(path: &Path) -> Result<ParamValue> {
    read_value(path).map(ParamValue::from)
}

/// Load a variable scope from file; a missing path means an empty scope
pub fn load_scope(path: Option<&Path>, namespace: Namespace) -> Result<VariableScope> {
    match path {
        Some(path) => VariableScope::from_value(namespace, read_value(path)?),
        None => Ok(VariableScope::new()),
    }
}
