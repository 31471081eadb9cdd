//! Variable scopes - `state` and `context` lookups
//!
//! Each render sees exactly two scopes. A reference selects one by namespace,
//! looks up its key, then walks any further segments into structured values
//! (object fields by name, array items by index).

use std::fmt;

use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::{ParamsError, Result};
use crate::util::constants::{CONTEXT_NAMESPACE, STATE_NAMESPACE};

use super::token::Reference;

/// The two recognized placeholder namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    State,
    Context,
}

impl Namespace {
    /// Parse a namespace name; anything but `state`/`context` is unknown
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            STATE_NAMESPACE => Some(Self::State),
            CONTEXT_NAMESPACE => Some(Self::Context),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::State => STATE_NAMESPACE,
            Self::Context => CONTEXT_NAMESPACE,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat name → value mapping for one namespace
///
/// Uses FxHashMap for faster hashing on small string keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableScope {
    vars: FxHashMap<String, Value>,
}

impl VariableScope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scope from a JSON object
    ///
    /// `null` yields an empty scope; any other non-object is rejected.
    pub fn from_value(namespace: Namespace, value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            Value::Null => Ok(Self::new()),
            other => Err(ParamsError::InvalidScope {
                namespace: namespace.to_string(),
                found: value_type(&other).to_string(),
            }),
        }
    }

    /// Set a variable, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for VariableScope {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Both scopes of one render
#[derive(Debug, Clone, Copy)]
pub struct Scopes<'a> {
    pub state: &'a VariableScope,
    pub context: &'a VariableScope,
}

impl<'a> Scopes<'a> {
    pub fn new(state: &'a VariableScope, context: &'a VariableScope) -> Self {
        Self { state, context }
    }

    pub fn scope(&self, namespace: Namespace) -> &'a VariableScope {
        match namespace {
            Namespace::State => self.state,
            Namespace::Context => self.context,
        }
    }

    /// Resolve a reference to a value
    ///
    /// Returns None for an unknown namespace, a missing key, a reference with
    /// no key, or a nested segment that does not exist.
    pub fn lookup(&self, reference: &Reference) -> Option<&'a Value> {
        let namespace = Namespace::parse(&reference.namespace)?;
        let (key, rest) = reference.path.split_first()?;
        let mut value = self.scope(namespace).get(key)?;

        for segment in rest {
            value = match (value, array_index(segment)) {
                (Value::Array(items), Some(idx)) => items.get(idx)?,
                (Value::Object(map), _) => map.get(segment.as_str())?,
                _ => return None,
            };
        }

        Some(value)
    }
}

/// Canonical decimal index: digits only, no leading zero except `0` itself
fn array_index(segment: &str) -> Option<usize> {
    let canonical = segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

/// JSON type name for diagnostics
fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
