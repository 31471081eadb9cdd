//! Parameter Tree - the closed set of values an action parameter can hold
//!
//! Mirrors JSON plus `Absent`, which stands for a declared-but-undefined field.
//! Absent record entries are dropped on serialization, absent sequence items
//! serialize as `null` (the same thing JSON.stringify does with `undefined`).

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

/// One node of a parameter tree
///
/// Records keep insertion order so rendered output is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum ParamValue {
    /// Field present in the record but undefined
    #[default]
    Absent,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<ParamValue>),
    Record(IndexMap<String, ParamValue>),
}

impl ParamValue {
    /// Build a record from key/value pairs, keeping their order
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, ParamValue)>) -> Self {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Field of a record, None for any other kind
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        match self {
            Self::Record(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Kind name for logs and diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Record(_) => "record",
        }
    }

    /// Every string leaf, depth-first in field order
    pub fn strings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_strings(&mut out);
        out
    }

    fn collect_strings<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::String(s) => out.push(s.as_str()),
            Self::Sequence(items) => items.iter().for_each(|v| v.collect_strings(out)),
            Self::Record(fields) => fields.values().for_each(|v| v.collect_strings(out)),
            Self::Absent | Self::Null | Self::Bool(_) | Self::Number(_) => {}
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Record(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Absent | ParamValue::Null => Value::Null,
            ParamValue::Bool(b) => Value::Bool(b),
            ParamValue::Number(n) => Value::Number(n),
            ParamValue::String(s) => Value::String(s),
            ParamValue::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            ParamValue::Record(fields) => Value::Object(
                fields
                    .into_iter()
                    .filter(|(_, v)| !v.is_absent())
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent | Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => serializer.collect_seq(items),
            Self::Record(fields) => {
                let present = fields.values().filter(|v| !v.is_absent()).count();
                let mut map = serializer.serialize_map(Some(present))?;
                for (key, value) in fields.iter().filter(|(_, v)| !v.is_absent()) {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
