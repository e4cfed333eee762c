//! Pipeline parameter types
//!
//! A [`ParameterSet`] holds the caller's values as raw JSON until submission.
//! Conversion into the typed [`ParameterValue`] happens when parameters are
//! marshaled for the orchestration service, so a bad value surfaces as a
//! submission-time failure rather than a validation one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Parameter that is always handed to the pipeline
pub const EMAIL_ADDRESSES_KEY: &str = "email_addresses";

/// Placeholder recipient used when the caller supplies none
pub const DEFAULT_EMAIL_ADDRESS: &str = "dummy@example.com";

/// Named pipeline inputs, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, JsonValue>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.0.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    /// Inserts the placeholder recipient list unless one is already present
    pub fn ensure_email_addresses(&mut self) {
        if !self.contains(EMAIL_ADDRESSES_KEY) {
            self.insert(
                EMAIL_ADDRESSES_KEY,
                JsonValue::Array(vec![JsonValue::String(DEFAULT_EMAIL_ADDRESS.to_string())]),
            );
        }
    }

    /// Copies every entry of `overrides` into the set, replacing existing names
    pub fn merge_overriding<'a>(
        &mut self,
        overrides: impl IntoIterator<Item = (&'a String, &'a JsonValue)>,
    ) {
        for (name, value) in overrides {
            self.0.insert(name.clone(), value.clone());
        }
    }
}

impl FromIterator<(String, JsonValue)> for ParameterSet {
    fn from_iter<T: IntoIterator<Item = (String, JsonValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A parameter value the orchestration service can accept
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    String(String),
    Int(i64),
    Float(f64),
    /// Non-empty list of strings
    List(Vec<String>),
}

/// Raised for JSON values with no [`ParameterValue`] counterpart
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported parameter type: {type_name}")]
pub struct UnsupportedParameterType {
    pub type_name: String,
}

impl UnsupportedParameterType {
    fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl TryFrom<&JsonValue> for ParameterValue {
    type Error = UnsupportedParameterType;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::String(s) => Ok(ParameterValue::String(s.clone())),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ParameterValue::Int(i))
                } else if n.is_u64() {
                    Err(UnsupportedParameterType::new("integer out of range"))
                } else {
                    n.as_f64()
                        .map(ParameterValue::Float)
                        .ok_or_else(|| UnsupportedParameterType::new("number"))
                }
            }
            JsonValue::Array(items) => {
                if items.is_empty() {
                    return Err(UnsupportedParameterType::new("empty list"));
                }
                items
                    .iter()
                    .map(|item| match item {
                        JsonValue::String(s) => Ok(s.clone()),
                        other => Err(UnsupportedParameterType::new(format!(
                            "list of {}",
                            json_type_name(other)
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(ParameterValue::List)
            }
            other => Err(UnsupportedParameterType::new(json_type_name(other))),
        }
    }
}

/// Human-readable JSON type name used in error messages
pub fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}
