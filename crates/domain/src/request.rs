//! Request bodies: string keys mapped to arbitrary JSON values.

use fieldcheck_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Parsed request body. Read-only from the checkers' point of view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestBody(Map<String, Value>);

impl RequestBody {
    /// Empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document whose top level must be an object.
    pub fn from_json_str(input: &str) -> Result<Self, RequestBodyError> {
        let value: Value = serde_json::from_str(input)
            .map_err(|error| RequestBodyError::InvalidJson(error.to_string()))?;
        Self::try_from(value)
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true when `key` is present (even if its value is `null`).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the body has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RequestBody {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for RequestBody {
    type Error = RequestBodyError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(RequestBodyError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RequestBody {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Request body could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBodyError {
    /// Input is not valid JSON.
    InvalidJson(String),
    /// Input is valid JSON but not an object.
    NotAnObject {
        /// JSON type found at the top level.
        found: &'static str,
    },
}

impl fmt::Display for RequestBodyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson(reason) => write!(formatter, "invalid request JSON: {reason}"),
            Self::NotAnObject { found } => {
                write!(formatter, "request body must be a JSON object, found {found}")
            },
        }
    }
}

impl std::error::Error for RequestBodyError {}

impl From<RequestBodyError> for ErrorEnvelope {
    fn from(error: RequestBodyError) -> Self {
        match &error {
            RequestBodyError::InvalidJson(_) => {
                Self::expected(ErrorCode::new("request", "invalid_json"), error.to_string())
            },
            RequestBodyError::NotAnObject { found } => {
                Self::expected(ErrorCode::new("request", "not_an_object"), error.to_string())
                    .with_metadata("found", *found)
            },
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_bodies() -> Result<(), RequestBodyError> {
        let body = RequestBody::from_json_str(r#"{"name":"Al","age":3,"nick":null}"#)?;
        assert_eq!(body.len(), 3);
        assert_eq!(body.get("name"), Some(&Value::from("Al")));
        assert!(body.contains_key("nick"));
        assert!(!body.contains_key("email"));
        Ok(())
    }

    #[test]
    fn rejects_non_object_bodies() {
        let error = RequestBody::from_json_str("[1,2]").err();
        assert_eq!(error, Some(RequestBodyError::NotAnObject { found: "array" }));

        let error = RequestBody::from_json_str("{").err();
        assert!(matches!(error, Some(RequestBodyError::InvalidJson(_))));
    }

    #[test]
    fn collects_from_pairs() {
        let body: RequestBody = [("name", "Al"), ("city", "")].into_iter().collect();
        assert_eq!(body.get("city"), Some(&Value::from("")));
        assert!(!body.is_empty());
    }
}
