//! Scalar fact values.
//!
//! Facts are deliberately flat: a case under evaluation is a mapping from
//! string keys to one of four scalar kinds. Tags are symbolic enum values
//! that compare by exact identity only -- they never order.

use crate::error::ValidationError;

/// A typed scalar fact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Text(String),
    Tag(String),
}

impl Scalar {
    /// Returns a human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "Bool",
            Scalar::Int(_) => "Int",
            Scalar::Text(_) => "Text",
            Scalar::Tag(_) => "Tag",
        }
    }

    /// Extracts the integer value, if this is an Int.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Serialize to the canonical kind-tagged JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Bool(b) => serde_json::json!({ "kind": "bool_value", "value": b }),
            Scalar::Int(i) => serde_json::json!({ "kind": "int_value", "value": i }),
            Scalar::Text(t) => serde_json::json!({ "kind": "text_value", "value": t }),
            Scalar::Tag(t) => serde_json::json!({ "kind": "tag_value", "value": t }),
        }
    }

    /// Parse a scalar from JSON.
    ///
    /// Accepts both the kind-tagged canonical form and plain JSON values
    /// (bool, integer, string). Plain strings parse as Text; a Tag must be
    /// written kind-tagged, since JSON cannot distinguish the two.
    pub fn from_json(v: &serde_json::Value) -> Result<Scalar, ValidationError> {
        if let Some(obj) = v.as_object() {
            let kind = obj.get("kind").and_then(|k| k.as_str()).ok_or_else(|| {
                ValidationError::Malformed {
                    message: "scalar object missing 'kind' field".to_string(),
                }
            })?;
            let value = obj.get("value").ok_or_else(|| ValidationError::Malformed {
                message: format!("scalar '{}' missing 'value' field", kind),
            })?;
            return match kind {
                "bool_value" => value.as_bool().map(Scalar::Bool).ok_or_else(|| {
                    ValidationError::Malformed {
                        message: "bool_value requires a boolean 'value'".to_string(),
                    }
                }),
                "int_value" => value.as_i64().map(Scalar::Int).ok_or_else(|| {
                    ValidationError::Malformed {
                        message: "int_value requires an integer 'value'".to_string(),
                    }
                }),
                "text_value" => value
                    .as_str()
                    .map(|s| Scalar::Text(s.to_string()))
                    .ok_or_else(|| ValidationError::Malformed {
                        message: "text_value requires a string 'value'".to_string(),
                    }),
                "tag_value" => value
                    .as_str()
                    .map(|s| Scalar::Tag(s.to_string()))
                    .ok_or_else(|| ValidationError::Malformed {
                        message: "tag_value requires a string 'value'".to_string(),
                    }),
                other => Err(ValidationError::Malformed {
                    message: format!("unknown scalar kind: {}", other),
                }),
            };
        }
        if let Some(b) = v.as_bool() {
            return Ok(Scalar::Bool(b));
        }
        if let Some(i) = v.as_i64() {
            return Ok(Scalar::Int(i));
        }
        if let Some(s) = v.as_str() {
            return Ok(Scalar::Text(s.to_string()));
        }
        Err(ValidationError::Malformed {
            message: format!("cannot parse scalar from: {}", v),
        })
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
