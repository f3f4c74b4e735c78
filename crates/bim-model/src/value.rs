//! Scalar attribute values carried by asset records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// Sources disagree on typing (a sheet exported to CSV has only text, the
/// Maximo export carries numbers), so the variant is kept as loaded. Whether
/// `Number(0.0)` and `Text("0")` count as equal is decided by the comparison
/// policy, not here.
///
/// `Number` is expected to hold a finite value; loaders and `From<f64>` never
/// produce NaN or infinities. A hand-built `Number(f64::NAN)` is unequal to
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// True for `Null` and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(value) => value.trim().is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// Render for tabular output. `Null` renders as an empty cell.
    pub fn render(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Non-finite numbers become `Null`, as they do when written to JSON.
impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            FieldValue::Number(value)
        } else {
            FieldValue::Null
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}
