//! Types module: defines field kinds and the values read out of records.
//!
//! Every field read is coerced into a [`FieldValue`] before comparison. Comparators
//! only ever look at the value's text form and reparse it when they need a number.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    /// Running time stored in nanoseconds.
    Duration,
    /// Float rating on a 0-1 scale, -1 when unrated.
    Rating,
}

impl FieldKind {
    /// Whether search text against this kind is parsed as an integer operand.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Duration)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Duration => "duration",
            FieldKind::Rating => "rating",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// The textual form comparators operate on.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Integer(i) => Cow::Owned(i.to_string()),
            FieldValue::Float(v) => Cow::Owned(v.to_string()),
        }
    }

    /// Whether a value of this shape may be stored in a field of `kind`.
    pub fn fits(&self, kind: FieldKind) -> bool {
        match (self, kind) {
            (FieldValue::Text(_), FieldKind::Text) => true,
            (FieldValue::Integer(_), FieldKind::Integer | FieldKind::Duration) => true,
            (FieldValue::Float(_), FieldKind::Rating) => true,
            _ => false,
        }
    }

    /// The value an absent field reads as.
    pub fn empty_of(kind: FieldKind) -> FieldValue {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Integer | FieldKind::Duration => FieldValue::Integer(0),
            FieldKind::Rating => FieldValue::Float(-1.0),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Integer(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Integer(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f32> for FieldValue {
    // Widen through the shortest decimal form so 0.8f32 reads as 0.8, not 0.800000011920929.
    fn from(v: f32) -> Self {
        FieldValue::Float(v.to_string().parse().unwrap_or_else(|_| f64::from(v)))
    }
}
