use super::Sentinel;
use crate::Json;

use chrono::{NaiveDate, NaiveDateTime};

/// A decoded, local field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value. Carries the sentinel the field declared so callers can tell
    /// a `None`-style field from a `false`-style one.
    Absent(Sentinel),

    Bool(bool),

    I64(i64),

    F64(f64),

    String(String),

    Date(NaiveDate),

    DateTime(NaiveDateTime),

    List(Vec<Value>),

    /// Ordered key/value pairs.
    Map(Vec<(Value, Value)>),

    /// Raw wire value kept as-is.
    Json(Json),
}

impl Default for Value {
    fn default() -> Self {
        Self::Absent(Sentinel::Null)
    }
}

impl Value {
    pub const fn null() -> Self {
        Self::Absent(Sentinel::Null)
    }

    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts a raw wire value without any schema guidance.
    pub fn from_json(raw: &Json) -> Self {
        match raw {
            Json::Null => Self::Absent(Sentinel::Null),
            Json::Bool(v) => Self::Bool(*v),
            Json::Number(n) => match n.as_i64() {
                Some(v) => Self::I64(v),
                None => n.as_f64().map(Self::F64).unwrap_or_else(|| Self::Json(raw.clone())),
            },
            Json::String(v) => Self::String(v.clone()),
            Json::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Json::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (Self::String(k.clone()), Self::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::I64(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Json> for Value {
    fn from(value: Json) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::null(),
        }
    }
}
