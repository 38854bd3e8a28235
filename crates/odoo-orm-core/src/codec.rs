//! Conversion between raw wire values and local [`Value`]s, driven by the
//! declared [`Type`] of each field.

use crate::stmt::{Type, Value};
use crate::{err, Error, Json, Result};

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Map, Number};

/// The server's date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The server's datetime format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    date_format: String,
    datetime_format: String,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DATE_FORMAT, DATETIME_FORMAT)
    }
}

impl Codec {
    pub fn new(date_format: impl Into<String>, datetime_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            datetime_format: datetime_format.into(),
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }

    /// Decodes a raw wire value as `ty`.
    pub fn decode(&self, ty: &Type, raw: &Json) -> Result<Value> {
        match ty {
            Type::Union(_) => {
                let Some((inner, sentinel)) = ty.as_optional()? else {
                    return Ok(Value::from_json(raw));
                };

                if sentinel.matches(raw) {
                    Ok(Value::Absent(sentinel))
                } else {
                    self.decode(inner, raw)
                }
            }
            Type::Null | Type::False => Ok(Value::from_json(raw)),
            Type::Date => match raw {
                Json::String(s) => self.parse_date(s).map(Value::Date),
                _ => Err(Error::type_conversion(Value::from_json(raw), "Date")),
            },
            Type::DateTime => match raw {
                Json::String(s) => self.parse_datetime(s).map(Value::DateTime),
                _ => Err(Error::type_conversion(Value::from_json(raw), "DateTime")),
            },
            Type::List(item) => match raw {
                Json::Array(items) => items
                    .iter()
                    .map(|raw| self.decode(item, raw))
                    .collect::<Result<_>>()
                    .map(Value::List),
                _ => Err(Error::type_conversion(Value::from_json(raw), "List")),
            },
            Type::Map(key_ty, value_ty) => match raw {
                Json::Object(map) => map
                    .iter()
                    .map(|(key, raw)| -> Result<(Value, Value)> {
                        Ok((self.decode_key(key_ty, key)?, self.decode(value_ty, raw)?))
                    })
                    .collect::<Result<_>>()
                    .map(Value::Map),
                _ => Err(Error::type_conversion(Value::from_json(raw), "Map")),
            },
            Type::Any => Ok(Value::Json(raw.clone())),
            Type::Bool | Type::I64 | Type::F64 | Type::String => Ok(decode_primitive(ty, raw)),
        }
    }

    /// Encodes a local value as `ty` for the wire.
    pub fn encode(&self, ty: &Type, value: &Value) -> Result<Json> {
        match ty {
            Type::Union(_) => {
                let Some((inner, sentinel)) = ty.as_optional()? else {
                    return Ok(self.encode_untyped(value));
                };

                if value.is_absent() {
                    Ok(sentinel.to_json())
                } else {
                    self.encode(inner, value)
                }
            }
            Type::Date => match value {
                Value::Date(date) => Ok(Json::String(date.format(&self.date_format).to_string())),
                Value::String(_) | Value::Absent(_) => Ok(self.encode_untyped(value)),
                _ => Err(Error::type_conversion(value.clone(), "Date")),
            },
            Type::DateTime => match value {
                Value::DateTime(datetime) => Ok(Json::String(
                    datetime.format(&self.datetime_format).to_string(),
                )),
                Value::String(_) | Value::Absent(_) => Ok(self.encode_untyped(value)),
                _ => Err(Error::type_conversion(value.clone(), "DateTime")),
            },
            Type::List(item) => match value {
                Value::List(items) => items
                    .iter()
                    .map(|value| self.encode(item, value))
                    .collect::<Result<_>>()
                    .map(Json::Array),
                Value::Absent(sentinel) => Ok(sentinel.to_json()),
                _ => Err(Error::type_conversion(value.clone(), "List")),
            },
            Type::Map(key_ty, value_ty) => match value {
                Value::Map(pairs) => {
                    let mut map = Map::new();
                    for (key, value) in pairs {
                        map.insert(self.encode_key(key_ty, key)?, self.encode(value_ty, value)?);
                    }
                    Ok(Json::Object(map))
                }
                Value::Absent(sentinel) => Ok(sentinel.to_json()),
                _ => Err(Error::type_conversion(value.clone(), "Map")),
            },
            _ => Ok(self.encode_untyped(value)),
        }
    }

    /// Encodes a value without type guidance.
    pub fn encode_untyped(&self, value: &Value) -> Json {
        match value {
            Value::Absent(sentinel) => sentinel.to_json(),
            Value::Bool(v) => Json::Bool(*v),
            Value::I64(v) => Json::Number((*v).into()),
            Value::F64(v) => Number::from_f64(*v).map(Json::Number).unwrap_or(Json::Null),
            Value::String(v) => Json::String(v.clone()),
            Value::Date(date) => Json::String(date.format(&self.date_format).to_string()),
            Value::DateTime(datetime) => {
                Json::String(datetime.format(&self.datetime_format).to_string())
            }
            Value::List(items) => {
                Json::Array(items.iter().map(|item| self.encode_untyped(item)).collect())
            }
            Value::Map(pairs) => Json::Object(
                pairs
                    .iter()
                    .map(|(key, value)| (self.key_string(key), self.encode_untyped(value)))
                    .collect(),
            ),
            Value::Json(raw) => raw.clone(),
        }
    }

    pub fn parse_date(&self, s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s, &self.date_format)
            .map_err(|e| Error::from(e).context(err!("invalid date {s:?}")))
    }

    pub fn parse_datetime(&self, s: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, &self.datetime_format)
            .map_err(|e| Error::from(e).context(err!("invalid datetime {s:?}")))
    }

    // Object keys are always strings on the wire.
    fn decode_key(&self, ty: &Type, key: &str) -> Result<Value> {
        match ty.value_ty() {
            Type::I64 => key
                .parse()
                .map(Value::I64)
                .map_err(|_| Error::type_conversion(Value::String(key.to_string()), "I64")),
            Type::String | Type::Any => Ok(Value::String(key.to_string())),
            ty => self.decode(ty, &Json::String(key.to_string())),
        }
    }

    fn encode_key(&self, ty: &Type, key: &Value) -> Result<String> {
        match self.encode(ty, key)? {
            Json::String(s) => Ok(s),
            Json::Array(_) | Json::Object(_) => {
                Err(Error::type_conversion(key.clone(), "map key"))
            }
            raw => Ok(raw.to_string()),
        }
    }

    fn key_string(&self, key: &Value) -> String {
        match self.encode_untyped(key) {
            Json::String(s) => s,
            raw => raw.to_string(),
        }
    }
}

/// Primitives pass through unmodified when the wire value does not have the
/// declared shape (e.g. `false` for an empty char field).
fn decode_primitive(ty: &Type, raw: &Json) -> Value {
    match (ty, raw) {
        (Type::Bool, Json::Bool(v)) => Value::Bool(*v),
        (Type::I64, Json::Number(n)) if n.is_i64() => Value::I64(n.as_i64().unwrap_or_default()),
        (Type::F64, Json::Number(n)) => n
            .as_f64()
            .map(Value::F64)
            .unwrap_or_else(|| Value::from_json(raw)),
        (Type::String, Json::String(s)) => Value::String(s.clone()),
        _ => Value::from_json(raw),
    }
}
