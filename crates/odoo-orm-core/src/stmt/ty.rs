use crate::{Error, Json, Result};

use std::fmt;

/// Semantic type of a declared field.
#[derive(Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    I64,
    F64,
    String,
    Date,
    DateTime,

    /// Homogeneous list; each element decodes with the inner type.
    List(Box<Type>),

    /// Mapping; keys and values decode independently.
    Map(Box<Type>, Box<Type>),

    /// Union of member types. Only `T` plus exactly one sentinel member is
    /// decodable; other shapes fail at decode time.
    Union(Vec<Type>),

    /// `null` as an absence sentinel (union member only).
    Null,

    /// Boolean `false` as an absence sentinel (union member only).
    False,

    /// Opaque value, passed through unmodified.
    Any,
}

/// The wire value a field uses to mean "no value".
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Sentinel {
    #[default]
    Null,
    False,
}

impl Type {
    pub fn list(item: impl Into<Type>) -> Self {
        Self::List(Box::new(item.into()))
    }

    pub fn map(key: impl Into<Type>, value: impl Into<Type>) -> Self {
        Self::Map(Box::new(key.into()), Box::new(value.into()))
    }

    /// `T` or `null`.
    pub fn optional(ty: impl Into<Type>) -> Self {
        Self::Union(vec![ty.into(), Self::Null])
    }

    /// `T` or `false`.
    pub fn or_false(ty: impl Into<Type>) -> Self {
        Self::Union(vec![ty.into(), Self::False])
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Element type of a list, `Any` for anything else.
    pub fn list_item(&self) -> &Type {
        static ANY: Type = Type::Any;

        match self {
            Self::List(item) => item,
            _ => &ANY,
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    /// For a union, split it into its value type and sentinel.
    ///
    /// Returns `Ok(None)` for non-union types and an invalid schema error for
    /// unions that are not exactly one type plus one sentinel.
    pub fn as_optional(&self) -> Result<Option<(&Type, Sentinel)>> {
        let Self::Union(members) = self else {
            return Ok(None);
        };

        let split = match &members[..] {
            [a, b] => match (a.sentinel(), b.sentinel()) {
                (None, Some(sentinel)) => Some((a, sentinel)),
                (Some(sentinel), None) => Some((b, sentinel)),
                _ => None,
            },
            _ => None,
        };

        match split {
            Some(split) => Ok(Some(split)),
            None => Err(Error::invalid_schema(format!(
                "unsupported union {self:?}; expected one type and one of Null or False"
            ))),
        }
    }

    /// Strips a well-formed optional wrapper.
    pub fn value_ty(&self) -> &Type {
        match self.as_optional() {
            Ok(Some((ty, _))) => ty,
            _ => self,
        }
    }

    fn sentinel(&self) -> Option<Sentinel> {
        match self {
            Self::Null => Some(Sentinel::Null),
            Self::False => Some(Sentinel::False),
            _ => None,
        }
    }
}

impl Sentinel {
    /// The wire representation of this sentinel.
    pub fn to_json(self) -> Json {
        match self {
            Self::Null => Json::Null,
            Self::False => Json::Bool(false),
        }
    }

    /// Returns `true` if `raw` is this sentinel.
    pub fn matches(self, raw: &Json) -> bool {
        match self {
            Self::Null => raw.is_null(),
            Self::False => matches!(raw, Json::Bool(false)),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => fmt.write_str("Bool"),
            Self::I64 => fmt.write_str("I64"),
            Self::F64 => fmt.write_str("F64"),
            Self::String => fmt.write_str("String"),
            Self::Date => fmt.write_str("Date"),
            Self::DateTime => fmt.write_str("DateTime"),
            Self::List(item) => write!(fmt, "List[{item:?}]"),
            Self::Map(key, value) => write!(fmt, "Map[{key:?}, {value:?}]"),
            Self::Union(members) => {
                fmt.write_str("Union[")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        fmt.write_str(", ")?;
                    }
                    member.fmt(fmt)?;
                }
                fmt.write_str("]")
            }
            Self::Null => fmt.write_str("Null"),
            Self::False => fmt.write_str("False"),
            Self::Any => fmt.write_str("Any"),
        }
    }
}
