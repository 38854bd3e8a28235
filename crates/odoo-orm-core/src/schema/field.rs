use super::{Projection, Relation};
use crate::stmt::Type;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Local field name
    pub name: String,

    /// Primitive, alias or relationship
    pub ty: FieldTy,
}

/// Exactly one of these applies to each declared field.
#[derive(Clone, PartialEq)]
pub enum FieldTy {
    /// Decoded through the value codec.
    Primitive(Type),

    /// Pure redirect to another local field.
    Alias(String),

    /// One projection of a remote reference field.
    Relation(Relation),
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<FieldTy>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn is_relation(&self) -> bool {
        self.ty.is_relation()
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        self.ty.as_relation()
    }

    /// Returns `true` for the projection that carries the raw reference
    /// (ids), which is the canonical local name of a remote reference field.
    pub fn is_reference_id(&self) -> bool {
        matches!(
            self.as_relation().map(|relation| relation.projection),
            Some(Projection::Id | Projection::Ids)
        )
    }
}

impl FieldTy {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(..))
    }

    pub fn as_primitive(&self) -> Option<&Type> {
        match self {
            Self::Primitive(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias(..))
    }

    pub fn as_alias(&self) -> Option<&str> {
        match self {
            Self::Alias(target) => Some(target),
            _ => None,
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Relation(..))
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_relation(&self) -> &Relation {
        match self {
            Self::Relation(relation) => relation,
            _ => panic!("expected relation field, but was {self:?}"),
        }
    }
}

impl From<Type> for FieldTy {
    fn from(value: Type) -> Self {
        Self::Primitive(value)
    }
}

impl From<Relation> for FieldTy {
    fn from(value: Relation) -> Self {
        Self::Relation(value)
    }
}

impl fmt::Debug for FieldTy {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => ty.fmt(fmt),
            Self::Alias(target) => write!(fmt, "Alias({target})"),
            Self::Relation(relation) => relation.fmt(fmt),
        }
    }
}
