use super::ModelId;
use crate::{stmt::Sentinel, Error, Result};

/// Describes one local projection of a remote reference field.
///
/// Several local fields may share the same `remote_field`: the id, the
/// display name and the related object are all read from one reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Remote field carrying the reference (`[id, name]`, `false` or `[ids]`)
    pub remote_field: String,

    /// Related model
    pub target: Target,

    /// What this local field exposes
    pub projection: Projection,

    /// How an absent singular reference reads back locally.
    pub absent: Sentinel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Whichever concrete model owns the field.
    SelfModel,

    /// A model referenced by local name, resolved when the schema is built.
    Named(String),

    /// A resolved model.
    Model(ModelId),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Projection {
    /// Singular reference: the related id.
    Id,

    /// Singular reference: the related record's display name.
    Name,

    /// Singular reference: the related record, fetched on first access.
    Object,

    /// Plural reference: the raw id list.
    Ids,

    /// Plural reference: the related records.
    Objects,
}

impl Relation {
    /// A singular reference (`many2one`), exposing the related id.
    pub fn many2one(remote_field: impl Into<String>, target: impl Into<Target>) -> Self {
        Self {
            remote_field: remote_field.into(),
            target: target.into(),
            projection: Projection::Id,
            absent: Sentinel::Null,
        }
    }

    /// A plural reference (`one2many`/`many2many`), exposing the raw ids.
    pub fn x2many(remote_field: impl Into<String>, target: impl Into<Target>) -> Self {
        Self {
            remote_field: remote_field.into(),
            target: target.into(),
            projection: Projection::Ids,
            absent: Sentinel::Null,
        }
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn absent(mut self, sentinel: Sentinel) -> Self {
        self.absent = sentinel;
        self
    }

    pub fn is_plural(&self) -> bool {
        self.projection.is_plural()
    }

    /// The related model, with `SelfModel` standing for `owner`.
    pub fn target_id(&self, owner: ModelId) -> Result<ModelId> {
        match &self.target {
            Target::SelfModel => Ok(owner),
            Target::Model(id) => Ok(*id),
            Target::Named(name) => Err(Error::invalid_schema(format!(
                "relationship target `{name}` was never resolved"
            ))),
        }
    }
}

impl Projection {
    pub fn is_plural(self) -> bool {
        matches!(self, Self::Ids | Self::Objects)
    }
}

impl Target {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Self::Named(value.to_string())
    }
}

impl From<String> for Target {
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

impl From<ModelId> for Target {
    fn from(value: ModelId) -> Self {
        Self::Model(value)
    }
}
