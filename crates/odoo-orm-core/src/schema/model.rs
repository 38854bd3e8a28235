use super::{Field, FieldMapping, Relation};

use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Local name the model is registered under
    pub name: String,

    /// Name of the model on the server (e.g. `res.partner`)
    pub remote_name: String,

    /// Declared fields, in declaration order
    pub fields: IndexMap<String, Field>,

    /// Fields read when a caller does not choose any. `None` reads all.
    pub default_fields: Option<Vec<String>>,

    /// Per-server-version field renaming
    pub mapping: FieldMapping,

    /// Model whose declarations this one extends
    pub base: Option<ModelId>,

    /// Whether undeclared names fall through to the raw payload
    pub passthrough: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

impl Model {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn relations(&self) -> impl Iterator<Item = (&Field, &Relation)> + '_ {
        self.fields
            .values()
            .filter_map(|field| field.as_relation().map(|relation| (field, relation)))
    }

    /// Returns `true` if `self` is `other` or extends it.
    pub fn is_a(&self, other: ModelId, schema: &super::Schema) -> bool {
        let mut current = Some(self.id);
        while let Some(id) = current {
            if id == other {
                return true;
            }
            current = schema.model(id).base;
        }
        false
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
