//! Record type declarations.
//!
//! Models are declared with [`ModelBuilder`] and resolved together by
//! [`Builder::build`], so relationship targets may name models declared
//! later (or each other).

mod builder;
pub use builder::{Builder, ModelBuilder};

mod field;
pub use field::{Field, FieldTy};

mod filter;
pub use filter::Path;

pub mod mapping;
pub use mapping::{FieldMapping, Inverse, Version};

mod model;
pub use model::{Model, ModelId};

mod relation;
pub use relation::{Projection, Relation, Target};

mod translate;

use crate::{Error, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,

    /// Local model name to id
    names: HashMap<String, ModelId>,

    /// Remote model name to the first model registered for it
    remote_names: HashMap<String, ModelId>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        self.names.get(name).map(|id| self.model(*id))
    }

    pub fn model_by_remote_name(&self, remote_name: &str) -> Option<&Model> {
        self.remote_names.get(remote_name).map(|id| self.model(*id))
    }

    /// The model a relationship declared on `owner` points at.
    pub fn relation_target(&self, owner: ModelId, relation: &Relation) -> Result<&Model> {
        let id = relation.target_id(owner)?;
        self.models.get(&id).ok_or_else(|| {
            Error::invalid_schema(format!("relationship target {id:?} is not registered"))
        })
    }
}
