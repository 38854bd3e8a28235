use super::{Field, FieldMapping, FieldTy, Model, ModelId, Relation, Schema, Target, Version};
use crate::{stmt::Type, Error, Result};

use indexmap::IndexMap;
use std::collections::HashMap;

/// Declares one model.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    remote_name: String,
    fields: IndexMap<String, Field>,
    default_fields: Option<Vec<String>>,
    mapping: FieldMapping,
    extends: Option<String>,
    passthrough: Option<bool>,
}

/// Collects model declarations and resolves them into a [`Schema`].
#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<ModelBuilder>,
    passthrough: bool,
}

impl ModelBuilder {
    /// Starts a declaration. Every model has an integer `id` field.
    pub fn new(name: impl Into<String>, remote_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_name: remote_name.into(),
            fields: IndexMap::new(),
            default_fields: None,
            mapping: FieldMapping::default(),
            extends: None,
            passthrough: None,
        }
        .field("id", Type::I64)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(self, name: impl Into<String>, ty: impl Into<Type>) -> Self {
        self.declare(name.into(), FieldTy::Primitive(ty.into()))
    }

    pub fn alias(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.declare(name.into(), FieldTy::Alias(target.into()))
    }

    pub fn relation(self, name: impl Into<String>, relation: Relation) -> Self {
        self.declare(name.into(), FieldTy::Relation(relation))
    }

    pub fn default_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Renames `local` to `remote` on servers matching `version` (`"*"` for
    /// any version).
    pub fn map_field(
        mut self,
        version: impl Into<Version>,
        local: impl Into<String>,
        remote: impl Into<String>,
    ) -> Self {
        self.mapping.insert(version, local, remote);
        self
    }

    /// Inherits the fields, mapping and default projection of `base`.
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    /// Lets undeclared names read straight from the raw payload.
    pub fn passthrough(mut self, enabled: bool) -> Self {
        self.passthrough = Some(enabled);
        self
    }

    fn declare(mut self, name: String, ty: FieldTy) -> Self {
        self.fields.insert(name.clone(), Field { name, ty });
        self
    }
}

impl Builder {
    pub fn model(&mut self, model: ModelBuilder) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Default for models that do not set [`ModelBuilder::passthrough`].
    pub fn passthrough(&mut self, enabled: bool) -> &mut Self {
        self.passthrough = enabled;
        self
    }

    pub fn build(&self) -> Result<Schema> {
        // First pass: assign ids so every name is known before any
        // declaration is resolved.
        let mut names = HashMap::new();
        for (index, model) in self.models.iter().enumerate() {
            if names.insert(model.name.clone(), ModelId(index)).is_some() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` is registered more than once",
                    model.name
                )));
            }
        }

        let mut models = IndexMap::new();
        for index in 0..self.models.len() {
            let model = self.flatten(index, &names, &mut vec![])?;
            models.insert(model.id, model);
        }

        // Second pass: bind relationship targets.
        for model in models.values_mut() {
            for field in model.fields.values_mut() {
                let FieldTy::Relation(relation) = &mut field.ty else {
                    continue;
                };

                if let Target::Named(target) = &relation.target {
                    let Some(id) = names.get(target) else {
                        return Err(Error::invalid_schema(format!(
                            "field `{}.{}` references unknown model `{}`",
                            model.name, field.name, target
                        )));
                    };
                    relation.target = Target::Model(*id);
                }
            }
        }

        let mut remote_names = HashMap::new();
        for model in models.values() {
            remote_names
                .entry(model.remote_name.clone())
                .or_insert(model.id);
        }

        Ok(Schema {
            models,
            names,
            remote_names,
        })
    }

    /// Builds the model at `index` with everything inherited from its base
    /// chain applied underneath its own declarations.
    fn flatten(
        &self,
        index: usize,
        names: &HashMap<String, ModelId>,
        stack: &mut Vec<usize>,
    ) -> Result<Model> {
        let decl = &self.models[index];

        if stack.contains(&index) {
            let mut chain: Vec<_> = stack.iter().map(|i| self.models[*i].name.as_str()).collect();
            chain.push(&decl.name);
            return Err(Error::invalid_schema(format!(
                "inheritance cycle: {}",
                chain.join(" -> ")
            )));
        }

        let mut model = match &decl.extends {
            Some(base) => {
                let Some(base_id) = names.get(base) else {
                    return Err(Error::invalid_schema(format!(
                        "model `{}` extends unknown model `{}`",
                        decl.name, base
                    )));
                };

                stack.push(index);
                let mut model = self.flatten(base_id.0, names, stack)?;
                stack.pop();

                model.base = Some(*base_id);
                model
            }
            None => Model {
                id: ModelId(index),
                name: decl.name.clone(),
                remote_name: decl.remote_name.clone(),
                fields: IndexMap::new(),
                default_fields: None,
                mapping: FieldMapping::default(),
                base: None,
                passthrough: self.passthrough,
            },
        };

        model.id = ModelId(index);
        model.name = decl.name.clone();
        model.remote_name = decl.remote_name.clone();

        for (name, field) in &decl.fields {
            model.fields.insert(name.clone(), field.clone());
        }

        model.mapping.merge(&decl.mapping);

        if decl.default_fields.is_some() {
            model.default_fields = decl.default_fields.clone();
        }

        if let Some(passthrough) = decl.passthrough {
            model.passthrough = passthrough;
        }

        Ok(model)
    }
}
