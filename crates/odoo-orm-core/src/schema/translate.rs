//! Local/remote field name translation.

use super::{Field, FieldTy, Inverse, Model};
use crate::{Error, Result};

impl Model {
    /// Follows alias redirects to a terminal field name.
    ///
    /// A name that is not declared, or whose chain ends at an undeclared
    /// name, resolves to itself / that name.
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> Result<&'a str> {
        let mut visited = vec![name];
        let mut current = name;

        while let Some(FieldTy::Alias(target)) = self.fields.get(current).map(|field| &field.ty) {
            let target = target.as_str();
            let cycle = visited.contains(&target);
            visited.push(target);

            if cycle {
                return Err(Error::invalid_schema(format!(
                    "alias cycle in {}: {}",
                    self.name,
                    visited.join(" -> ")
                )));
            }

            current = target;
        }

        Ok(current)
    }

    /// The declared field `name` resolves to, after alias redirects.
    pub fn resolve_field(&self, name: &str) -> Result<Option<&Field>> {
        let name = self.resolve_alias(name)?;
        Ok(self.fields.get(name))
    }

    /// Maps a local field name to the remote field name for `version`.
    pub fn to_remote(&self, name: &str, version: &str) -> Result<String> {
        let name = self.resolve_alias(name)?;

        let base = match self.fields.get(name).and_then(Field::as_relation) {
            Some(relation) => relation.remote_field.as_str(),
            None => name,
        };

        Ok(self.mapping.to_remote(version, base).to_string())
    }

    /// Maps a remote field name back to its canonical local name.
    ///
    /// A remote reference field has several local projections; the one
    /// carrying the ids is canonical.
    pub fn to_local(&self, inverse: &Inverse, remote: &str, version: &str) -> String {
        let name = inverse.to_local(version, remote);

        if let Some(field) = self.fields.get(name) {
            let canonical = match &field.ty {
                FieldTy::Primitive(_) => true,
                FieldTy::Relation(relation) => {
                    relation.remote_field == name && field.is_reference_id()
                }
                FieldTy::Alias(_) => false,
            };

            if canonical {
                return name.to_string();
            }
        }

        self.relations()
            .find(|(field, relation)| relation.remote_field == name && field.is_reference_id())
            .map(|(field, _)| field.name.clone())
            .unwrap_or_else(|| name.to_string())
    }
}
