//! Translation of [`Domain`] filters into the server's wire domain.

use super::{Field, FieldTy, ModelId, Schema};
use crate::stmt::{Criterion, Domain, Op, Value};
use crate::{Codec, Json, Result};

/// A dotted field path resolved against the schema.
#[derive(Debug)]
pub struct Path<'a> {
    /// Remote names joined with `.`
    pub remote: String,

    /// Declared field at the end of the chain, if any.
    pub leaf: Option<&'a Field>,
}

impl Schema {
    /// Resolves a dotted path starting at `model`.
    ///
    /// Each hop is resolved against the schema of the previous hop's
    /// relationship target. Once a hop is undeclared, the remaining hops
    /// are passed through unchanged.
    pub fn resolve_path(&self, model: ModelId, path: &str, version: &str) -> Result<Path<'_>> {
        let mut remote = Vec::new();
        let mut current = Some(self.model(model));
        let mut leaf = None;

        for hop in path.split('.') {
            let Some(model) = current else {
                remote.push(hop.to_string());
                leaf = None;
                continue;
            };

            remote.push(model.to_remote(hop, version)?);
            leaf = model.resolve_field(hop)?;

            current = match leaf.map(|field| &field.ty) {
                Some(FieldTy::Relation(relation)) => {
                    Some(self.relation_target(model.id, relation)?)
                }
                _ => None,
            };
        }

        Ok(Path {
            remote: remote.join("."),
            leaf,
        })
    }

    /// Encodes `domain` for a search on `model`.
    pub fn encode_domain(
        &self,
        model: ModelId,
        domain: &Domain,
        version: &str,
        codec: &Codec,
    ) -> Result<Json> {
        let mut wire = Vec::with_capacity(domain.criteria.len());

        for criterion in domain.iter() {
            let Criterion::Term { path, op, value } = criterion else {
                let token = criterion.token().unwrap_or_default();
                wire.push(Json::String(token.to_string()));
                continue;
            };

            let path = self.resolve_path(model, path, version)?;
            let operand = encode_operand(path.leaf, *op, value, codec)?;

            wire.push(Json::Array(vec![
                Json::String(path.remote),
                Json::String(op.as_str().to_string()),
                operand,
            ]));
        }

        Ok(Json::Array(wire))
    }
}

fn encode_operand(field: Option<&Field>, op: Op, value: &Value, codec: &Codec) -> Result<Json> {
    let Some(ty) = field.and_then(|field| field.ty.as_primitive()) else {
        return Ok(codec.encode_untyped(value));
    };

    match value {
        Value::List(items) if op.is_membership() && !ty.value_ty().is_list() => items
            .iter()
            .map(|item| codec.encode(ty, item))
            .collect::<Result<_>>()
            .map(Json::Array),
        _ => codec.encode(ty, value),
    }
}
