//! Encoding of `create`/`update` payloads.

use crate::{Command, Error, Fields, Input, Json, Manager, Result, Value};

use odoo_orm_core::schema::{FieldTy, Relation};
use odoo_orm_core::stmt::Type;
use serde_json::Map;

impl Manager {
    /// Encodes `fields` into a payload keyed by remote field name.
    ///
    /// Two keys resolving to the same remote field are rejected.
    pub(crate) fn encode_fields(&self, fields: &Fields) -> Result<Map<String, Json>> {
        let model = self.model();
        let version = self.client().server_version();

        let mut payload = Map::new();
        let mut written: Vec<(&str, String)> = vec![];

        for (name, input) in fields.iter() {
            let remote = model.to_remote(name, &version)?;

            if let Some((first, _)) = written.iter().find(|(_, r)| *r == remote) {
                return Err(Error::invalid_schema(format!(
                    "fields `{first}` and `{name}` of {} both write remote field `{remote}`",
                    model.name
                )));
            }

            let value = match model.resolve_field(name)?.map(|field| &field.ty) {
                Some(FieldTy::Primitive(ty)) => self.encode_primitive(name, ty, input)?,
                Some(FieldTy::Relation(relation)) if relation.is_plural() => {
                    self.encode_plural(name, relation, input)?
                }
                Some(FieldTy::Relation(relation)) => self.encode_singular(name, relation, input)?,
                // Undeclared names are written as given.
                _ => self.encode_primitive(name, &Type::Any, input)?,
            };

            payload.insert(remote.clone(), value);
            written.push((name, remote));
        }

        Ok(payload)
    }

    fn encode_primitive(&self, name: &str, ty: &Type, input: &Input) -> Result<Json> {
        let codec = self.client().codec();

        match input {
            Input::Value(value) if matches!(ty, Type::Any) => Ok(codec.encode_untyped(value)),
            Input::Value(value) => codec.encode(ty, value),
            Input::Record(record) => Ok(Json::from(record.id())),
            Input::List(items) => items
                .iter()
                .map(|item| self.encode_primitive(name, ty.value_ty().list_item(), item))
                .collect::<Result<_>>()
                .map(Json::Array),
            Input::Fields(_) | Input::Command(_) => Err(self.unsupported(name, input)),
        }
    }

    /// A plural relationship is written as a list of commands.
    fn encode_plural(&self, name: &str, relation: &Relation, input: &Input) -> Result<Json> {
        let commands = match input {
            Input::Value(Value::Absent(_)) => vec![Command::Clear],
            Input::Value(Value::List(ids)) => ids
                .iter()
                .map(|id| match id {
                    Value::I64(id) => Ok(Command::Link(*id)),
                    _ => Err(Error::type_conversion(id.clone(), "record id")),
                })
                .collect::<Result<_>>()?,
            Input::List(items) => items
                .iter()
                .map(|item| self.plural_command(name, relation, item))
                .collect::<Result<_>>()?,
            input => vec![self.plural_command(name, relation, input)?],
        };

        Ok(Json::Array(commands.iter().map(Command::to_json).collect()))
    }

    fn plural_command(&self, name: &str, relation: &Relation, input: &Input) -> Result<Command> {
        match input {
            Input::Value(Value::I64(id)) => Ok(Command::Link(*id)),
            Input::Record(record) => Ok(Command::Link(record.id())),
            Input::Fields(fields) => {
                let target = relation.target_id(self.model_id())?;
                let values = self.client().manager_by_id(target).encode_fields(fields)?;
                Ok(Command::Create(values))
            }
            Input::Command(command) => Ok(command.clone()),
            Input::Value(value) => Err(Error::type_conversion(value.clone(), "record id")),
            Input::List(_) => Err(self.unsupported(name, input)),
        }
    }

    /// A singular relationship only links an existing record.
    fn encode_singular(&self, name: &str, relation: &Relation, input: &Input) -> Result<Json> {
        match input {
            Input::Value(Value::I64(id)) => Ok(Json::from(*id)),
            Input::Value(Value::Absent(_)) => Ok(Json::Bool(false)),
            Input::Record(record) => Ok(Json::from(record.id())),
            Input::Fields(_) => Err(Error::invalid_schema(format!(
                "cannot create a related record through singular relationship `{}.{name}` ({})",
                self.model().name,
                relation.remote_field
            ))),
            Input::Value(value) => Err(Error::type_conversion(value.clone(), "record id")),
            Input::List(_) | Input::Command(_) => Err(self.unsupported(name, input)),
        }
    }

    fn unsupported(&self, name: &str, input: &Input) -> Error {
        let what = match input {
            Input::Value(_) => "a value",
            Input::Record(_) => "a record",
            Input::Fields(_) => "nested fields",
            Input::List(_) => "a list",
            Input::Command(_) => "a relationship command",
        };

        Error::invalid_schema(format!(
            "cannot write {what} to field `{}.{name}`",
            self.model().name
        ))
    }
}
