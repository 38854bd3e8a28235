//! Lazily decoded record snapshots.

use crate::{
    Client, Error, Fetch, FromValue, Json, Manager, Model, RawRecord, Result, Value,
};

use indexmap::IndexMap;
use odoo_orm_core::schema::{self, FieldTy, ModelId, Projection, Relation};
use serde_json::Map;
use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::trace;

/// One remote record as read at a point in time.
///
/// Field values are decoded on first access and cached for the life of the
/// record. The raw payload is never modified; [`Record::refresh`] returns a
/// new record instead.
#[derive(Clone)]
pub struct Record {
    inner: Arc<Inner>,
}

struct Inner {
    id: i64,
    client: Client,
    model: ModelId,
    raw: Arc<RawRecord>,

    /// Local field names requested by the read, `None` for all fields.
    selected: Option<Vec<String>>,

    /// Keyed by the terminal (alias-resolved) field name.
    cache: Mutex<IndexMap<String, Resolved>>,
}

/// A resolved field value.
#[derive(Debug, Clone)]
pub enum Resolved {
    Value(Value),
    Record(Record),
    Records(Vec<Record>),
}

impl Record {
    pub(crate) fn new(
        client: Client,
        model: ModelId,
        raw: Arc<RawRecord>,
        selected: Option<Vec<String>>,
    ) -> Result<Self> {
        let id = match raw.get("id").and_then(Json::as_i64) {
            Some(id) => id,
            None => {
                let remote_name = &client.schema().model(model).remote_name;
                return Err(Error::field_not_selected(remote_name.as_str(), "id"));
            }
        };

        Ok(Self {
            inner: Arc::new(Inner {
                id,
                client,
                model,
                raw,
                selected,
                cache: Mutex::new(IndexMap::new()),
            }),
        })
    }

    pub fn id(&self) -> i64 {
        self.inner.id
    }

    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    /// The declared model this record is read as.
    pub fn model(&self) -> &schema::Model {
        self.inner.client.schema().model(self.inner.model)
    }

    pub fn manager(&self) -> Manager {
        self.inner.client.manager_by_id(self.inner.model)
    }

    /// The payload exactly as returned by the transport, keyed by remote
    /// field name.
    pub fn raw_fields(&self) -> &RawRecord {
        &self.inner.raw
    }

    /// Raw wire value of the remote field `name`, with no decoding.
    pub fn raw(&self, name: &str) -> Option<&Json> {
        self.inner.raw.get(name)
    }

    pub fn selected_fields(&self) -> Option<&[String]> {
        self.inner.selected.as_deref()
    }

    /// Returns `true` if both handles share one snapshot (and cache).
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Resolves the field `name`.
    ///
    /// Aliases are followed first. Relationship projections that name a
    /// related record issue a read the first time they are accessed.
    pub async fn get(&self, name: &str) -> Result<Resolved> {
        let model = self.model();
        let terminal = model.resolve_alias(name)?;

        if let Some(resolved) = self.cached(terminal) {
            trace!(model = %model.name, id = self.id(), field = terminal, "field cache hit");
            return Ok(resolved);
        }

        let resolved = self.resolve(model, name, terminal).await?;
        Ok(self.memoize(terminal, resolved))
    }

    /// Resolves `name` to a plain value. Related records read as their ids.
    pub async fn value(&self, name: &str) -> Result<Value> {
        Ok(self.get(name).await?.into_value())
    }

    pub async fn get_as<T: FromValue>(&self, name: &str) -> Result<T> {
        T::from_value(self.value(name).await?)
    }

    /// Resolves `name` and encodes it back to a wire value with the client's
    /// date formats.
    pub async fn get_json(&self, name: &str) -> Result<Json> {
        let value = self.value(name).await?;
        Ok(self.inner.client.codec().encode_untyped(&value))
    }

    /// Resolves a singular relationship projected as an object.
    pub async fn one(&self, name: &str) -> Result<Option<Record>> {
        match self.get(name).await? {
            Resolved::Record(record) => Ok(Some(record)),
            Resolved::Value(Value::Absent(_)) => Ok(None),
            resolved => Err(Error::type_conversion(resolved.into_value(), "Record")),
        }
    }

    /// Resolves a plural relationship projected as objects.
    pub async fn many(&self, name: &str) -> Result<Vec<Record>> {
        match self.get(name).await? {
            Resolved::Records(records) => Ok(records),
            resolved => Err(Error::type_conversion(resolved.into_value(), "Vec<Record>")),
        }
    }

    /// A copy of the payload.
    ///
    /// Keys are local field names unless `raw` is set, in which case the
    /// remote names are kept.
    pub fn as_dict(&self, raw: bool) -> Map<String, Json> {
        if raw {
            return (*self.inner.raw).clone();
        }

        let manager = self.manager();
        self.inner
            .raw
            .iter()
            .map(|(remote, value)| (manager.to_local(remote), value.clone()))
            .collect()
    }

    /// Reads the record again with the same field selection.
    pub async fn refresh(&self) -> Result<Record> {
        let fetch = Fetch {
            fields: self.inner.selected.clone(),
            optional: false,
        };

        self.manager()
            .get_with(self.id(), &fetch)
            .await?
            .ok_or_else(|| Error::record_not_found(&self.model().remote_name, vec![self.id()]))
    }

    pub async fn unlink(&self) -> Result<()> {
        self.manager().unlink([self]).await
    }

    pub async fn delete(&self) -> Result<()> {
        self.unlink().await
    }

    /// Re-reads this record's payload as `M`, without a remote call.
    pub fn cast<M: Model>(&self) -> Result<M> {
        let manager = self.inner.client.manager::<M>()?;
        self.from_other(manager.model_id()).map(M::load)
    }

    /// Wraps this record's payload under another declared model.
    ///
    /// The new record starts with an empty cache.
    pub fn from_other(&self, model: ModelId) -> Result<Record> {
        let schema = self.inner.client.schema();
        if !schema.models.contains_key(&model) {
            return Err(Error::invalid_schema(format!("{model:?} is not a registered model")));
        }

        Record::new(
            self.inner.client.clone(),
            model,
            self.inner.raw.clone(),
            self.inner.selected.clone(),
        )
    }

    fn cached(&self, name: &str) -> Option<Resolved> {
        let cache = self.inner.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(name).cloned()
    }

    /// Stores `resolved` unless a concurrent access stored a value first,
    /// and returns whichever is cached.
    fn memoize(&self, name: &str, resolved: Resolved) -> Resolved {
        let mut cache = self.inner.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.entry(name.to_string()).or_insert(resolved).clone()
    }

    async fn resolve(&self, model: &schema::Model, name: &str, terminal: &str) -> Result<Resolved> {
        let Some(field) = model.field(terminal) else {
            return self.passthrough(model, name, terminal);
        };

        let version = self.inner.client.server_version();
        let remote = model.to_remote(terminal, &version)?;

        let Some(raw) = self.inner.raw.get(&remote) else {
            return Err(Error::field_not_selected(model.remote_name.as_str(), name));
        };

        match &field.ty {
            FieldTy::Primitive(ty) => self
                .inner
                .client
                .codec()
                .decode(ty, raw)
                .map(Resolved::Value),
            FieldTy::Relation(relation) => self.resolve_relation(model, relation, raw).await,
            FieldTy::Alias(target) => Err(Error::invalid_schema(format!(
                "alias `{terminal}` -> `{target}` was not followed"
            ))),
        }
    }

    fn passthrough(&self, model: &schema::Model, name: &str, terminal: &str) -> Result<Resolved> {
        match self.inner.raw.get(terminal) {
            Some(raw) if model.passthrough => Ok(Resolved::Value(Value::Json(raw.clone()))),
            _ => Err(Error::unknown_field(model.remote_name.as_str(), name)),
        }
    }

    async fn resolve_relation(
        &self,
        model: &schema::Model,
        relation: &Relation,
        raw: &Json,
    ) -> Result<Resolved> {
        match relation.projection {
            Projection::Ids => {
                let ids = reference_ids(raw)?;
                Ok(Resolved::Value(Value::List(
                    ids.into_iter().map(Value::I64).collect(),
                )))
            }
            Projection::Objects => {
                let ids = reference_ids(raw)?;
                let target = self.target_manager(model, relation)?;

                trace!(
                    model = %model.name,
                    target = %target.model().name,
                    ids = ids.len(),
                    "resolving plural relationship"
                );

                target.list(&ids, &Fetch::default()).await.map(Resolved::Records)
            }
            projection => {
                let Some((id, display_name)) = reference(raw)? else {
                    return Ok(Resolved::Value(Value::Absent(relation.absent)));
                };

                match projection {
                    Projection::Id => Ok(Resolved::Value(Value::I64(id))),
                    Projection::Name => match display_name {
                        Some(display_name) => Ok(Resolved::Value(Value::String(display_name))),
                        None => Err(Error::type_conversion(Value::from_json(raw), "display name")),
                    },
                    _ => {
                        let target = self.target_manager(model, relation)?;

                        trace!(
                            model = %model.name,
                            target = %target.model().name,
                            id,
                            "resolving singular relationship"
                        );

                        target.get(id).await.map(Resolved::Record)
                    }
                }
            }
        }
    }

    /// Manager of the related model; `Self` targets follow this record's
    /// own model.
    fn target_manager(&self, model: &schema::Model, relation: &Relation) -> Result<Manager> {
        let target = relation.target_id(model.id)?;
        Ok(self.inner.client.manager_by_id(target))
    }
}

impl Resolved {
    /// Flattens to a plain value, reading related records as their ids.
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Record(record) => Value::I64(record.id()),
            Self::Records(records) => {
                Value::List(records.iter().map(|record| Value::I64(record.id())).collect())
            }
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.model().name, self.id())
    }
}

/// Parses a singular reference: `[id, display_name]`, a bare id, or an
/// absent sentinel.
fn reference(raw: &Json) -> Result<Option<(i64, Option<String>)>> {
    match raw {
        Json::Null | Json::Bool(false) => Ok(None),
        Json::Number(n) => match n.as_i64() {
            Some(id) => Ok(Some((id, None))),
            None => Err(Error::type_conversion(Value::from_json(raw), "reference")),
        },
        Json::Array(items) => match &items[..] {
            [Json::Number(id), Json::String(name)] => match id.as_i64() {
                Some(id) => Ok(Some((id, Some(name.clone())))),
                None => Err(Error::type_conversion(Value::from_json(raw), "reference")),
            },
            // An unreadable related record comes back without a name.
            [Json::Number(id), Json::Bool(false)] | [Json::Number(id)] => match id.as_i64() {
                Some(id) => Ok(Some((id, None))),
                None => Err(Error::type_conversion(Value::from_json(raw), "reference")),
            },
            _ => Err(Error::type_conversion(Value::from_json(raw), "reference")),
        },
        _ => Err(Error::type_conversion(Value::from_json(raw), "reference")),
    }
}

/// Parses a plural reference. An absent sentinel reads as no ids.
fn reference_ids(raw: &Json) -> Result<Vec<i64>> {
    match raw {
        Json::Null | Json::Bool(false) => Ok(vec![]),
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_i64()
                    .ok_or_else(|| Error::type_conversion(Value::from_json(raw), "reference ids"))
            })
            .collect(),
        _ => Err(Error::type_conversion(Value::from_json(raw), "reference ids")),
    }
}
