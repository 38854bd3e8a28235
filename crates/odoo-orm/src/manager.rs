//! Per-model gateway for remote reads and writes.

use crate::client::ManagerState;
use crate::{Client, Domain, Error, Fields, Json, RawRecord, Record, RecordRef, Result, Value};

use odoo_orm_core::{err, schema::ModelId};
use serde_json::Map;
use std::{collections::HashSet, sync::Arc};
use tracing::debug;

/// Gateway to one declared model. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Manager {
    client: Client,
    state: Arc<ManagerState>,
}

/// Field selection and not-found policy for a read.
#[derive(Debug, Clone, Default)]
pub struct Fetch {
    /// Local field names to read. `None` reads the model's default
    /// projection, or every field if it declares none.
    pub fields: Option<Vec<String>>,

    /// Skip ids that no longer exist instead of failing.
    pub optional: bool,
}

/// A search: filter, field selection and ordering.
#[derive(Debug, Clone, Default)]
pub struct Search {
    pub domain: Domain,
    pub fields: Option<Vec<String>>,

    /// Comma separated `field [asc|desc]` terms, using local names.
    pub order: Option<String>,
}

impl Fetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

impl Search {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            ..Self::default()
        }
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

impl From<Domain> for Search {
    fn from(value: Domain) -> Self {
        Self::new(value)
    }
}

impl Manager {
    pub(crate) fn new(client: Client, state: Arc<ManagerState>) -> Self {
        Self { client, state }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn model_id(&self) -> ModelId {
        self.state.model
    }

    pub fn model(&self) -> &odoo_orm_core::schema::Model {
        self.client.schema().model(self.state.model)
    }

    /// Remote name of a local field for the connected server.
    pub fn to_remote(&self, name: &str) -> Result<String> {
        self.model().to_remote(name, &self.client.server_version())
    }

    /// Canonical local name of a remote field for the connected server.
    pub fn to_local(&self, remote: &str) -> String {
        self.model().to_local(&self.state.inverse, remote, &self.client.server_version())
    }

    /// Reads `ids` in one batched call.
    ///
    /// Unless `fetch.optional` is set, every id must exist; otherwise the
    /// call fails naming exactly the missing ids.
    pub async fn list(&self, ids: &[i64], fetch: &Fetch) -> Result<Vec<Record>> {
        let selected = fetch
            .fields
            .clone()
            .or_else(|| self.model().default_fields.clone());

        let rows = self.read(ids, selected.as_deref(), fetch.optional).await?;

        rows.into_iter()
            .map(|raw| {
                Record::new(self.client.clone(), self.model_id(), Arc::new(raw), selected.clone())
            })
            .collect()
    }

    /// Like [`Manager::list`], returning payloads keyed by local field name.
    pub async fn list_dicts(&self, ids: &[i64], fetch: &Fetch) -> Result<Vec<Map<String, Json>>> {
        let records = self.list(ids, fetch).await?;
        Ok(records.iter().map(|record| record.as_dict(false)).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Record> {
        self.get_with(id, &Fetch::default())
            .await?
            .ok_or_else(|| Error::record_not_found(&self.model().remote_name, vec![id]))
    }

    /// Returns `None` for a missing id.
    pub async fn find(&self, id: i64) -> Result<Option<Record>> {
        self.get_with(id, &Fetch::default().optional(true)).await
    }

    /// Reads a single record. `None` is only returned when `fetch.optional`
    /// is set.
    pub async fn get_with(&self, id: i64, fetch: &Fetch) -> Result<Option<Record>> {
        Ok(self.list(&[id], fetch).await?.into_iter().next())
    }

    /// Reads the single record whose `field` equals `value` among those
    /// matching `domain`.
    ///
    /// More than one match is an error even when `fetch.optional` is set.
    pub async fn get_by_unique_field(
        &self,
        field: &str,
        value: impl Into<Value>,
        domain: Domain,
        fetch: &Fetch,
    ) -> Result<Option<Record>> {
        let value = value.into();
        let search = Search {
            domain: domain.eq(field, value.clone()),
            fields: fetch.fields.clone(),
            order: None,
        };

        let ids = self.search_ids(&search).await?;
        let model = self.model();

        match ids[..] {
            [] if fetch.optional => Ok(None),
            [] => Err(err!("{field} = {}", self.client.codec().encode_untyped(&value))
                .context(Error::record_not_found(&model.remote_name, vec![]))),
            [id] => self.get_with(id, fetch).await,
            _ => Err(Error::multiple_records_found(&model.remote_name, ids.clone())),
        }
    }

    pub async fn find_by_unique_field(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Option<Record>> {
        let fetch = Fetch::default().optional(true);
        self.get_by_unique_field(field, value, Domain::new(), &fetch)
            .await
    }

    /// Searches, then reads the matching records.
    ///
    /// Records deleted between the two calls are dropped from the result.
    pub async fn search(&self, search: impl Into<Search>) -> Result<Vec<Record>> {
        let search = search.into();
        let ids = self.search_ids(&search).await?;

        let fetch = Fetch {
            fields: search.fields,
            optional: true,
        };
        let records = self.list(&ids, &fetch).await?;

        if records.len() < ids.len() {
            debug!(
                model = %self.model().remote_name,
                dropped = ids.len() - records.len(),
                "search results deleted before read"
            );
        }

        Ok(records)
    }

    pub async fn search_ids(&self, search: &Search) -> Result<Vec<i64>> {
        let model = self.model();
        let version = self.client.server_version();

        let domain = self.client.schema().encode_domain(
            model.id,
            &search.domain,
            &version,
            self.client.codec(),
        )?;

        let order = match &search.order {
            Some(order) => Some(self.translate_order(order, &version)?),
            None => None,
        };

        debug!(
            model = %model.remote_name,
            criteria = search.domain.criteria.len(),
            "search"
        );

        self.client
            .transport()
            .search(&model.remote_name, &domain, order.as_deref())
            .await
    }

    pub async fn search_dicts(&self, search: impl Into<Search>) -> Result<Vec<Map<String, Json>>> {
        let records = self.search(search).await?;
        Ok(records.iter().map(|record| record.as_dict(false)).collect())
    }

    /// Creates one record and returns its id.
    pub async fn create(&self, fields: Fields) -> Result<i64> {
        let model = self.model();
        let payload = self.encode_fields(&fields)?;

        debug!(model = %model.remote_name, fields = payload.len(), "create");

        let ids = parse_ids(
            self.client
                .transport()
                .create(&model.remote_name, Json::Object(payload))
                .await?,
        )?;

        match ids[..] {
            [id] => Ok(id),
            _ => Err(err!(
                "create on {} returned {} ids, expected one",
                model.remote_name,
                ids.len()
            )),
        }
    }

    /// Creates several records in one call.
    pub async fn create_multi(&self, records: Vec<Fields>) -> Result<Vec<i64>> {
        if records.is_empty() {
            return Ok(vec![]);
        }

        let model = self.model();
        let payload = records
            .iter()
            .map(|fields| self.encode_fields(fields).map(Json::Object))
            .collect::<Result<Vec<_>>>()?;

        debug!(model = %model.remote_name, records = payload.len(), "create");

        let raw = self
            .client
            .transport()
            .create(&model.remote_name, Json::Array(payload))
            .await?;

        parse_ids(raw)
    }

    /// Writes `fields` to the referenced record(s).
    pub async fn update(&self, target: impl Into<RecordRef>, fields: Fields) -> Result<()> {
        let mut ids = vec![];
        target.into().collect_ids(&mut ids);

        let model = self.model();
        let payload = self.encode_fields(&fields)?;

        if ids.is_empty() {
            return Ok(());
        }

        debug!(model = %model.remote_name, ids = ids.len(), fields = payload.len(), "write");

        self.client
            .transport()
            .write(&model.remote_name, &ids, Json::Object(payload))
            .await
    }

    /// Deletes every referenced record in one call.
    pub async fn unlink<I>(&self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<RecordRef>,
    {
        let mut ids = vec![];
        for r in records {
            r.into().collect_ids(&mut ids);
        }

        if ids.is_empty() {
            return Ok(());
        }

        let model = self.model();
        debug!(model = %model.remote_name, ids = ids.len(), "unlink");

        self.client
            .transport()
            .unlink(&model.remote_name, &ids)
            .await
    }

    pub async fn delete<I>(&self, records: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<RecordRef>,
    {
        self.unlink(records).await
    }

    async fn read(
        &self,
        ids: &[i64],
        selected: Option<&[String]>,
        optional: bool,
    ) -> Result<Vec<RawRecord>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let model = self.model();

        let fields = match selected {
            Some(selected) => {
                let version = self.client.server_version();
                let mut fields = Vec::with_capacity(selected.len());

                for name in selected {
                    let remote = model.to_remote(name, &version)?;
                    if !fields.contains(&remote) {
                        fields.push(remote);
                    }
                }

                Some(fields)
            }
            None => None,
        };

        debug!(
            model = %model.remote_name,
            ids = ids.len(),
            fields = fields.as_ref().map(Vec::len),
            "read"
        );

        let rows = self
            .client
            .transport()
            .read(&model.remote_name, ids, fields.as_deref())
            .await?;

        if !optional {
            let found: HashSet<_> = rows
                .iter()
                .filter_map(|row| row.get("id").and_then(Json::as_i64))
                .collect();

            let missing: Vec<_> = ids.iter().copied().filter(|id| !found.contains(id)).collect();

            if !missing.is_empty() {
                return Err(Error::record_not_found(&model.remote_name, missing));
            }
        }

        Ok(rows)
    }

    /// Rewrites each term's field to its remote name.
    fn translate_order(&self, order: &str, version: &str) -> Result<String> {
        let model = self.model();
        let mut terms = vec![];

        for term in order.split(',') {
            let mut parts = term.split_whitespace();
            let Some(field) = parts.next() else {
                continue;
            };

            let mut term = model.to_remote(field, version)?;
            for part in parts {
                term.push(' ');
                term.push_str(part);
            }
            terms.push(term);
        }

        Ok(terms.join(", "))
    }
}

/// A create returns a bare id for a single record and a list otherwise.
fn parse_ids(raw: Json) -> Result<Vec<i64>> {
    let ids = match &raw {
        Json::Number(id) => id.as_i64().map(|id| vec![id]),
        Json::Array(items) => items.iter().map(Json::as_i64).collect(),
        _ => None,
    };

    ids.ok_or_else(|| Error::type_conversion(Value::from_json(&raw), "record ids"))
}
