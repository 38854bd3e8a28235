//! The RPC collaborator every remote operation goes through.

use crate::{Json, Result};

use async_trait::async_trait;
use std::fmt::Debug;

/// One record as returned by `read`, keyed by remote field name.
pub type RawRecord = serde_json::Map<String, Json>;

/// Remote model operations.
///
/// Errors returned by an implementation are passed to callers unchanged.
#[async_trait]
pub trait Transport: Debug + Send + Sync + 'static {
    /// Version string of the connected server. Read on every call, as a
    /// client may reconnect to a different server.
    fn server_version(&self) -> String;

    /// Reads `fields` (all fields if `None`) of `ids`. Ids that no longer
    /// exist are omitted from the result.
    async fn read(
        &self,
        model: &str,
        ids: &[i64],
        fields: Option<&[String]>,
    ) -> Result<Vec<RawRecord>>;

    /// Ids matching `domain`, in `order` if given.
    async fn search(&self, model: &str, domain: &Json, order: Option<&str>) -> Result<Vec<i64>>;

    /// Creates one record (object payload) or several (array payload).
    ///
    /// Returns either a bare id or a list of ids.
    async fn create(&self, model: &str, payload: Json) -> Result<Json>;

    async fn write(&self, model: &str, ids: &[i64], payload: Json) -> Result<()>;

    async fn unlink(&self, model: &str, ids: &[i64]) -> Result<()>;
}
