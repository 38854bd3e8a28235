//! The client session and its manager registry.

use crate::{Manager, Model, ModelBuilder, Result, Transport};

use indexmap::IndexMap;
use odoo_orm_core::schema::{self, Inverse, ModelId};
use odoo_orm_core::{err, Codec, Schema};
use serde::Deserialize;
use std::{fmt, sync::Arc};

/// Handle to one remote session. Cloning is cheap.
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

struct Shared {
    transport: Box<dyn Transport>,
    schema: Schema,
    codec: Codec,
    config: Config,

    /// One manager per registered model, built before the client is handed
    /// out and never modified afterwards.
    managers: IndexMap<ModelId, Arc<ManagerState>>,
}

/// Per-model state shared by every [`Manager`] handle of that model.
#[derive(Debug)]
pub(crate) struct ManagerState {
    pub(crate) model: ModelId,

    /// Remote to local renaming, precomputed once.
    pub(crate) inverse: Inverse,
}

#[derive(Debug, Default)]
pub struct Builder {
    core: schema::Builder,
    config: Config,
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether reading an undeclared field name returns the raw payload
    /// value instead of failing. Models may override it.
    pub passthrough_undeclared: bool,

    /// Server date format
    pub date_format: String,

    /// Server datetime format
    pub datetime_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            passthrough_undeclared: false,
            date_format: odoo_orm_core::codec::DATE_FORMAT.to_string(),
            datetime_format: odoo_orm_core::codec::DATETIME_FORMAT.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn passthrough_undeclared(mut self, enabled: bool) -> Self {
        self.passthrough_undeclared = enabled;
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }
}

impl Builder {
    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.core.model(M::schema());
        self
    }

    /// Registers an untyped model declaration.
    pub fn model(&mut self, model: ModelBuilder) -> &mut Self {
        self.core.model(model);
        self
    }

    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Resolves every registered model and builds its manager.
    pub fn build(&mut self, transport: impl Transport) -> Result<Client> {
        let schema = self
            .core
            .passthrough(self.config.passthrough_undeclared)
            .build()?;

        let managers = schema
            .models()
            .map(|model| {
                let state = ManagerState {
                    model: model.id,
                    inverse: model.mapping.invert(),
                };
                (model.id, Arc::new(state))
            })
            .collect();

        let codec = Codec::new(&self.config.date_format, &self.config.datetime_format);

        Ok(Client {
            shared: Arc::new(Shared {
                transport: Box::new(transport),
                schema,
                codec,
                config: self.config.clone(),
                managers,
            }),
        })
    }
}

impl Client {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    pub fn codec(&self) -> &Codec {
        &self.shared.codec
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn transport(&self) -> &dyn Transport {
        &*self.shared.transport
    }

    /// Version of the connected server, read from the transport each time.
    pub fn server_version(&self) -> String {
        self.shared.transport.server_version()
    }

    /// The manager of a typed model.
    pub fn manager<M: Model>(&self) -> Result<Manager> {
        self.manager_by_name(M::NAME)
    }

    /// The manager of the model registered as `name`.
    pub fn manager_by_name(&self, name: &str) -> Result<Manager> {
        match self.schema().model_by_name(name) {
            Some(model) => Ok(self.manager_by_id(model.id)),
            None => Err(err!("no model registered as `{name}`")),
        }
    }

    /// The manager of the first model registered for the server model
    /// `remote_name`.
    pub fn manager_by_remote_name(&self, remote_name: &str) -> Result<Manager> {
        match self.schema().model_by_remote_name(remote_name) {
            Some(model) => Ok(self.manager_by_id(model.id)),
            None => Err(err!("no model registered for `{remote_name}`")),
        }
    }

    pub fn manager_by_id(&self, id: ModelId) -> Manager {
        let state = self.shared.managers.get(&id).expect("invalid model ID");
        Manager::new(self.clone(), state.clone())
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("transport", &self.shared.transport)
            .field("models", &self.shared.managers.len())
            .finish()
    }
}
