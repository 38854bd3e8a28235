pub mod client;
pub use client::{Client, Config};

mod input;
pub use input::{Fields, Input, RecordRef};

pub mod manager;
pub use manager::{Fetch, Manager, Search};

mod model;
pub use model::Model;

pub mod record;
pub use record::{Record, Resolved};

mod write;

pub use odoo_orm_core::{
    async_trait, bail, err,
    schema::{ModelBuilder, Projection, Relation, Target},
    stmt::{Command, Criterion, Domain, FromValue, Op, Sentinel, Type, Value},
    transport::{RawRecord, Transport},
    Error, Json, Result,
};
