pub mod codec;
pub use codec::Codec;

mod error;
pub use error::{Error, IntoError};

pub mod schema;
pub use schema::Schema;

pub mod stmt;

pub mod transport;
pub use transport::Transport;

/// A Result type alias that uses the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;

/// Raw JSON value as exchanged with the transport.
pub use serde_json::Value as Json;
