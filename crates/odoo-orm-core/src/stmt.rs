//! Local values, semantic types, filter domains and relationship commands.

mod command;
pub use command::Command;

mod domain;
pub use domain::{Criterion, Domain, Op};

mod from_value;
pub use from_value::FromValue;

mod ty;
pub use ty::{Sentinel, Type};

mod value;
pub use value::Value;
