use crate::Json;

use serde_json::{json, Map};

/// A mutation of a plural relationship, in the server's command tuple form.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `(0, 0, values)`: create a related record and link it.
    Create(Map<String, Json>),

    /// `(1, id, values)`: update a linked record.
    Update(i64, Map<String, Json>),

    /// `(2, id, 0)`: unlink and delete the record.
    Delete(i64),

    /// `(3, id, 0)`: unlink without deleting.
    Unlink(i64),

    /// `(4, id, 0)`: link an existing record.
    Link(i64),

    /// `(5, 0, 0)`: unlink everything.
    Clear,

    /// `(6, 0, ids)`: replace the linked set.
    Set(Vec<i64>),
}

impl Command {
    pub fn to_json(&self) -> Json {
        match self {
            Self::Create(values) => json!([0, 0, values]),
            Self::Update(id, values) => json!([1, id, values]),
            Self::Delete(id) => json!([2, id, 0]),
            Self::Unlink(id) => json!([3, id, 0]),
            Self::Link(id) => json!([4, id, 0]),
            Self::Clear => json!([5, 0, 0]),
            Self::Set(ids) => json!([6, 0, ids]),
        }
    }
}
