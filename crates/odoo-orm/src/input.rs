use crate::{Command, Record, Value};

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;

/// A value written to one field by `create` or `update`.
#[derive(Debug, Clone)]
pub enum Input {
    Value(Value),

    /// An existing record, written as its id.
    Record(Record),

    /// A new related record, created together with its owner.
    Fields(Fields),

    /// Elements of a plural relationship.
    List(Vec<Input>),

    /// An explicit relationship command.
    Command(Command),
}

/// Field values keyed by local field name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    values: IndexMap<String, Input>,
}

/// One or more existing records, by id or by handle.
#[derive(Debug, Clone)]
pub enum RecordRef {
    Id(i64),
    Record(Record),
    Many(Vec<RecordRef>),
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Input>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Input>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Input> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Input)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Input>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl RecordRef {
    /// Appends every referenced id to `ids`.
    pub fn collect_ids(&self, ids: &mut Vec<i64>) {
        match self {
            Self::Id(id) => ids.push(*id),
            Self::Record(record) => ids.push(record.id()),
            Self::Many(refs) => {
                for r in refs {
                    r.collect_ids(ids);
                }
            }
        }
    }
}

macro_rules! impl_input_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Input {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

impl_input_from_value!(
    Value,
    bool,
    i64,
    i32,
    f64,
    &str,
    String,
    NaiveDate,
    NaiveDateTime
);

impl From<Record> for Input {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<&Record> for Input {
    fn from(value: &Record) -> Self {
        Self::Record(value.clone())
    }
}

impl From<Fields> for Input {
    fn from(value: Fields) -> Self {
        Self::Fields(value)
    }
}

impl From<Command> for Input {
    fn from(value: Command) -> Self {
        Self::Command(value)
    }
}

impl<T: Into<Input>> From<Vec<T>> for Input {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Value(Value::null()),
        }
    }
}

impl From<i64> for RecordRef {
    fn from(value: i64) -> Self {
        Self::Id(value)
    }
}

impl From<i32> for RecordRef {
    fn from(value: i32) -> Self {
        Self::Id(value.into())
    }
}

impl From<Record> for RecordRef {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<&Record> for RecordRef {
    fn from(value: &Record) -> Self {
        Self::Record(value.clone())
    }
}

impl<T: Into<RecordRef>> From<Vec<T>> for RecordRef {
    fn from(value: Vec<T>) -> Self {
        Self::Many(value.into_iter().map(Into::into).collect())
    }
}

impl From<&[i64]> for RecordRef {
    fn from(value: &[i64]) -> Self {
        Self::Many(value.iter().copied().map(Self::Id).collect())
    }
}

impl From<&Record> for Value {
    fn from(value: &Record) -> Self {
        Value::I64(value.id())
    }
}
