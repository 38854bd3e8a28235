use super::{Error, ErrorKind};

/// Error when a lookup asserting uniqueness matches more than one record.
#[derive(Debug)]
pub(super) struct MultipleRecordsFoundError {
    model: Box<str>,
    ids: Vec<i64>,
}

impl std::error::Error for MultipleRecordsFoundError {}

impl core::fmt::Display for MultipleRecordsFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "multiple {} records found: ", self.model)?;
        super::fmt_ids(f, &self.ids)
    }
}

impl Error {
    /// Creates a multiple records found error naming every matched id.
    pub fn multiple_records_found(model: impl Into<String>, ids: Vec<i64>) -> Error {
        Error::from(ErrorKind::MultipleRecordsFound(MultipleRecordsFoundError {
            model: model.into().into(),
            ids,
        }))
    }

    /// Returns `true` if this error is a multiple records found error.
    pub fn is_multiple_records_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::MultipleRecordsFound(_))
    }

    /// The matched ids, if this is a multiple records found error.
    pub fn matched_ids(&self) -> Option<&[i64]> {
        match self.kind() {
            ErrorKind::MultipleRecordsFound(err) => Some(&err.ids),
            _ => None,
        }
    }
}
