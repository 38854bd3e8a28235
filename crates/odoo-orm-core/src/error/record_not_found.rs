use super::{Error, ErrorKind};

/// Error when one or more requested ids are absent from a read.
#[derive(Debug)]
pub(super) struct RecordNotFoundError {
    model: Box<str>,
    /// Missing ids, sorted ascending.
    ids: Vec<i64>,
}

impl std::error::Error for RecordNotFoundError {}

impl core::fmt::Display for RecordNotFoundError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.ids.is_empty() {
            return write!(f, "{} record not found", self.model);
        }

        write!(f, "{} records not found: ", self.model)?;
        super::fmt_ids(f, &self.ids)
    }
}

impl Error {
    /// Creates a record not found error naming the missing ids.
    pub fn record_not_found(model: impl Into<String>, mut ids: Vec<i64>) -> Error {
        ids.sort_unstable();
        ids.dedup();

        Error::from(ErrorKind::RecordNotFound(RecordNotFoundError {
            model: model.into().into(),
            ids,
        }))
    }

    /// Returns `true` if this error is a record not found error.
    pub fn is_record_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::RecordNotFound(_))
    }

    /// The ids reported missing, if this is a record not found error.
    pub fn missing_ids(&self) -> Option<&[i64]> {
        match self.kind() {
            ErrorKind::RecordNotFound(err) => Some(&err.ids),
            _ => None,
        }
    }
}
