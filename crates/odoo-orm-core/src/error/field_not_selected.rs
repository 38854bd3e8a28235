use super::{Error, ErrorKind};

/// Error when a declared field is read from a record fetched without it.
#[derive(Debug)]
pub(super) struct FieldNotSelectedError {
    model: Box<str>,
    field: Box<str>,
}

impl std::error::Error for FieldNotSelectedError {}

impl core::fmt::Display for FieldNotSelectedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "field `{}` of {} was not selected", self.field, self.model)
    }
}

impl Error {
    /// Creates a field not selected error.
    pub fn field_not_selected(model: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(ErrorKind::FieldNotSelected(FieldNotSelectedError {
            model: model.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is a field not selected error.
    pub fn is_field_not_selected(&self) -> bool {
        matches!(self.kind(), ErrorKind::FieldNotSelected(_))
    }
}
