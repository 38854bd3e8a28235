use super::{Error, ErrorKind};

#[derive(Debug)]
pub(super) struct UnknownFieldError {
    model: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnknownFieldError {}

impl core::fmt::Display for UnknownFieldError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} has no field `{}`", self.model, self.field)
    }
}

impl Error {
    /// Creates an unknown field error.
    ///
    /// Raised for undeclared names when the model does not opt into raw
    /// passthrough, and for names absent from both schema and payload.
    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(ErrorKind::UnknownField(UnknownFieldError {
            model: model.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown field error.
    pub fn is_unknown_field(&self) -> bool {
        matches!(self.kind(), ErrorKind::UnknownField(_))
    }
}
