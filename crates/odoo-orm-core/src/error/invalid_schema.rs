use super::{Error, ErrorKind};

/// Error when a schema declaration cannot be honored.
///
/// This occurs when:
/// - An alias chain loops back on itself
/// - A union is not exactly one type plus one absence sentinel
/// - Two write keys resolve to the same remote field
/// - A relationship target or base model was never registered
/// - A nested create is given for a singular relationship
#[derive(Debug)]
pub(super) struct InvalidSchemaError {
    message: Box<str>,
}

impl std::error::Error for InvalidSchemaError {}

impl core::fmt::Display for InvalidSchemaError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(ErrorKind::InvalidSchema(InvalidSchemaError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.kind(), ErrorKind::InvalidSchema(_))
    }
}
