use super::{Error, ErrorKind};

/// Error raised by the transport collaborator (connectivity, authentication,
/// server-side faults). Never retried.
#[derive(Debug)]
pub(super) struct TransportError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(ErrorKind::Transport(TransportError {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error came from the transport.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport(_))
    }
}
