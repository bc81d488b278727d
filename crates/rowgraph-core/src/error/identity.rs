use super::Error;

/// Error when two fingerprints cannot be combined into a meaningful identity.
#[derive(Debug)]
pub(super) struct IdentityError {
    message: Box<str>,
}

impl std::error::Error for IdentityError {}

impl core::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "identity error: {}", self.message)
    }
}

impl Error {
    /// Creates an identity error.
    pub fn identity(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Identity(IdentityError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is an identity error.
    pub fn is_identity(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Identity(_)))
    }
}
