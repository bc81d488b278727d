use super::Error;

/// Error when the mapping configuration cannot satisfy a query.
///
/// This occurs when:
/// - A statement produced rows but declares no result map
/// - A statement, result map, or entity type id is not registered
/// - Two different properties are mapped to the same secondary result set
/// - Row bounds are applied to nested mappings while safe row bounds are on
///
/// These are programming errors in the mapping, not transient faults, and are
/// never retried.
#[derive(Debug)]
pub(super) struct ConfigurationError {
    message: Box<str>,
}

impl std::error::Error for ConfigurationError {}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl Error {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Configuration(ConfigurationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a configuration error.
    pub fn is_configuration(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Configuration(_)))
    }
}
