use super::Error;

/// Error when an operation expects at most one record but finds several.
#[derive(Debug)]
pub(super) struct TooManyRecordsError {
    context: Option<Box<str>>,
}

impl std::error::Error for TooManyRecordsError {}

impl core::fmt::Display for TooManyRecordsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("too many records")?;
        if let Some(ref ctx) = self.context {
            write!(f, ": {}", ctx)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a too many records error.
    pub fn too_many_records(context: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TooManyRecords(TooManyRecordsError {
            context: Some(context.into().into()),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a too many records error.
    pub fn is_too_many_records(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::TooManyRecords(_)))
    }
}
