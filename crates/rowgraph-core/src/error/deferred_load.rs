use super::Error;

/// Context attached to a failure while applying a deferred or lazy association.
#[derive(Debug)]
pub(super) struct DeferredLoadError {
    owner: Box<str>,
    property: Box<str>,
}

impl std::error::Error for DeferredLoadError {}

impl core::fmt::Display for DeferredLoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "deferred load of `{}.{}` failed", self.owner, self.property)
    }
}

impl Error {
    /// Creates a deferred load error naming the owner type and property.
    ///
    /// Usually attached with [`Error::context`] to the underlying cause.
    pub fn deferred_load(owner: impl Into<String>, property: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DeferredLoad(DeferredLoadError {
            owner: owner.into().into(),
            property: property.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is a deferred load error.
    pub fn is_deferred_load(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::DeferredLoad(_)))
    }
}
