use super::Error;

/// Error when a discriminator resolves to a result map that does not exist.
#[derive(Debug)]
pub(super) struct AmbiguousTypeError {
    result_map: Box<str>,
    case: Box<str>,
    target: Box<str>,
}

impl std::error::Error for AmbiguousTypeError {}

impl core::fmt::Display for AmbiguousTypeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous type: discriminator of `{}` maps value `{}` to unknown result map `{}`",
            self.result_map, self.case, self.target
        )
    }
}

impl Error {
    /// Creates an ambiguous type error.
    pub fn ambiguous_type(
        result_map: impl Into<String>,
        case: impl Into<String>,
        target: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::AmbiguousType(AmbiguousTypeError {
            result_map: result_map.into().into(),
            case: case.into().into(),
            target: target.into().into(),
        }))
    }

    /// Returns `true` if this error, or any error it wraps, is an ambiguous type error.
    pub fn is_ambiguous_type(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::AmbiguousType(_)))
    }
}
