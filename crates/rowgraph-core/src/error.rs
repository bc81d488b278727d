mod adhoc;
mod ambiguous_type;
mod configuration;
mod deferred_load;
mod driver;
mod identity;
mod too_many_records;
mod type_conversion;

use adhoc::AdhocError;
use ambiguous_type::AmbiguousTypeError;
use configuration::ConfigurationError;
use deferred_load::DeferredLoadError;
use driver::DriverError;
use identity::IdentityError;
use std::sync::Arc;
use too_many_records::TooManyRecordsError;
use type_conversion::TypeConversionError;

/// Returns early with an ad-hoc error built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error that can occur while materializing results.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        let inner = err.inner.get_or_insert_with(|| {
            Arc::new(ErrorInner {
                kind: ErrorKind::Unknown,
                cause: None,
            })
        });

        if let Some(inner) = Arc::get_mut(inner) {
            if inner.cause.is_none() {
                inner.cause = Some(self);
                return err;
            }
        }

        // The consequent is shared or already chained; wrap it in a fresh
        // node so the existing chain is left untouched.
        Error {
            inner: Some(Arc::new(ErrorInner {
                kind: ErrorKind::Adhoc(AdhocError::new(err.to_string())),
                cause: Some(self),
            })),
        }
    }

    /// Returns the innermost error of the context chain.
    pub fn root(&self) -> &Error {
        let mut root = self;
        for err in self.chain() {
            root = err;
        }
        root
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// Returns `true` if any error in the context chain satisfies `f`.
    fn any(&self, f: impl Fn(&ErrorKind) -> bool) -> bool {
        self.chain().any(|err| f(err.kind()))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    AmbiguousType(AmbiguousTypeError),
    Configuration(ConfigurationError),
    DeferredLoad(DeferredLoadError),
    Driver(DriverError),
    Identity(IdentityError),
    TooManyRecords(TooManyRecordsError),
    TypeConversion(TypeConversionError),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            AmbiguousType(err) => core::fmt::Display::fmt(err, f),
            Configuration(err) => core::fmt::Display::fmt(err, f),
            DeferredLoad(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            Identity(err) => core::fmt::Display::fmt(err, f),
            TooManyRecords(err) => core::fmt::Display::fmt(err, f),
            TypeConversion(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown rowgraph error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::from_args(format_args!("root cause"));
        let mid = Error::from_args(format_args!("middle context"));
        let top = Error::from_args(format_args!("top context"));

        let chained = root.context(mid).context(top);
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
    }

    #[test]
    fn predicates_see_through_context() {
        let err = Error::type_conversion(crate::stmt::Value::I64(1), "uuid")
            .context(crate::err!("column `ID`"));

        assert!(err.is_type_conversion());
        assert!(!err.is_configuration());
    }

    #[test]
    fn context_on_shared_consequent_keeps_both() {
        let outer = crate::err!("outer");
        let keep = outer.clone();
        let err = crate::err!("root").context(outer);

        assert_eq!(err.to_string(), "outer: root");
        assert_eq!(keep.to_string(), "outer");
    }

    #[test]
    fn root_is_innermost() {
        let err = Error::identity("single contribution").context(crate::err!("combining keys"));
        assert!(err.root().to_string().contains("single contribution"));
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn type_conversion_error() {
        let value = crate::stmt::Value::I64(42);
        let err = Error::type_conversion(value, "String");
        assert_eq!(err.to_string(), "cannot convert I64 to String");
    }

    #[test]
    fn too_many_records_with_context() {
        let err = Error::too_many_records("expected 1 record, found 3");
        assert_eq!(err.to_string(), "too many records: expected 1 record, found 3");
    }

    #[test]
    fn deferred_load_names_owner_and_property() {
        let err = crate::err!("boom").context(Error::deferred_load("Blog", "author"));
        assert!(err.is_deferred_load());
        assert_eq!(err.to_string(), "deferred load of `Blog.author` failed: boom");
    }
}
