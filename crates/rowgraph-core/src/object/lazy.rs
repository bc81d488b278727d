use crate::stmt::{Fingerprint, Load, Type, Value};
use crate::{async_trait, Result};

use std::sync::Arc;

/// Everything needed to run a nested query later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadHandle {
    inner: Arc<LoadHandleInner>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct LoadHandleInner {
    statement: String,
    parameter: Value,
    target: Type,
    key: Fingerprint,
}

impl LoadHandle {
    pub fn new(statement: impl Into<String>, parameter: Value, target: Type, key: Fingerprint) -> Self {
        LoadHandle {
            inner: Arc::new(LoadHandleInner {
                statement: statement.into(),
                parameter,
                target,
                key,
            }),
        }
    }

    /// Id of the nested statement.
    pub fn statement(&self) -> &str {
        &self.inner.statement
    }

    pub fn parameter(&self) -> &Value {
        &self.inner.parameter
    }

    /// Type of the property the result is assigned to.
    pub fn target(&self) -> &Type {
        &self.inner.target
    }

    /// Query-cache key of the nested statement.
    pub fn key(&self) -> &Fingerprint {
        &self.inner.key
    }
}

/// Runs the nested query behind a [`LoadHandle`].
#[async_trait]
pub trait Loader: Send {
    async fn load(&mut self, handle: &LoadHandle) -> Result<Value>;
}

/// A property loaded on first access.
#[derive(Debug, Clone)]
pub enum Lazy<T> {
    Loaded(T),
    Deferred(LoadHandle),
}

impl<T> Lazy<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Lazy::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Lazy::Loaded(value) => Some(value),
            Lazy::Deferred(_) => None,
        }
    }

    pub fn handle(&self) -> Option<&LoadHandle> {
        match self {
            Lazy::Loaded(_) => None,
            Lazy::Deferred(handle) => Some(handle),
        }
    }
}

impl<T: Load + Send> Lazy<T> {
    /// Returns the value, running the nested query on first access.
    pub async fn get<L>(&mut self, loader: &mut L) -> Result<&T>
    where
        L: Loader + ?Sized,
    {
        if let Lazy::Deferred(handle) = &*self {
            let value = loader.load(handle).await?;
            *self = Lazy::Loaded(T::load(value)?);
        }

        match self {
            Lazy::Loaded(value) => Ok(value),
            Lazy::Deferred(handle) => Err(crate::err!(
                "lazy value for `{}` was not resolved",
                handle.statement()
            )),
        }
    }
}

impl<T: Default> Default for Lazy<T> {
    fn default() -> Self {
        Lazy::Loaded(T::default())
    }
}

impl<T: Load> Load for Lazy<T> {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Lazy(handle) => Ok(Lazy::Deferred(handle)),
            value => Ok(Lazy::Loaded(T::load(value)?)),
        }
    }
}

impl<T> From<Lazy<T>> for Value
where
    Value: From<T>,
{
    fn from(src: Lazy<T>) -> Self {
        match src {
            Lazy::Loaded(value) => Value::from(value),
            Lazy::Deferred(handle) => Value::Lazy(handle),
        }
    }
}
