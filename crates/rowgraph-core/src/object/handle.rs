use super::Entity;
use crate::stmt::{Type, Value};
use crate::Result;

use by_address::ByAddress;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to a materialized entity.
///
/// Cloning the handle does not clone the entity. Equality and hashing are by
/// address: two handles are equal only when they point at the same
/// instance.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Object {
    inner: ByAddress<Arc<Mutex<Box<dyn Entity>>>>,
}

impl Object {
    pub fn new<T: Entity>(entity: T) -> Object {
        Object::from_boxed(Box::new(entity))
    }

    pub fn from_boxed(entity: Box<dyn Entity>) -> Object {
        Object {
            inner: ByAddress(Arc::new(Mutex::new(entity))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Entity>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn type_name(&self) -> &'static str {
        self.lock().type_name()
    }

    pub fn get(&self, property: &str) -> Option<Value> {
        self.lock().get(property)
    }

    pub fn set(&self, property: &str, value: impl Into<Value>) -> Result<()> {
        self.lock().set(property, value.into())
    }

    pub fn push(&self, property: &str, value: impl Into<Value>) -> Result<()> {
        self.lock().push(property, value.into())
    }

    pub fn has_setter(&self, property: &str) -> bool {
        self.lock().has_setter(property)
    }

    pub fn setter_type(&self, property: &str) -> Option<Type> {
        self.lock().setter_type(property)
    }

    pub fn find_property(&self, name: &str, underscore_to_camel_case: bool) -> Option<String> {
        self.lock().find_property(name, underscore_to_camel_case)
    }

    /// Runs `f` against the entity if it is a `T`.
    pub fn with<T: Entity, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let entity = self.lock();
        entity.as_any().downcast_ref::<T>().map(f)
    }

    /// Runs `f` against the entity mutably if it is a `T`.
    pub fn with_mut<T: Entity, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut entity = self.lock();
        entity.as_any_mut().downcast_mut::<T>().map(f)
    }

    pub fn is<T: Entity>(&self) -> bool {
        self.lock().as_any().is::<T>()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.inner) as *const ()
    }
}

// Printing the entity would recurse through cycles.
impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Ok(entity) => write!(f, "{}@{:p}", entity.type_name(), self.addr()),
            Err(_) => write!(f, "Object@{:p}", self.addr()),
        }
    }
}
