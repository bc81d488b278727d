use super::{Value, ValueRecord};
use crate::{Error, Object, Result};

/// Reads a typed value out of a dynamic [`Value`].
pub trait Load: Sized {
    fn load(value: Value) -> Result<Self>;

    /// Appends `value` in place when `self` is a collection. Otherwise
    /// hands `value` back.
    fn append(&mut self, value: Value) -> Result<Option<Value>> {
        Ok(Some(value))
    }
}

impl Load for Value {
    fn load(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl Load for bool {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            _ => Err(Error::type_conversion(value, "bool")),
        }
    }
}

impl Load for i32 {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::I32(v) => Ok(v),
            Value::I64(v) => i32::try_from(v).map_err(|_| Error::type_conversion(value, "i32")),
            _ => Err(Error::type_conversion(value, "i32")),
        }
    }
}

impl Load for i64 {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            Value::I32(v) => Ok(v as i64),
            _ => Err(Error::type_conversion(value, "i64")),
        }
    }
}

impl Load for f64 {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            _ => Err(Error::type_conversion(value, "f64")),
        }
    }
}

impl Load for String {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            _ => Err(Error::type_conversion(value, "String")),
        }
    }
}

impl Load for uuid::Uuid {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(v) => Ok(v),
            _ => Err(Error::type_conversion(value, "uuid")),
        }
    }
}

impl Load for Object {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Object(v) => Ok(v),
            _ => Err(Error::type_conversion(value, "object")),
        }
    }
}

impl Load for ValueRecord {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Record(v) => Ok(v),
            _ => Err(Error::type_conversion(value, "record")),
        }
    }
}

impl<T: Load> Load for Option<T> {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => Ok(Some(T::load(value)?)),
        }
    }

    fn append(&mut self, value: Value) -> Result<Option<Value>> {
        match self {
            Some(inner) => inner.append(value),
            None => Ok(Some(value)),
        }
    }
}

/// Null loads as an empty list.
impl<T: Load> Load for Vec<T> {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(vec![]),
            Value::List(items) => items.into_iter().map(T::load).collect(),
            _ => Err(Error::type_conversion(value, "list")),
        }
    }

    fn append(&mut self, value: Value) -> Result<Option<Value>> {
        self.push(T::load(value)?);
        Ok(None)
    }
}
