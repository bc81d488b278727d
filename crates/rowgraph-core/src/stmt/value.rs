use super::{Type, ValueRecord};
use crate::object::{LoadHandle, Object};

use std::hash::{Hash, Hasher};

#[derive(Debug, Default, Clone)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// 64-bit floating point number
    F64(f64),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// A nested-query result that has not been loaded yet
    Lazy(LoadHandle),

    /// A list of values
    List(Vec<Value>),

    /// Null value
    #[default]
    Null,

    /// A materialized entity instance
    Object(Object),

    /// A named record, used for composite nested-query parameters
    Record(ValueRecord),

    /// String value
    String(String),

    /// A UUID
    Uuid(uuid::Uuid),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            Self::I32(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValueRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_object(&self) -> &Object {
        match self {
            Self::Object(object) => object,
            _ => panic!("expected object; actual={self:#?}"),
        }
    }

    #[track_caller]
    pub fn expect_list(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            _ => panic!("expected list; actual={self:#?}"),
        }
    }

    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Infers the type of the value. Lists take the type of their first item.
    pub fn infer_ty(&self) -> Type {
        match self {
            Self::Bool(_) => Type::Bool,
            Self::Bytes(_) => Type::Bytes,
            Self::F64(_) => Type::F64,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::Lazy(handle) => handle.target().clone(),
            Self::List(items) => match items.first() {
                Some(item) => Type::list(item.infer_ty()),
                None => Type::list(Type::Unknown),
            },
            Self::Null => Type::Unknown,
            Self::Object(object) => Type::object(object.type_name()),
            Self::Record(_) => Type::Record,
            Self::String(_) => Type::String,
            Self::Uuid(_) => Type::Uuid,
        }
    }

    /// Returns `true` if the value can be stored in a slot of type `ty`.
    /// Null fits every type.
    pub fn is_a(&self, ty: &Type) -> bool {
        match (self, ty) {
            (Self::Null, _) | (_, Type::Any) | (_, Type::Unknown) => true,
            (Self::Bool(_), Type::Bool)
            | (Self::Bytes(_), Type::Bytes)
            | (Self::F64(_), Type::F64)
            | (Self::I32(_), Type::I32)
            | (Self::I64(_), Type::I64)
            | (Self::String(_), Type::String)
            | (Self::Uuid(_), Type::Uuid)
            | (Self::Record(_), Type::Record) => true,
            (Self::List(items), Type::List(item)) => items.iter().all(|v| v.is_a(item)),
            (Self::Object(object), Type::Object(name)) => object.type_name() == name,
            (Self::Object(object), Type::Map) => object.type_name() == crate::object::Row::TYPE_NAME,
            (Self::Lazy(handle), ty) => handle.target() == ty,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            // Bitwise so that equality agrees with `Hash`
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::Lazy(a), Self::Lazy(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::Bool(v) => v.hash(state),
            Self::Bytes(v) => v.hash(state),
            Self::F64(v) => v.to_bits().hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::Lazy(v) => v.hash(state),
            Self::List(v) => v.hash(state),
            Self::Null => {}
            Self::Object(v) => v.hash(state),
            Self::Record(v) => v.hash(state),
            Self::String(v) => v.hash(state),
            Self::Uuid(v) => v.hash(state),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::F64(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Lazy(handle) => write!(f, "lazy({})", handle.statement()),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Null => f.write_str("null"),
            Self::Object(object) => write!(f, "{object:?}"),
            Self::Record(record) => write!(f, "{record}"),
            Self::String(v) => f.write_str(v),
            Self::Uuid(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<uuid::Uuid> for Value {
    fn from(src: uuid::Uuid) -> Self {
        Self::Uuid(src)
    }
}

impl From<Object> for Value {
    fn from(src: Object) -> Self {
        Self::Object(src)
    }
}

impl From<ValueRecord> for Value {
    fn from(src: ValueRecord) -> Self {
        Self::Record(src)
    }
}

impl From<LoadHandle> for Value {
    fn from(src: LoadHandle) -> Self {
        Self::Lazy(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}

impl<T> From<Vec<T>> for Value
where
    Value: From<T>,
{
    fn from(src: Vec<T>) -> Self {
        Self::List(src.into_iter().map(Value::from).collect())
    }
}
