use super::Value;

/// The declared type of a property, column, or converter target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// 64-bit floating point number
    F64,

    /// String type
    String,

    /// Raw bytes
    Bytes,

    /// A UUID
    Uuid,

    /// A list of a single type
    List(Box<Type>),

    /// A named record, used for composite nested-query parameters
    Record,

    /// A dynamic property bag, materialized as [`Row`](crate::object::Row)
    Map,

    /// An instance of a registered entity type
    Object(String),

    /// Any value; read without conversion
    Any,

    /// A type that has not been declared and must be inferred
    Unknown,
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::Object(name.into())
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns `true` for types a single column value can be converted into.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::I32
                | Self::I64
                | Self::F64
                | Self::String
                | Self::Bytes
                | Self::Uuid
        )
    }

    /// The item type of a list type.
    pub fn list_item(&self) -> Option<&Type> {
        match self {
            Self::List(item) => Some(item),
            _ => None,
        }
    }

    /// The entity type name for object types.
    pub fn object_name(&self) -> Option<&str> {
        match self {
            Self::Object(name) => Some(name),
            _ => None,
        }
    }

    /// A short, static name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F64 => "f64",
            Self::String => "String",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::List(_) => "list",
            Self::Record => "record",
            Self::Map => "map",
            Self::Object(_) => "object",
            Self::Any => "any",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` if `value` is a valid instance of this type.
    pub fn is_a(&self, value: &Value) -> bool {
        value.is_a(self)
    }
}

impl From<&Self> for Type {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}
