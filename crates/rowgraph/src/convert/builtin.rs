use super::Converter;

use rowgraph_core::{
    stmt::{Type, Value},
    Error, Result,
};

pub(super) fn scalars() -> Vec<Scalar> {
    [
        Type::Bool,
        Type::I32,
        Type::I64,
        Type::F64,
        Type::String,
        Type::Bytes,
        Type::Uuid,
    ]
    .into_iter()
    .map(Scalar)
    .collect()
}

/// Converts between the built-in scalar representations.
#[derive(Debug)]
pub(super) struct Scalar(Type);

/// Returns column values unchanged.
#[derive(Debug)]
pub struct Passthrough;

impl Converter for Scalar {
    fn target(&self) -> Type {
        self.0.clone()
    }

    fn convert(&self, value: Value) -> Result<Value> {
        let ty = &self.0;
        let converted = match (ty, value) {
            (Type::Bool, Value::Bool(v)) => Value::Bool(v),
            (Type::Bool, Value::I32(v)) => Value::Bool(v != 0),
            (Type::Bool, Value::I64(v)) => Value::Bool(v != 0),
            (Type::I32, Value::I32(v)) => Value::I32(v),
            (Type::I32, Value::I64(v)) => match i32::try_from(v) {
                Ok(v) => Value::I32(v),
                Err(_) => return Err(Error::type_conversion(Value::I64(v), ty.name())),
            },
            (Type::I32, Value::String(s)) => Value::I32(parse(s, ty)?),
            (Type::I64, Value::I64(v)) => Value::I64(v),
            (Type::I64, Value::I32(v)) => Value::I64(v.into()),
            (Type::I64, Value::String(s)) => Value::I64(parse(s, ty)?),
            (Type::F64, Value::F64(v)) => Value::F64(v),
            (Type::F64, Value::I32(v)) => Value::F64(v.into()),
            (Type::F64, Value::I64(v)) => Value::F64(v as f64),
            (Type::String, Value::String(s)) => Value::String(s),
            (
                Type::String,
                v @ (Value::Bool(_) | Value::I32(_) | Value::I64(_) | Value::F64(_) | Value::Uuid(_)),
            ) => Value::String(v.to_string()),
            (Type::Bytes, Value::Bytes(v)) => Value::Bytes(v),
            (Type::Bytes, Value::String(s)) => Value::Bytes(s.into_bytes()),
            (Type::Uuid, Value::Uuid(v)) => Value::Uuid(v),
            (Type::Uuid, Value::String(s)) => Value::Uuid(parse(s, ty)?),
            (Type::Uuid, Value::Bytes(bytes)) => {
                let parsed = uuid::Uuid::from_slice(&bytes).ok();
                Value::Uuid(parsed.ok_or_else(|| Error::type_conversion(Value::Bytes(bytes), ty.name()))?)
            }
            (_, value) => return Err(Error::type_conversion(value, ty.name())),
        };
        Ok(converted)
    }
}

/// Parses a string column, keeping the string for the error.
fn parse<T: std::str::FromStr>(s: String, ty: &Type) -> Result<T> {
    let parsed = s.trim().parse::<T>().ok();
    parsed.ok_or_else(|| Error::type_conversion(Value::String(s), ty.name()))
}

impl Converter for Passthrough {
    fn target(&self) -> Type {
        Type::Any
    }

    fn convert(&self, value: Value) -> Result<Value> {
        Ok(value)
    }
}
