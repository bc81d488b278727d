//! Column value conversion.
//!
//! A [`Converter`] turns the raw value a cursor produced into the value a
//! property expects. [`Converters`] is the registry consulted when a column is
//! read for a property of a given type.

mod builtin;
pub use builtin::Passthrough;

use rowgraph_core::{
    driver::{Column, SqlType},
    stmt::{Type, Value},
    Result,
};

use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// Converts raw column values to a target type.
///
/// Converters never see `Value::Null`; null column values are passed through
/// by the caller.
pub trait Converter: Debug + Send + Sync + 'static {
    /// The type produced by [`Converter::convert`].
    fn target(&self) -> Type;

    fn convert(&self, value: Value) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct Converters {
    by_type: HashMap<Type, Arc<dyn Converter>>,
    by_pair: HashMap<(Type, SqlType), Arc<dyn Converter>>,
    by_sql_type: HashMap<SqlType, Arc<dyn Converter>>,
    passthrough: Arc<dyn Converter>,
}

impl Converters {
    /// A registry with only the built-in scalar converters.
    pub fn new() -> Converters {
        let mut converters = Converters {
            by_type: HashMap::new(),
            by_pair: HashMap::new(),
            by_sql_type: HashMap::new(),
            passthrough: Arc::new(Passthrough),
        };

        for converter in builtin::scalars() {
            converters.register(converter);
        }

        converters
    }

    /// Registers `converter` for its target type, replacing any previous one.
    pub fn register(&mut self, converter: impl Converter) -> &mut Self {
        let converter: Arc<dyn Converter> = Arc::new(converter);
        self.by_type.insert(converter.target(), converter);
        self
    }

    /// Registers `converter` for columns of the given SQL type.
    ///
    /// When `ty` is set the converter is only used for columns declared with
    /// that type; otherwise it applies to any column of `sql_type`.
    pub fn register_sql_type(
        &mut self,
        ty: Option<Type>,
        sql_type: SqlType,
        converter: impl Converter,
    ) -> &mut Self {
        let converter: Arc<dyn Converter> = Arc::new(converter);
        match ty {
            Some(ty) => self.by_pair.insert((ty, sql_type), converter),
            None => self.by_sql_type.insert(sql_type, converter),
        };
        self
    }

    /// Returns the converter registered for `ty`.
    ///
    /// `Any` and `Unknown` have no converter of their own.
    pub fn get(&self, ty: &Type) -> Option<&Arc<dyn Converter>> {
        match ty {
            Type::Any | Type::Unknown => None,
            ty => self.by_type.get(ty),
        }
    }

    /// Returns `true` if values of `ty` can be read from a column.
    pub fn has(&self, ty: &Type) -> bool {
        matches!(ty, Type::Any) || self.by_type.contains_key(ty)
    }

    /// Picks the converter used to read `column` into a property of type `ty`.
    ///
    /// The property type wins. Without one, the column's declared type and SQL
    /// type are tried together, then each alone, and finally the value is
    /// passed through unchanged.
    pub fn resolve(&self, ty: &Type, column: &Column) -> Arc<dyn Converter> {
        if let Some(converter) = self.get(ty) {
            return converter.clone();
        }

        let by_pair = match (&column.declared, column.sql_type) {
            (Some(declared), Some(sql_type)) => self.by_pair.get(&(declared.clone(), sql_type)),
            _ => None,
        };

        by_pair
            .or_else(|| column.declared.as_ref().and_then(|declared| self.get(declared)))
            .or_else(|| column.sql_type.and_then(|sql_type| self.by_sql_type.get(&sql_type)))
            .unwrap_or(&self.passthrough)
            .clone()
    }
}

impl Default for Converters {
    fn default() -> Self {
        Converters::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Upper;

    impl Converter for Upper {
        fn target(&self) -> Type {
            Type::String
        }

        fn convert(&self, value: Value) -> Result<Value> {
            Ok(Value::from(value.to_string().to_uppercase()))
        }
    }

    #[test]
    fn property_type_wins() {
        let converters = Converters::new();
        let column = Column::new("n").declared(Type::String);

        let converter = converters.resolve(&Type::I64, &column);
        assert_eq!(converter.target(), Type::I64);
    }

    #[test]
    fn falls_back_to_declared_then_sql_type() {
        let mut converters = Converters::new();
        converters.register_sql_type(None, SqlType::Varchar, Upper);

        let declared = Column::new("a").declared(Type::I32);
        assert_eq!(converters.resolve(&Type::Any, &declared).target(), Type::I32);

        let sql = Column::new("b").sql_type(SqlType::Varchar);
        let converted = converters
            .resolve(&Type::Unknown, &sql)
            .convert(Value::from("x"))
            .unwrap();
        assert_eq!(converted, Value::from("X"));
    }

    #[test]
    fn pair_beats_declared() {
        let mut converters = Converters::new();
        converters.register_sql_type(Some(Type::String), SqlType::Other, Upper);

        let column = Column::new("c")
            .declared(Type::String)
            .sql_type(SqlType::Other);
        let converted = converters
            .resolve(&Type::Any, &column)
            .convert(Value::from("abc"))
            .unwrap();
        assert_eq!(converted, Value::from("ABC"));
    }

    #[test]
    fn passthrough_without_any_type_information() {
        let converters = Converters::new();
        let converter = converters.resolve(&Type::Any, &Column::new("d"));
        assert_eq!(converter.convert(Value::I64(7)).unwrap(), Value::I64(7));
    }

    #[test]
    fn any_is_readable() {
        let converters = Converters::new();
        assert!(converters.has(&Type::Any));
        assert!(converters.has(&Type::Uuid));
        assert!(!converters.has(&Type::object("Blog")));
        assert!(converters.get(&Type::Any).is_none());
    }
}
