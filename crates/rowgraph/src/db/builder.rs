use super::{Db, Shared};
use crate::{Converter, Converters, DefaultObjectFactory, ObjectFactory, Settings};

use rowgraph_core::{
    driver::{Driver, SqlType},
    schema::{self, MappedStatement, ResultMap},
    stmt::{Type, Value},
    Entity, Error, Result,
};

use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    /// Result maps and statements, verified together on build
    schema: schema::Builder,

    settings: Settings,

    converters: Converters,

    /// Registered entity types, used unless a custom factory is set
    entities: DefaultObjectFactory,

    factory: Option<Arc<dyn ObjectFactory>>,
}

impl Builder {
    pub fn register_result_map(&mut self, result_map: ResultMap) -> &mut Self {
        self.schema.result_map(result_map);
        self
    }

    pub fn register_statement(&mut self, statement: MappedStatement) -> &mut Self {
        self.schema.statement(statement);
        self
    }

    /// Makes `T` instantiable by result maps of `Type::Object(T::type_name())`.
    pub fn register_entity<T: Entity + Default>(&mut self) -> &mut Self {
        self.entities.register::<T>();
        self
    }

    /// Registers the constructor used by result maps of `name` that declare
    /// constructor arguments.
    pub fn register_constructor<T, F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        T: Entity,
        F: Fn(Vec<Value>) -> Result<T> + Send + Sync + 'static,
    {
        self.entities.register_constructor(name, f);
        self
    }

    pub fn register_converter(&mut self, converter: impl Converter) -> &mut Self {
        self.converters.register(converter);
        self
    }

    pub fn register_sql_type_converter(
        &mut self,
        ty: Option<Type>,
        sql_type: SqlType,
        converter: impl Converter,
    ) -> &mut Self {
        self.converters.register_sql_type(ty, sql_type, converter);
        self
    }

    /// Replaces the registered entities with a custom factory.
    pub fn object_factory(&mut self, factory: impl ObjectFactory) -> &mut Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn settings(&mut self, settings: Settings) -> &mut Self {
        self.settings = settings;
        self
    }

    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = std::mem::take(&mut self.schema).build()?;

        let factory = match self.factory.take() {
            Some(factory) => factory,
            None => {
                for result_map in schema.result_maps() {
                    if let Type::Object(name) = result_map.ty() {
                        if !self.entities.is_registered(name) {
                            return Err(Error::configuration(format!(
                                "result map `{}` targets unregistered type `{name}`",
                                result_map.id()
                            )));
                        }
                    }
                }
                Arc::new(std::mem::take(&mut self.entities)) as Arc<dyn ObjectFactory>
            }
        };

        Ok(Db {
            shared: Arc::new(Shared {
                schema,
                settings: self.settings.clone(),
                converters: std::mem::take(&mut self.converters),
                factory,
                driver: Arc::new(driver),
            }),
        })
    }
}
