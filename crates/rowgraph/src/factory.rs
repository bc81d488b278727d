use rowgraph_core::{
    object::Row,
    stmt::{Type, Value},
    Entity, Error, Object, Result,
};

use std::{collections::HashMap, fmt, sync::Arc};

/// Instantiates result objects by type.
pub trait ObjectFactory: Send + Sync + 'static {
    /// Creates an instance with every property unset.
    fn create(&self, ty: &Type) -> Result<Object>;

    /// Creates an instance through its constructor.
    ///
    /// `arg_types` holds the declared type of each argument, in the same order
    /// as `args`.
    fn create_with_args(&self, ty: &Type, arg_types: &[Type], args: Vec<Value>) -> Result<Object>;

    /// Returns `true` if properties of `ty` collect many values.
    fn is_collection(&self, ty: &Type) -> bool {
        ty.is_list()
    }
}

type CreateFn = Arc<dyn Fn() -> Box<dyn Entity> + Send + Sync>;

type ConstructFn = Arc<dyn Fn(Vec<Value>) -> Result<Box<dyn Entity>> + Send + Sync>;

/// Factory backed by registered entity types.
///
/// [`Type::Map`] always instantiates a [`Row`].
#[derive(Default, Clone)]
pub struct DefaultObjectFactory {
    defaults: HashMap<String, CreateFn>,
    constructors: HashMap<String, ConstructFn>,
}

impl DefaultObjectFactory {
    pub fn new() -> DefaultObjectFactory {
        DefaultObjectFactory::default()
    }

    /// Registers `T` under the type name its default instance reports.
    pub fn register<T: Entity + Default>(&mut self) -> &mut Self {
        let name = T::default().type_name();
        self.defaults
            .insert(name.to_string(), Arc::new(|| Box::new(T::default())));
        self
    }

    /// Registers a constructor used when a result map declares constructor
    /// arguments for `name`.
    pub fn register_constructor<T, F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        T: Entity,
        F: Fn(Vec<Value>) -> Result<T> + Send + Sync + 'static,
    {
        self.constructors.insert(
            name.into(),
            Arc::new(move |args| Ok(Box::new(f(args)?) as Box<dyn Entity>)),
        );
        self
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.defaults.contains_key(name) || self.constructors.contains_key(name)
    }
}

impl ObjectFactory for DefaultObjectFactory {
    fn create(&self, ty: &Type) -> Result<Object> {
        match ty {
            Type::Map => Ok(Object::new(Row::new())),
            Type::Object(name) => match self.defaults.get(name) {
                Some(create) => Ok(Object::from_boxed(create())),
                None => Err(Error::configuration(format!(
                    "type `{name}` has no default constructor"
                ))),
            },
            _ => Err(Error::configuration(format!(
                "cannot instantiate values of type `{}`",
                ty.name()
            ))),
        }
    }

    fn create_with_args(&self, ty: &Type, arg_types: &[Type], args: Vec<Value>) -> Result<Object> {
        let Some(name) = ty.object_name() else {
            return Err(Error::configuration(format!(
                "cannot construct values of type `{}`",
                ty.name()
            )));
        };

        let Some(construct) = self.constructors.get(name) else {
            return Err(Error::configuration(format!(
                "type `{name}` has no registered constructor"
            )));
        };

        if arg_types.len() != args.len() {
            rowgraph_core::bail!(
                "constructor of `{name}` expects {} arguments, got {}",
                arg_types.len(),
                args.len()
            );
        }

        for (arg, ty) in args.iter().zip(arg_types) {
            if !arg.is_a(ty) {
                return Err(Error::type_conversion(arg.clone(), ty.name())
                    .context(rowgraph_core::err!("constructor argument of `{name}`")));
            }
        }

        Ok(Object::from_boxed(construct(args)?))
    }
}

impl fmt::Debug for DefaultObjectFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut defaults: Vec<_> = self.defaults.keys().collect();
        defaults.sort();
        let mut constructors: Vec<_> = self.constructors.keys().collect();
        constructors.sort();

        f.debug_struct("DefaultObjectFactory")
            .field("defaults", &defaults)
            .field("constructors", &constructors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowgraph_core::impl_entity;

    #[derive(Debug, Default)]
    struct Tag {
        id: i64,
        name: Option<String>,
    }

    impl_entity!(Tag as "Tag" {
        id: Type::I64,
        name: Type::String,
    });

    #[test]
    fn create_registered_and_map() {
        let mut factory = DefaultObjectFactory::new();
        factory.register::<Tag>();

        let tag = factory.create(&Type::object("Tag")).unwrap();
        assert!(tag.is::<Tag>());

        let row = factory.create(&Type::Map).unwrap();
        assert_eq!(row.type_name(), Row::TYPE_NAME);
    }

    #[test]
    fn unknown_type_is_configuration_error() {
        let factory = DefaultObjectFactory::new();
        let err = factory.create(&Type::object("Missing")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn constructor_checks_arguments() {
        let mut factory = DefaultObjectFactory::new();
        factory.register_constructor("Tag", |args: Vec<Value>| {
            let mut args = args.into_iter();
            Ok(Tag {
                id: args.next().and_then(|v| v.as_i64()).unwrap_or_default(),
                name: args.next().and_then(|v| v.as_str().map(str::to_string)),
            })
        });

        let ty = Type::object("Tag");
        let arg_types = [Type::I64, Type::String];

        let tag = factory
            .create_with_args(&ty, &arg_types, vec![Value::I64(4), Value::from("rust")])
            .unwrap();
        assert_eq!(tag.with(|t: &Tag| t.id), Some(4));
        assert_eq!(tag.get("name"), Some(Value::from("rust")));

        let err = factory
            .create_with_args(&ty, &arg_types, vec![Value::from("4"), Value::Null])
            .unwrap_err();
        assert!(err.is_type_conversion());
    }
}
