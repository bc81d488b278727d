pub mod convert;
pub use convert::{Converter, Converters};

pub mod db;
pub use db::Db;

pub mod driver;

mod engine;

pub mod factory;
pub use factory::{DefaultObjectFactory, ObjectFactory};

mod session;
pub use session::Session;

pub mod settings;
pub use settings::Settings;

pub use rowgraph_core::{
    bail, err, impl_entity,
    object::{Lazy, LoadHandle, Loader, Row},
    schema::{Discriminator, FieldMapping, MappedStatement, ResultMap},
    stmt::{Fingerprint, RowBounds, Type, Value, ValueRecord},
    Entity, Error, Object, Result,
};
