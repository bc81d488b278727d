#[macro_use]
mod macros;

pub mod driver;
pub use driver::{Cursor, Driver};

mod error;
pub use error::{Error, IntoError};

pub mod object;
pub use object::{Entity, Object};

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses rowgraph's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
