mod column;
pub use column::{Column, SqlType};

mod cursor;
pub use cursor::Cursor;

mod mem;
pub use mem::MemCursor;

mod response;
pub use response::Response;

use crate::schema::MappedStatement;
use crate::stmt::{RowBounds, Value};
use crate::{async_trait, Result};

use std::fmt::Debug;

/// Runs mapped statements against a data source.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Runs a query and returns its result sets in order.
    ///
    /// `bounds` is advisory. Drivers may apply it themselves; the
    /// materializer applies it either way.
    async fn query(
        &self,
        statement: &MappedStatement,
        parameter: &Value,
        bounds: RowBounds,
    ) -> Result<Response>;

    /// Runs a write and returns the number of affected rows.
    async fn update(&self, statement: &MappedStatement, parameter: &Value) -> Result<u64>;
}
