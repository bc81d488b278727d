pub use rowgraph_core::{
    async_trait,
    driver::{Column, Cursor, Driver, MemCursor, Response, SqlType},
};
