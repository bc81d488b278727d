//! Materialization of cursor rows into object graphs.

mod deferred;
pub(crate) use deferred::DeferredLoad;

mod extract;
pub(crate) use extract::extract_from_list;

mod handler;
pub(crate) use handler::ResultSetHandler;

mod local_cache;
pub(crate) use local_cache::{CacheEntry, LocalCache};

mod result_set_meta;
pub(crate) use result_set_meta::ResultSetMeta;
