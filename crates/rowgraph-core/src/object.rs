//! Runtime object model for materialized entities.
//!
//! Materialized rows become [`Object`]s: shared handles over a boxed
//! [`Entity`]. Objects compare by identity, so a cyclic graph can hold the
//! same instance in several places.

mod entity;
pub use entity::{find_property, push_by_copy, Entity};

mod handle;
pub use handle::Object;

mod lazy;
pub use lazy::{Lazy, LoadHandle, Loader};

mod row;
pub use row::Row;
