//! Declarative mapping configuration: result maps, field mappings,
//! discriminators and mapped statements.

mod builder;
pub use builder::Builder;

mod discriminator;
pub use discriminator::Discriminator;

mod field_mapping;
pub use field_mapping::FieldMapping;

mod result_map;
pub use result_map::{ResultMap, ResultMapBuilder};

mod statement;
pub use statement::MappedStatement;

mod verify;

use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// Immutable registry of result maps and statements.
#[derive(Debug, Default)]
pub struct Schema {
    result_maps: IndexMap<String, Arc<ResultMap>>,
    statements: IndexMap<String, Arc<MappedStatement>>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Looks up a result map by id.
    pub fn result_map(&self, id: &str) -> Result<&Arc<ResultMap>> {
        self.result_maps
            .get(id)
            .ok_or_else(|| Error::configuration(format!("unknown result map `{id}`")))
    }

    pub fn has_result_map(&self, id: &str) -> bool {
        self.result_maps.contains_key(id)
    }

    /// Looks up a mapped statement by id.
    pub fn statement(&self, id: &str) -> Result<&Arc<MappedStatement>> {
        self.statements
            .get(id)
            .ok_or_else(|| Error::configuration(format!("unknown statement `{id}`")))
    }

    pub fn has_statement(&self, id: &str) -> bool {
        self.statements.contains_key(id)
    }

    pub fn result_maps(&self) -> impl Iterator<Item = &ResultMap> {
        self.result_maps.values().map(|rm| &**rm)
    }

    pub fn statements(&self) -> impl Iterator<Item = &MappedStatement> {
        self.statements.values().map(|stmt| &**stmt)
    }
}
