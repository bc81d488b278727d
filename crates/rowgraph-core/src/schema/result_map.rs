use super::{Discriminator, FieldMapping};
use crate::stmt::Type;

use std::collections::HashSet;

/// Describes how rows become instances of one type.
///
/// A result map is immutable once built. Its mapping partitions and the set
/// of explicitly mapped columns are derived at build time.
#[derive(Debug)]
pub struct ResultMap {
    id: String,
    ty: Type,
    mappings: Vec<FieldMapping>,
    id_mappings: Vec<FieldMapping>,
    constructor_mappings: Vec<FieldMapping>,
    property_mappings: Vec<FieldMapping>,
    mapped_columns: HashSet<String>,
    discriminator: Option<Discriminator>,
    has_nested_result_maps: bool,
    has_nested_queries: bool,
    auto_mapping: Option<bool>,
}

#[derive(Debug)]
pub struct ResultMapBuilder {
    id: String,
    ty: Type,
    mappings: Vec<FieldMapping>,
    discriminator: Option<Discriminator>,
    auto_mapping: Option<bool>,
}

impl ResultMap {
    pub fn builder(id: impl Into<String>, ty: Type) -> ResultMapBuilder {
        ResultMapBuilder {
            id: id.into(),
            ty,
            mappings: vec![],
            discriminator: None,
            auto_mapping: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Mappings flagged as identity. When none are flagged, every mapping.
    pub fn id_mappings(&self) -> &[FieldMapping] {
        &self.id_mappings
    }

    pub fn constructor_mappings(&self) -> &[FieldMapping] {
        &self.constructor_mappings
    }

    pub fn property_mappings(&self) -> &[FieldMapping] {
        &self.property_mappings
    }

    /// Upper-cased names of explicitly mapped columns.
    pub fn mapped_columns(&self) -> &HashSet<String> {
        &self.mapped_columns
    }

    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    pub fn has_nested_result_maps(&self) -> bool {
        self.has_nested_result_maps
    }

    pub fn has_nested_queries(&self) -> bool {
        self.has_nested_queries
    }

    /// Per-map override of automatic mapping.
    pub fn auto_mapping(&self) -> Option<bool> {
        self.auto_mapping
    }

    /// Materializes rows of this map in nested mode even though none of its
    /// own mappings is a nested result map.
    pub(crate) fn force_nested_result_maps(&mut self) {
        self.has_nested_result_maps = true;
    }
}

impl ResultMapBuilder {
    pub fn mapping(mut self, mapping: FieldMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn mappings(mut self, mappings: impl IntoIterator<Item = FieldMapping>) -> Self {
        self.mappings.extend(mappings);
        self
    }

    pub fn discriminator(mut self, discriminator: Discriminator) -> Self {
        self.discriminator = Some(discriminator);
        self
    }

    pub fn auto_mapping(mut self, enabled: bool) -> Self {
        self.auto_mapping = Some(enabled);
        self
    }

    pub fn build(self) -> ResultMap {
        let mut id_mappings = vec![];
        let mut constructor_mappings = vec![];
        let mut property_mappings = vec![];
        let mut mapped_columns = HashSet::new();
        let mut has_nested_result_maps = false;
        let mut has_nested_queries = false;

        for mapping in &self.mappings {
            has_nested_result_maps |= mapping.has_nested_result_map();
            has_nested_queries |= mapping.nested_query.is_some();

            if let Some(column) = &mapping.column {
                mapped_columns.insert(column.to_uppercase());
            } else {
                for composite in &mapping.composites {
                    if let Some(column) = &composite.column {
                        mapped_columns.insert(column.to_uppercase());
                    }
                }
            }

            if mapping.constructor {
                constructor_mappings.push(mapping.clone());
            } else {
                property_mappings.push(mapping.clone());
            }

            if mapping.id {
                id_mappings.push(mapping.clone());
            }
        }

        if id_mappings.is_empty() {
            id_mappings = self.mappings.clone();
        }

        ResultMap {
            id: self.id,
            ty: self.ty,
            mappings: self.mappings,
            id_mappings,
            constructor_mappings,
            property_mappings,
            mapped_columns,
            discriminator: self.discriminator,
            has_nested_result_maps,
            has_nested_queries,
            auto_mapping: self.auto_mapping,
        }
    }
}
