use super::FieldMapping;
use crate::stmt::Type;

use indexmap::IndexMap;

/// Picks a more specific result map per row from a column value.
#[derive(Debug, Clone, PartialEq)]
pub struct Discriminator {
    mapping: FieldMapping,
    cases: IndexMap<String, String>,
}

impl Discriminator {
    pub fn new(column: impl Into<String>, ty: Type) -> Discriminator {
        Discriminator {
            mapping: FieldMapping {
                column: Some(column.into()),
                ty: Some(ty),
                ..FieldMapping::default()
            },
            cases: IndexMap::new(),
        }
    }

    /// Maps the stringified column value `value` to `result_map`.
    pub fn case(mut self, value: impl Into<String>, result_map: impl Into<String>) -> Self {
        self.cases.insert(value.into(), result_map.into());
        self
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn column(&self) -> &str {
        self.mapping.column.as_deref().unwrap_or_default()
    }

    pub fn cases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The result map id for a stringified discriminator value.
    pub fn map_id_for(&self, value: &str) -> Option<&str> {
        self.cases.get(value).map(String::as_str)
    }
}
