use super::{row_key::identity_value, ResultSetHandler};
use crate::engine::ResultSetMeta;

use rowgraph_core::{
    schema::FieldMapping,
    stmt::{Fingerprint, Value},
    Error, Object, Result,
};

use tracing::warn;

/// A parent row waiting for the rows of a named result set.
#[derive(Debug, Clone)]
pub(super) struct PendingRelation {
    owner: Object,
    mapping: FieldMapping,
}

impl ResultSetHandler {
    pub(super) fn add_pending_child_relation(
        &mut self,
        meta: &ResultSetMeta,
        owner: &Object,
        mapping: &FieldMapping,
    ) -> Result<()> {
        let result_set = mapping.result_set.as_deref().unwrap_or_default();
        let key = create_key_for_multiple_results(meta, mapping, mapping.columns())?;

        self.pending_relations
            .entry(key)
            .or_default()
            .push(PendingRelation {
                owner: owner.clone(),
                mapping: mapping.clone(),
            });

        match self.next_result_maps.get(result_set) {
            None => {
                self.next_result_maps
                    .insert(result_set.to_string(), mapping.clone());
            }
            Some(previous) if previous != mapping => {
                return Err(Error::configuration(format!(
                    "two different properties are mapped to the same result set `{result_set}`"
                )));
            }
            Some(_) => {}
        }

        Ok(())
    }

    /// Attaches a row of a named result set to every parent that referenced
    /// it.
    pub(super) fn link_to_parents(
        &mut self,
        meta: &mut ResultSetMeta,
        parent_mapping: &FieldMapping,
        value: Value,
    ) -> Result<()> {
        let key = create_key_for_multiple_results(meta, parent_mapping, parent_mapping.foreign_columns())?;

        let Some(parents) = self.pending_relations.get(&key) else {
            warn!(
                result_set = parent_mapping.result_set.as_deref().unwrap_or_default(),
                key = %key,
                "row has no parent; skipping"
            );
            return Ok(());
        };

        for parent in parents {
            self.instantiate_collection_property(&parent.owner, &parent.mapping)?;

            if !value.is_null() {
                self.link_objects(&parent.owner, &parent.mapping, value.clone())?;
            }
        }

        Ok(())
    }
}

/// Key joining a parent's `column` values to a child's `foreign_column`
/// values. Integers of either width join.
fn create_key_for_multiple_results<'a>(
    meta: &ResultSetMeta,
    mapping: &FieldMapping,
    columns: impl Iterator<Item = &'a str>,
) -> Result<Fingerprint> {
    let mut key = Fingerprint::builder();
    key.contribute(mapping.property.as_deref().unwrap_or_default());
    key.contribute(mapping.result_set.as_deref().unwrap_or_default());

    for (name, column) in mapping.columns().zip(columns) {
        let value = meta.get(column)?;
        if !value.is_null() {
            key.contribute(name.to_uppercase());
            key.contribute(identity_value(value));
        }
    }

    Ok(key.build())
}
