use super::{column_prefix, ResultSetHandler};
use crate::{engine::ResultSetMeta, Session};

use rowgraph_core::{
    schema::{FieldMapping, ResultMap},
    stmt::{Fingerprint, Value},
    Object, Result,
};

use async_recursion::async_recursion;
use std::sync::Arc;

impl ResultSetHandler {
    /// Materializes one row with a result map that has nested result maps.
    ///
    /// `partial` is the object an earlier row with the same key produced;
    /// the row then only contributes to its nested associations.
    pub(super) async fn get_row_value_nested(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &Arc<ResultMap>,
        combined_key: &Fingerprint,
        prefix: &str,
        partial: Option<Value>,
    ) -> Result<Value> {
        let ancestor_key = self.create_ancestor_key(meta, result_map, prefix)?;

        if let Some(value) = partial {
            if let Some(object) = value.as_object() {
                let registered = self.put_ancestor(&ancestor_key, object);
                let res = self
                    .apply_nested_result_mappings(
                        session,
                        meta,
                        result_map,
                        object,
                        prefix,
                        combined_key,
                        false,
                    )
                    .await;
                if registered {
                    self.ancestor_objects.remove(&ancestor_key);
                }
                res?;
            }
            return Ok(value);
        }

        let value = self
            .create_result_object(session, meta, result_map, prefix)
            .await?;

        let value = match self.target_object(&value, result_map) {
            Some(object) => {
                let mut found = !result_map.constructor_mappings().is_empty();
                found |= self
                    .apply_property_mappings(session, meta, result_map, &object, prefix)
                    .await?;

                if self.should_apply_automatic_mappings(result_map, true) {
                    found |= self.apply_automatic_mappings(meta, result_map, &object, prefix)?;
                }

                let registered = self.put_ancestor(&ancestor_key, &object);
                let res = self
                    .apply_nested_result_mappings(
                        session,
                        meta,
                        result_map,
                        &object,
                        prefix,
                        combined_key,
                        true,
                    )
                    .await;
                if registered {
                    self.ancestor_objects.remove(&ancestor_key);
                }
                found |= res?;

                self.null_if_empty(value, found)
            }
            None => value,
        };

        if !combined_key.is_null() && !value.is_null() {
            self.nested_result_objects
                .insert(combined_key.clone(), value.clone());
        }

        Ok(value)
    }

    #[async_recursion]
    async fn apply_nested_result_mappings(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        object: &Object,
        parent_prefix: &str,
        parent_key: &Fingerprint,
        new_object: bool,
    ) -> Result<bool> {
        let mut found = false;

        for mapping in result_map.property_mappings() {
            if !mapping.has_nested_result_map() {
                continue;
            }

            let linked = self
                .apply_nested_result_mapping(
                    session,
                    meta,
                    mapping,
                    object,
                    parent_prefix,
                    parent_key,
                    new_object,
                )
                .await
                .map_err(|err| {
                    err.context(rowgraph_core::err!(
                        "error getting nested result map values for '{}'",
                        mapping.property.as_deref().unwrap_or_default()
                    ))
                })?;

            found |= linked;
        }

        Ok(found)
    }

    async fn apply_nested_result_mapping(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        mapping: &FieldMapping,
        object: &Object,
        parent_prefix: &str,
        parent_key: &Fingerprint,
        new_object: bool,
    ) -> Result<bool> {
        let prefix = column_prefix(parent_prefix, mapping);
        let nested_id = mapping.nested_result_map.as_deref().unwrap_or_default();
        let nested = self.shared.schema.result_map(nested_id)?.clone();
        let nested = self.resolve_discriminated_result_map(meta, &nested, &prefix)?;

        // An ancestor under construction with the same identity is wired in
        // as is; descending into it again would never end.
        let ancestor_key = self.create_ancestor_key(meta, &nested, &prefix)?;
        if let Some(ancestor) = self.ancestor(&ancestor_key) {
            if new_object {
                self.link_objects(object, mapping, Value::Object(ancestor))?;
            }
            return Ok(false);
        }

        let row_key = self.create_row_key(meta, &nested, &prefix)?;
        let combined_key = row_key.combine(parent_key);
        let known = self.nested_result_objects.get(&combined_key).cloned();
        let is_known = known.is_some();

        self.instantiate_collection_property(object, mapping)?;

        if !self.any_not_null_column_has_value(meta, mapping, &prefix)? {
            return Ok(false);
        }

        let value = self
            .get_row_value_nested(session, meta, &nested, &combined_key, &prefix, known)
            .await?;

        if value.is_null() || is_known {
            return Ok(false);
        }

        self.link_objects(object, mapping, value)?;
        Ok(true)
    }

    /// Whether the row carries a nested object at all.
    ///
    /// With `not_null_columns`, one of them must be non-null. Otherwise a
    /// prefixed mapping needs at least one column with its prefix.
    fn any_not_null_column_has_value(
        &self,
        meta: &ResultSetMeta,
        mapping: &FieldMapping,
        prefix: &str,
    ) -> Result<bool> {
        if !mapping.not_null_columns.is_empty() {
            for column in &mapping.not_null_columns {
                let column = format!("{prefix}{column}");
                if meta.has_column(&column) && !meta.get(&column)?.is_null() {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        if !prefix.is_empty() {
            return Ok(meta
                .column_names()
                .any(|column| super::row_value::strip_prefix(column, prefix).is_some()));
        }

        Ok(true)
    }

    fn put_ancestor(&mut self, key: &Fingerprint, object: &Object) -> bool {
        if key.is_null() || self.ancestor_objects.contains_key(key) {
            return false;
        }
        self.ancestor_objects.insert(key.clone(), object.clone());
        true
    }

    fn ancestor(&self, key: &Fingerprint) -> Option<Object> {
        if key.is_null() {
            return None;
        }
        self.ancestor_objects.get(key).cloned()
    }
}
