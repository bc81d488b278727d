use super::{column_prefix, prefixed, set_property, ResultSetHandler};
use crate::{engine::ResultSetMeta, Session};

use rowgraph_core::{
    schema::{FieldMapping, ResultMap},
    stmt::{Type, Value},
    Object, Result,
};

use async_recursion::async_recursion;
use std::{collections::HashSet, sync::Arc};

/// A column no mapping claims, matched to a property by name.
#[derive(Debug)]
pub(super) struct UnmappedColumn {
    column: String,
    property: String,
    ty: Type,
}

impl ResultSetHandler {
    /// Materializes one row with a result map that has no nested result
    /// maps.
    ///
    /// A row that supplies no value resolves to null rather than an empty
    /// instance, unless the result map takes constructor arguments.
    #[async_recursion]
    pub(super) async fn get_row_value(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        prefix: &str,
    ) -> Result<Value> {
        let value = self
            .create_result_object(session, meta, result_map, prefix)
            .await?;

        let Some(object) = self.target_object(&value, result_map) else {
            return Ok(value);
        };

        let mut found = !result_map.constructor_mappings().is_empty();
        found |= self
            .apply_property_mappings(session, meta, result_map, &object, prefix)
            .await?;

        if self.should_apply_automatic_mappings(result_map, false) {
            found |= self.apply_automatic_mappings(meta, result_map, &object, prefix)?;
        }

        Ok(self.null_if_empty(value, found))
    }

    pub(super) async fn create_result_object(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        prefix: &str,
    ) -> Result<Value> {
        let ty = result_map.ty();

        if self.shared.converters.has(ty) {
            self.create_primitive_result_object(meta, result_map, prefix)
        } else if !result_map.constructor_mappings().is_empty() {
            self.create_parameterized_result_object(session, meta, result_map, prefix)
                .await
        } else {
            Ok(Value::Object(self.factory().create(ty)?))
        }
    }

    /// Reads a scalar result from the first mapped column, or the first
    /// column of the result set.
    fn create_primitive_result_object(
        &mut self,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        prefix: &str,
    ) -> Result<Value> {
        let column = match result_map
            .mappings()
            .first()
            .and_then(|mapping| mapping.column.as_deref())
        {
            Some(column) => prefixed(prefix, column),
            None => match meta.first_column() {
                Some(column) => column.to_string(),
                None => rowgraph_core::bail!("result set has no columns"),
            },
        };

        meta.read(&column, result_map.ty())
    }

    async fn create_parameterized_result_object(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        prefix: &str,
    ) -> Result<Value> {
        let mut arg_types = vec![];
        let mut args = vec![];
        let mut found = false;

        for mapping in result_map.constructor_mappings() {
            let ty = mapping.ty.clone().unwrap_or(Type::Any);

            let value = if mapping.nested_query.is_some() {
                self.get_nested_query_constructor_value(session, meta, mapping, prefix)
                    .await?
            } else if let Some(nested_id) = &mapping.nested_result_map {
                let nested = self.shared.schema.result_map(nested_id)?.clone();
                let nested_prefix = column_prefix(prefix, mapping);
                self.get_row_value(session, meta, &nested, &nested_prefix)
                    .await?
            } else {
                match mapping.column.as_deref() {
                    Some(column) => meta.read(&prefixed(prefix, column), &ty)?,
                    None => Value::Null,
                }
            };

            found |= !value.is_null();
            arg_types.push(ty);
            args.push(value);
        }

        if !found {
            return Ok(Value::Null);
        }

        let object = self
            .factory()
            .create_with_args(result_map.ty(), &arg_types, args)?;
        Ok(Value::Object(object))
    }

    pub(super) async fn apply_property_mappings(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        object: &Object,
        prefix: &str,
    ) -> Result<bool> {
        let mapped = meta.mapped_column_names(result_map, prefix);
        let call_setters_on_nulls = self.settings().call_setters_on_nulls;
        let mut found = false;

        for mapping in result_map.property_mappings() {
            let claimed = mapping
                .column
                .as_deref()
                .is_some_and(|column| mapped.contains(&prefixed(prefix, column).to_uppercase()));

            if !(claimed || mapping.is_composite() || mapping.result_set.is_some()) {
                continue;
            }

            let Some(value) = self
                .get_property_mapping_value(session, meta, object, mapping, prefix)
                .await?
            else {
                continue;
            };

            let Some(property) = mapping.property.as_deref() else {
                continue;
            };

            if value.is_null() && !call_setters_on_nulls {
                continue;
            }

            set_property(object, property, value)?;
            found = true;
        }

        Ok(found)
    }

    /// The value a property mapping supplies for the current row. `None`
    /// means the property is filled some other way, or later.
    async fn get_property_mapping_value(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        object: &Object,
        mapping: &FieldMapping,
        prefix: &str,
    ) -> Result<Option<Value>> {
        if mapping.nested_query.is_some() {
            return self
                .get_nested_query_mapping_value(session, meta, object, mapping, prefix)
                .await;
        }

        if mapping.result_set.is_some() {
            self.add_pending_child_relation(meta, object, mapping)?;
            return Ok(None);
        }

        if mapping.nested_result_map.is_some() {
            return Ok(None);
        }

        let column = prefixed(prefix, mapping.column.as_deref().unwrap_or_default());
        let ty = self.property_type(object, mapping);
        meta.read(&column, &ty).map(Some)
    }

    pub(super) fn apply_automatic_mappings(
        &mut self,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        object: &Object,
        prefix: &str,
    ) -> Result<bool> {
        let mappings = self.create_automatic_mappings(meta, result_map, object, prefix);
        let call_setters_on_nulls = self.settings().call_setters_on_nulls;
        let mut found = false;

        for mapping in mappings.iter() {
            let value = meta.read(&mapping.column, &mapping.ty)?;

            if value.is_null() && !call_setters_on_nulls {
                continue;
            }

            set_property(object, &mapping.property, value)?;
            found = true;
        }

        Ok(found)
    }

    fn create_automatic_mappings(
        &mut self,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        object: &Object,
        prefix: &str,
    ) -> Arc<[UnmappedColumn]> {
        let key = format!("{}:{prefix}", result_map.id());
        if let Some(mappings) = self.auto_mappings.get(&key) {
            return mappings.clone();
        }

        let camel_case = self.settings().map_underscore_to_camel_case;
        let explicit: HashSet<&str> = result_map
            .mappings()
            .iter()
            .filter_map(|mapping| mapping.property.as_deref())
            .collect();

        let mut mappings = vec![];

        for column in meta.unmapped_column_names(result_map, prefix).iter() {
            let Some(name) = strip_prefix(column, prefix) else {
                continue;
            };

            let Some(property) = object.find_property(name, camel_case) else {
                continue;
            };

            // Explicit mappings own their property even when another column
            // spells its name.
            if explicit.contains(property.as_str()) {
                continue;
            }

            let Some(ty) = object.setter_type(&property) else {
                continue;
            };

            if !self.shared.converters.has(&ty) {
                continue;
            }

            mappings.push(UnmappedColumn {
                column: column.clone(),
                property,
                ty,
            });
        }

        let mappings: Arc<[UnmappedColumn]> = mappings.into();
        self.auto_mappings.insert(key, mappings.clone());
        mappings
    }
}

/// `column` without the upper-cased `prefix`, or `None` if it does not carry
/// it.
pub(super) fn strip_prefix<'a>(column: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(column);
    }

    let head = column.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        column.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::strip_prefix;

    #[test]
    fn strips_case_insensitively() {
        assert_eq!(strip_prefix("author_name", "AUTHOR_"), Some("name"));
        assert_eq!(strip_prefix("title", ""), Some("title"));
        assert_eq!(strip_prefix("title", "AUTHOR_"), None);
        assert_eq!(strip_prefix("au", "AUTHOR_"), None);
    }
}
