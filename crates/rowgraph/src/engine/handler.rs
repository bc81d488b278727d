mod discriminator;
mod multiple_results;
mod nested;
mod nested_query;
mod row_key;
mod row_value;

use super::ResultSetMeta;
use crate::{db::Shared, settings::AutoMapping, ObjectFactory, Session, Settings};

use multiple_results::PendingRelation;
use row_value::UnmappedColumn;

use rowgraph_core::{
    driver::Response,
    schema::{FieldMapping, MappedStatement, ResultMap},
    stmt::{Fingerprint, RowBounds, Type, Value},
    Error, Object, Result,
};

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};
use tracing::trace;

/// Materializes the result sets of one statement execution.
///
/// A handler lives for exactly one statement. Nested queries issued while
/// materializing rows get their own handler through the session.
pub(crate) struct ResultSetHandler {
    shared: Arc<Shared>,
    statement: Arc<MappedStatement>,
    bounds: RowBounds,

    /// Objects built from the current result set, by combined row key
    nested_result_objects: HashMap<Fingerprint, Value>,

    /// Objects whose nested mappings are being applied, by ancestor key
    ancestor_objects: HashMap<Fingerprint, Object>,

    /// Mapping filled from each named result set
    next_result_maps: HashMap<String, FieldMapping>,

    /// Parents waiting for rows of a named result set
    pending_relations: HashMap<Fingerprint, Vec<PendingRelation>>,

    /// Auto-mapped columns, by `result map id:prefix`
    auto_mappings: HashMap<String, Arc<[UnmappedColumn]>>,

    /// Blank instances used to match unmapped columns to properties
    blank_instances: HashMap<Type, Option<Object>>,
}

impl ResultSetHandler {
    pub(crate) fn new(
        shared: Arc<Shared>,
        statement: Arc<MappedStatement>,
        bounds: RowBounds,
    ) -> ResultSetHandler {
        ResultSetHandler {
            shared,
            statement,
            bounds,
            nested_result_objects: HashMap::new(),
            ancestor_objects: HashMap::new(),
            next_result_maps: HashMap::new(),
            pending_relations: HashMap::new(),
            auto_mappings: HashMap::new(),
            blank_instances: HashMap::new(),
        }
    }

    /// Materializes every result set of `response`.
    ///
    /// Result sets are matched to the statement's result maps in order.
    /// Result sets past those are matched by name to mappings that declared
    /// them. A single result map yields its rows directly; several yield one
    /// list per result map.
    pub(crate) async fn handle_result_sets(
        mut self,
        session: &mut Session,
        response: Response,
    ) -> Result<Vec<Value>> {
        let statement = self.statement.clone();
        let mut result_sets = VecDeque::from(response.result_sets);

        if !self.settings().multiple_result_sets_enabled {
            result_sets.truncate(1);
        }

        if !result_sets.is_empty() && statement.result_maps.is_empty() {
            return Err(Error::configuration(format!(
                "statement `{}` produced rows but declares no result map",
                statement.id
            )));
        }

        let mut results = vec![];
        let mut index = 0;

        while index < statement.result_maps.len() {
            let Some(cursor) = result_sets.pop_front() else {
                break;
            };

            let result_map = self
                .shared
                .schema
                .result_map(&statement.result_maps[index])?
                .clone();

            let mut meta = ResultSetMeta::new(cursor, self.shared.clone());
            let mut rows = vec![];
            let res = self
                .handle_result_set(session, &mut meta, &result_map, self.bounds, &mut rows, None)
                .await;
            meta.close();
            res?;

            results.push(rows);
            self.nested_result_objects.clear();
            index += 1;
        }

        while index < statement.result_sets.len() {
            let Some(cursor) = result_sets.pop_front() else {
                break;
            };

            let mut meta = ResultSetMeta::new(cursor, self.shared.clone());
            let name = &statement.result_sets[index];

            if let Some(parent_mapping) = self.next_result_maps.get(name).cloned() {
                let nested_id = parent_mapping.nested_result_map.as_deref().unwrap_or_default();
                let result_map = self.shared.schema.result_map(nested_id)?.clone();

                let mut discarded = vec![];
                let res = self
                    .handle_result_set(
                        session,
                        &mut meta,
                        &result_map,
                        RowBounds::DEFAULT,
                        &mut discarded,
                        Some(&parent_mapping),
                    )
                    .await;
                meta.close();
                res?;
            } else {
                meta.close();
            }

            self.nested_result_objects.clear();
            index += 1;
        }

        for mut cursor in result_sets {
            cursor.close();
        }

        if results.len() == 1 {
            Ok(results.pop().unwrap_or_default())
        } else {
            Ok(results.into_iter().map(Value::List).collect())
        }
    }

    async fn handle_result_set(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &Arc<ResultMap>,
        bounds: RowBounds,
        rows: &mut Vec<Value>,
        parent_mapping: Option<&FieldMapping>,
    ) -> Result<()> {
        if result_map.has_nested_result_maps() {
            self.ensure_no_row_bounds(bounds)?;
            self.handle_nested_rows(session, meta, result_map, bounds, rows, parent_mapping)
                .await
        } else {
            self.handle_simple_rows(session, meta, result_map, bounds, rows, parent_mapping)
                .await
        }
    }

    async fn handle_simple_rows(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &Arc<ResultMap>,
        bounds: RowBounds,
        rows: &mut Vec<Value>,
        parent_mapping: Option<&FieldMapping>,
    ) -> Result<()> {
        meta.skip(bounds.offset).await?;

        let mut count = 0;
        while count < bounds.limit && meta.next_row().await? {
            let result_map = self.resolve_discriminated_result_map(meta, result_map, "")?;
            let value = self.get_row_value(session, meta, &result_map, "").await?;
            trace!(result_map = %result_map.id(), null = value.is_null(), "row");

            self.store_object(meta, rows, parent_mapping, value)?;
            count += 1;
        }

        Ok(())
    }

    async fn handle_nested_rows(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        result_map: &Arc<ResultMap>,
        bounds: RowBounds,
        rows: &mut Vec<Value>,
        parent_mapping: Option<&FieldMapping>,
    ) -> Result<()> {
        let result_ordered = self.statement.result_ordered;
        meta.skip(bounds.offset).await?;

        let mut count = 0;
        let mut row_value: Option<Value> = None;

        while count < bounds.limit && meta.next_row().await? {
            let result_map = self.resolve_discriminated_result_map(meta, result_map, "")?;
            let row_key = self.create_row_key(meta, &result_map, "")?;
            let partial = self.nested_result_objects.get(&row_key).cloned();
            let known = partial.is_some();

            trace!(result_map = %result_map.id(), key = %row_key, known, "row");

            if result_ordered {
                if !known {
                    if let Some(value) = row_value.take().filter(|value| !value.is_null()) {
                        self.nested_result_objects.clear();
                        self.store_object(meta, rows, parent_mapping, value)?;
                        count += 1;
                    }
                }

                row_value = Some(
                    self.get_row_value_nested(session, meta, &result_map, &row_key, "", partial)
                        .await?,
                );
            } else {
                let value = self
                    .get_row_value_nested(session, meta, &result_map, &row_key, "", partial)
                    .await?;

                if !known {
                    self.store_object(meta, rows, parent_mapping, value)?;
                    count += 1;
                }
            }
        }

        if let Some(value) = row_value.filter(|value| !value.is_null()) {
            if count < bounds.limit {
                self.store_object(meta, rows, parent_mapping, value)?;
            }
        }

        Ok(())
    }

    fn store_object(
        &mut self,
        meta: &mut ResultSetMeta,
        rows: &mut Vec<Value>,
        parent_mapping: Option<&FieldMapping>,
        value: Value,
    ) -> Result<()> {
        match parent_mapping {
            Some(parent_mapping) => self.link_to_parents(meta, parent_mapping, value),
            None => {
                rows.push(value);
                Ok(())
            }
        }
    }

    fn ensure_no_row_bounds(&self, bounds: RowBounds) -> Result<()> {
        if self.settings().safe_row_bounds_enabled && !bounds.is_default() {
            return Err(Error::configuration(format!(
                "statement `{}` has nested result maps and cannot be constrained by row bounds",
                self.statement.id
            )));
        }
        Ok(())
    }

    fn should_apply_automatic_mappings(&self, result_map: &ResultMap, nested: bool) -> bool {
        match result_map.auto_mapping() {
            Some(enabled) => enabled,
            None => match self.settings().auto_mapping {
                AutoMapping::None => false,
                AutoMapping::Partial => !nested,
                AutoMapping::Full => true,
            },
        }
    }

    /// The object whose properties a row fills, if `value` is one. Result
    /// maps of scalar types have no properties.
    fn target_object(&self, value: &Value, result_map: &ResultMap) -> Option<Object> {
        if self.shared.converters.has(result_map.ty()) {
            return None;
        }
        value.as_object().cloned()
    }

    fn null_if_empty(&self, value: Value, found: bool) -> Value {
        if found || self.settings().return_instance_for_empty_row {
            value
        } else {
            Value::Null
        }
    }

    /// Declared type of the value mapped to `mapping.property`.
    fn property_type(&self, object: &Object, mapping: &FieldMapping) -> Type {
        mapping
            .ty
            .clone()
            .or_else(|| {
                mapping
                    .property
                    .as_deref()
                    .and_then(|property| object.setter_type(property))
            })
            .unwrap_or(Type::Any)
    }

    /// Sets `property`, collecting into a list when the property is a
    /// collection.
    fn link_objects(&self, object: &Object, mapping: &FieldMapping, value: Value) -> Result<()> {
        let property = mapping.property.as_deref().unwrap_or_default();

        if self.is_collection_property(object, mapping) {
            object.push(property, value)
        } else {
            object.set(property, value)
        }
    }

    fn is_collection_property(&self, object: &Object, mapping: &FieldMapping) -> bool {
        let property = mapping.property.as_deref().unwrap_or_default();

        match object.get(property) {
            Some(Value::List(_)) => true,
            _ => self.factory().is_collection(&self.property_type(object, mapping)),
        }
    }

    /// Gives an unset collection property an empty list.
    fn instantiate_collection_property(&self, object: &Object, mapping: &FieldMapping) -> Result<()> {
        let property = mapping.property.as_deref().unwrap_or_default();

        match object.get(property) {
            Some(Value::Null) | None
                if self.factory().is_collection(&self.property_type(object, mapping)) =>
            {
                object.set(property, Value::List(vec![]))
            }
            _ => Ok(()),
        }
    }

    fn factory(&self) -> &dyn ObjectFactory {
        &*self.shared.factory
    }

    fn settings(&self) -> &Settings {
        &self.shared.settings
    }
}

/// Writes `value` to `property`. A null the property cannot hold leaves it
/// unchanged.
fn set_property(object: &Object, property: &str, value: Value) -> Result<()> {
    if !value.is_null() {
        return object.set(property, value);
    }

    match object.set(property, value) {
        Err(err) if err.is_type_conversion() => Ok(()),
        res => res,
    }
}

fn prefixed(prefix: &str, column: &str) -> String {
    format!("{prefix}{column}")
}

/// Upper-cased prefix of a nested mapping's columns.
fn column_prefix(parent_prefix: &str, mapping: &FieldMapping) -> String {
    let own = mapping.column_prefix.as_deref().unwrap_or_default();
    format!("{parent_prefix}{own}").to_uppercase()
}
