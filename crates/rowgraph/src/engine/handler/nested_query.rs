use super::{prefixed, ResultSetHandler};
use crate::{
    engine::{extract_from_list, ResultSetMeta},
    Session,
};

use rowgraph_core::{
    object::LoadHandle,
    schema::{FieldMapping, MappedStatement},
    stmt::{RowBounds, Type, Value, ValueRecord},
    Object, Result,
};

use tracing::debug;

impl ResultSetHandler {
    /// Runs, defers or lazily wraps the statement behind a nested-query
    /// property.
    ///
    /// Returns `None` when the property is left unset for now: the parameter
    /// columns were all null, or the statement's result is already in the
    /// session cache and will be assigned by a deferred load.
    pub(super) async fn get_nested_query_mapping_value(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        object: &Object,
        mapping: &FieldMapping,
        prefix: &str,
    ) -> Result<Option<Value>> {
        let statement_id = mapping.nested_query.as_deref().unwrap_or_default();
        let statement = self.shared.schema.statement(statement_id)?.clone();

        let Some(parameter) =
            self.prepare_parameter_for_nested_query(meta, mapping, &statement, prefix)?
        else {
            return Ok(None);
        };

        let key = session.create_cache_key(&statement, &parameter, RowBounds::DEFAULT);
        let property = mapping.property.as_deref().unwrap_or_default();
        let target = self.property_type(object, mapping);

        if session.is_cached(&key) {
            debug!(statement = %statement.id, property, "deferring cached nested query");
            session.defer_load(object.clone(), property.to_string(), key, target)?;
            return Ok(None);
        }

        if mapping.lazy.unwrap_or(self.settings().lazy_loading_enabled) {
            let handle = LoadHandle::new(statement.id.clone(), parameter, target, key);
            return Ok(Some(Value::Lazy(handle)));
        }

        let rows = session
            .query(statement, parameter, RowBounds::DEFAULT, key)
            .await?;

        extract_from_list(rows, &target, self.factory()).map(Some)
    }

    /// Constructor arguments are loaded immediately, never deferred.
    pub(super) async fn get_nested_query_constructor_value(
        &mut self,
        session: &mut Session,
        meta: &mut ResultSetMeta,
        mapping: &FieldMapping,
        prefix: &str,
    ) -> Result<Value> {
        let statement_id = mapping.nested_query.as_deref().unwrap_or_default();
        let statement = self.shared.schema.statement(statement_id)?.clone();

        let Some(parameter) =
            self.prepare_parameter_for_nested_query(meta, mapping, &statement, prefix)?
        else {
            return Ok(Value::Null);
        };

        let key = session.create_cache_key(&statement, &parameter, RowBounds::DEFAULT);
        let target = mapping.ty.clone().unwrap_or(Type::Any);

        let rows = session
            .query(statement, parameter, RowBounds::DEFAULT, key)
            .await?;

        extract_from_list(rows, &target, self.factory())
    }

    /// Reads the nested statement's parameter from the current row.
    ///
    /// Composite mappings build a record of their non-null parts. `None`
    /// means every parameter column was null and the statement must not run.
    fn prepare_parameter_for_nested_query(
        &self,
        meta: &mut ResultSetMeta,
        mapping: &FieldMapping,
        statement: &MappedStatement,
        prefix: &str,
    ) -> Result<Option<Value>> {
        if mapping.is_composite() {
            let mut record = ValueRecord::new();

            for composite in &mapping.composites {
                let column = prefixed(prefix, composite.column.as_deref().unwrap_or_default());
                let ty = composite.ty.clone().unwrap_or(Type::Any);
                let value = meta.read(&column, &ty)?;

                if !value.is_null() {
                    let property = composite.property.as_deref().unwrap_or_default();
                    record.insert(property, value);
                }
            }

            return Ok((!record.is_empty()).then_some(Value::Record(record)));
        }

        let ty = statement
            .parameter_type
            .clone()
            .filter(|ty| self.shared.converters.has(ty))
            .unwrap_or(Type::Any);

        let column = prefixed(prefix, mapping.column.as_deref().unwrap_or_default());
        let value = meta.read(&column, &ty)?;

        Ok((!value.is_null()).then_some(value))
    }
}
