use super::{column_prefix, row_value::strip_prefix, ResultSetHandler};
use crate::engine::ResultSetMeta;

use rowgraph_core::{
    schema::{FieldMapping, ResultMap},
    stmt::{Fingerprint, FingerprintBuilder, Type, Value},
    Object, Result,
};

/// How column names enter a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Naming {
    /// As read, prefix included.
    Prefixed,

    /// Without the prefix, so the same object read through different
    /// prefixes yields the same key.
    Bare,
}

impl ResultSetHandler {
    /// Identity of the object `result_map` builds from the current row.
    ///
    /// Returns the null fingerprint when the row has no identifying values.
    pub(super) fn create_row_key(
        &mut self,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        prefix: &str,
    ) -> Result<Fingerprint> {
        self.build_row_key(meta, result_map, prefix, Naming::Prefixed)
    }

    /// Like [`create_row_key`](Self::create_row_key), but independent of the
    /// prefix the columns were read with.
    pub(super) fn create_ancestor_key(
        &mut self,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        prefix: &str,
    ) -> Result<Fingerprint> {
        self.build_row_key(meta, result_map, prefix, Naming::Bare)
    }

    fn build_row_key(
        &mut self,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        prefix: &str,
        naming: Naming,
    ) -> Result<Fingerprint> {
        let mut key = Fingerprint::builder();
        key.contribute(result_map.id());

        let mappings = result_map.id_mappings();

        if !mappings.is_empty() {
            self.row_key_for_mapped_properties(meta, result_map, mappings, prefix, naming, &mut key)?;
        } else if result_map.ty().is_map() {
            row_key_for_map(meta, &mut key)?;
        } else {
            self.row_key_for_unmapped_properties(meta, result_map, prefix, naming, &mut key)?;
        }

        if key.count() < 2 {
            return Ok(Fingerprint::null());
        }

        Ok(key.build())
    }

    fn row_key_for_mapped_properties(
        &self,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        mappings: &[FieldMapping],
        prefix: &str,
        naming: Naming,
        key: &mut FingerprintBuilder,
    ) -> Result<()> {
        for mapping in mappings {
            if mapping.has_nested_result_map() {
                let nested_id = mapping.nested_result_map.as_deref().unwrap_or_default();
                let nested = self.shared.schema.result_map(nested_id)?;

                self.row_key_for_mapped_properties(
                    meta,
                    nested,
                    nested.constructor_mappings(),
                    &column_prefix(prefix, mapping),
                    naming,
                    key,
                )?;
                continue;
            }

            if mapping.nested_query.is_some() {
                continue;
            }

            let Some(column) = mapping.column.as_deref() else {
                continue;
            };

            let prefixed = format!("{prefix}{column}").to_uppercase();
            if !meta.mapped_column_names(result_map, prefix).contains(&prefixed) {
                continue;
            }

            let ty = mapping.ty.clone().unwrap_or(Type::Any);
            let value = meta.read(&prefixed, &ty)?;

            if !value.is_null() {
                match naming {
                    Naming::Prefixed => key.contribute(prefixed),
                    Naming::Bare => key.contribute(column.to_uppercase()),
                };
                key.contribute(identity_value(value));
            }
        }

        Ok(())
    }

    fn row_key_for_unmapped_properties(
        &mut self,
        meta: &mut ResultSetMeta,
        result_map: &ResultMap,
        prefix: &str,
        naming: Naming,
        key: &mut FingerprintBuilder,
    ) -> Result<()> {
        let Some(blank) = self.blank_instance(result_map.ty()) else {
            return Ok(());
        };

        let camel_case = self.settings().map_underscore_to_camel_case;

        for column in meta.unmapped_column_names(result_map, prefix).iter() {
            let Some(name) = strip_prefix(column, prefix) else {
                continue;
            };

            if blank.find_property(name, camel_case).is_none() {
                continue;
            }

            let value = meta.get(column)?;
            if !value.is_null() {
                match naming {
                    Naming::Prefixed => key.contribute(column.to_uppercase()),
                    Naming::Bare => key.contribute(name.to_uppercase()),
                };
                key.contribute(identity_value(value));
            }
        }

        Ok(())
    }

    /// A blank instance of `ty`, for property lookups only.
    fn blank_instance(&mut self, ty: &Type) -> Option<Object> {
        if let Some(blank) = self.blank_instances.get(ty) {
            return blank.clone();
        }

        let blank = self.factory().create(ty).ok();
        self.blank_instances.insert(ty.clone(), blank.clone());
        blank
    }
}

fn row_key_for_map(meta: &ResultSetMeta, key: &mut FingerprintBuilder) -> Result<()> {
    for column in meta.column_names() {
        let value = meta.get(column)?;
        if !value.is_null() {
            key.contribute(column.to_uppercase());
            key.contribute(identity_value(value));
        }
    }
    Ok(())
}

/// `value` as it enters an identity key. Integers are widened so that the
/// same id read as `I32` and as `I64` yields one key.
pub(super) fn identity_value(value: Value) -> Value {
    match value {
        Value::I32(v) => Value::I64(v.into()),
        value => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_value_widens_integers_only() {
        assert_eq!(identity_value(Value::I32(7)), Value::I64(7));
        assert_eq!(identity_value(Value::from("7")), Value::from("7"));
        assert_ne!(
            identity_value(Value::Bytes(vec![1])),
            identity_value(Value::Bytes(vec![2]))
        );
    }
}
