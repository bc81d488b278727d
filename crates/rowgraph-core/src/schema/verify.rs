use super::{FieldMapping, MappedStatement, ResultMap, Schema};
use crate::{Error, Result};

struct Verify<'a> {
    schema: &'a Schema,
}

pub(super) fn verify(schema: &Schema) -> Result<()> {
    Verify { schema }.verify()
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        for result_map in self.schema.result_maps() {
            self.verify_result_map(result_map).map_err(|err| {
                err.context(Error::configuration(format!(
                    "invalid result map `{}`",
                    result_map.id()
                )))
            })?;
        }

        for statement in self.schema.statements() {
            self.verify_statement(statement)?;
        }

        Ok(())
    }

    fn verify_result_map(&self, result_map: &ResultMap) -> Result<()> {
        if result_map.id().is_empty() {
            return Err(Error::configuration("result map id must not be empty"));
        }

        for mapping in result_map.mappings() {
            self.verify_mapping(mapping)?;
        }

        if let Some(discriminator) = result_map.discriminator() {
            if discriminator.column().is_empty() {
                return Err(Error::configuration("discriminator has no column"));
            }

            for (case, target) in discriminator.cases() {
                if !self.schema.has_result_map(target) {
                    return Err(Error::ambiguous_type(result_map.id(), case, target));
                }
            }
        }

        Ok(())
    }

    fn verify_mapping(&self, mapping: &FieldMapping) -> Result<()> {
        let name = mapping
            .property
            .as_deref()
            .or(mapping.column.as_deref())
            .unwrap_or("<unnamed>");

        if mapping.property.is_none() && !mapping.constructor {
            return Err(Error::configuration(format!(
                "mapping `{name}` needs a property unless it is a constructor argument"
            )));
        }

        if mapping.nested_query.is_some() && mapping.nested_result_map.is_some() {
            return Err(Error::configuration(format!(
                "mapping `{name}` cannot have both a nested query and a nested result map"
            )));
        }

        if let Some(id) = &mapping.nested_result_map {
            if !self.schema.has_result_map(id) {
                return Err(Error::configuration(format!(
                    "mapping `{name}` references unknown result map `{id}`"
                )));
            }
        }

        if let Some(id) = &mapping.nested_query {
            if !self.schema.has_statement(id) {
                return Err(Error::configuration(format!(
                    "mapping `{name}` references unknown statement `{id}`"
                )));
            }
        }

        if mapping.result_set.is_some() {
            if mapping.nested_result_map.is_none() {
                return Err(Error::configuration(format!(
                    "mapping `{name}` reads result set `{}` but has no nested result map",
                    mapping.result_set.as_deref().unwrap_or_default()
                )));
            }

            if mapping.columns().count() != mapping.foreign_columns().count() {
                return Err(Error::configuration(format!(
                    "mapping `{name}` has a different number of columns and foreign columns"
                )));
            }
        }

        Ok(())
    }

    fn verify_statement(&self, statement: &MappedStatement) -> Result<()> {
        for id in &statement.result_maps {
            if !self.schema.has_result_map(id) {
                return Err(Error::configuration(format!(
                    "statement `{}` references unknown result map `{id}`",
                    statement.id
                )));
            }
        }

        Ok(())
    }
}
