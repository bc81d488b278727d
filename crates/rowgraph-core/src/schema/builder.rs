use super::{MappedStatement, ResultMap, Schema};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::{collections::HashSet, sync::Arc};

/// Collects result maps and statements, then verifies them as a whole.
#[derive(Debug, Default)]
pub struct Builder {
    result_maps: Vec<ResultMap>,
    statements: Vec<MappedStatement>,
}

impl Builder {
    pub fn result_map(&mut self, result_map: ResultMap) -> &mut Self {
        self.result_maps.push(result_map);
        self
    }

    pub fn statement(&mut self, statement: MappedStatement) -> &mut Self {
        self.statements.push(statement);
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut result_maps = IndexMap::new();
        for result_map in self.result_maps {
            let id = result_map.id().to_string();
            if result_maps.insert(id.clone(), result_map).is_some() {
                return Err(Error::configuration(format!(
                    "result map `{id}` is defined more than once"
                )));
            }
        }

        let forced: Vec<String> = result_maps
            .values()
            .filter(|result_map| {
                !result_map.has_nested_result_maps()
                    && has_discriminated_nested_result_maps(&result_maps, result_map)
            })
            .map(|result_map| result_map.id().to_string())
            .collect();

        for id in forced {
            if let Some(result_map) = result_maps.get_mut(&id) {
                result_map.force_nested_result_maps();
            }
        }

        let result_maps = result_maps
            .into_iter()
            .map(|(id, result_map)| (id, Arc::new(result_map)))
            .collect();

        let mut statements = IndexMap::new();
        for statement in self.statements {
            let id = statement.id.clone();
            if statements.insert(id.clone(), Arc::new(statement)).is_some() {
                return Err(Error::configuration(format!(
                    "statement `{id}` is defined more than once"
                )));
            }
        }

        let schema = Schema {
            result_maps,
            statements,
        };

        super::verify::verify(&schema)?;
        Ok(schema)
    }
}

/// Whether any result map reachable through `result_map`'s discriminator
/// cases has nested result maps.
fn has_discriminated_nested_result_maps(
    result_maps: &IndexMap<String, ResultMap>,
    result_map: &ResultMap,
) -> bool {
    let mut visited = HashSet::from([result_map.id()]);
    let mut pending = vec![result_map];

    while let Some(current) = pending.pop() {
        let Some(discriminator) = current.discriminator() else {
            continue;
        };

        for (_, case_id) in discriminator.cases() {
            if !visited.insert(case_id) {
                continue;
            }

            // Unknown case ids are reported by `verify`
            let Some(case) = result_maps.get(case_id) else {
                continue;
            };

            if case.has_nested_result_maps() {
                return true;
            }
            pending.push(case);
        }
    }

    false
}
