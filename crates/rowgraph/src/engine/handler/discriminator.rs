use super::{prefixed, ResultSetHandler};
use crate::engine::ResultSetMeta;

use rowgraph_core::{
    schema::{Discriminator, ResultMap},
    stmt::{Type, Value},
    Error, Result,
};

use std::{collections::HashSet, sync::Arc};
use tracing::debug;

impl ResultSetHandler {
    /// Follows the discriminator chain starting at `result_map` for the
    /// current row.
    ///
    /// Resolution stops at a result map without a discriminator, at a value
    /// with no case, or when a result map already visited in this chain comes
    /// up again.
    pub(super) fn resolve_discriminated_result_map(
        &self,
        meta: &mut ResultSetMeta,
        result_map: &Arc<ResultMap>,
        prefix: &str,
    ) -> Result<Arc<ResultMap>> {
        let mut visited = HashSet::new();
        visited.insert(result_map.id().to_string());

        let mut current = result_map.clone();

        while let Some(discriminator) = current.discriminator() {
            let value = discriminator_value(meta, discriminator, prefix)?.to_string();

            let Some(target) = discriminator.map_id_for(&value) else {
                break;
            };

            if !self.shared.schema.has_result_map(target) {
                return Err(Error::ambiguous_type(current.id(), value, target));
            }

            if !visited.insert(target.to_string()) {
                debug!(
                    result_map = %result_map.id(),
                    repeated = %target,
                    "discriminator chain repeats; stopping"
                );
                break;
            }

            let next = self.shared.schema.result_map(target)?.clone();
            current = next;
        }

        Ok(current)
    }
}

fn discriminator_value(
    meta: &mut ResultSetMeta,
    discriminator: &Discriminator,
    prefix: &str,
) -> Result<Value> {
    let column = prefixed(prefix, discriminator.column());
    let ty = discriminator.mapping().ty.clone().unwrap_or(Type::Any);
    meta.read(&column, &ty)
}
