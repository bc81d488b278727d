use crate::stmt::Type;

/// A named query whose rows are materialized through result maps.
#[derive(Debug, Clone, Default)]
pub struct MappedStatement {
    pub id: String,

    /// One result map per result set, in order.
    pub result_maps: Vec<String>,

    /// Names of the result sets the statement produces, in order. Used to
    /// route rows to mappings that declare a `result_set`.
    pub result_sets: Vec<String>,

    /// Clear the session cache before running, even when nested.
    pub flush_cache: bool,

    /// Rows for the same parent arrive consecutively; completed objects are
    /// released early.
    pub result_ordered: bool,

    /// Type a simple nested-query parameter is converted into.
    pub parameter_type: Option<Type>,
}

impl MappedStatement {
    pub fn new(id: impl Into<String>) -> MappedStatement {
        MappedStatement {
            id: id.into(),
            ..MappedStatement::default()
        }
    }

    pub fn result_map(mut self, result_map: impl Into<String>) -> Self {
        self.result_maps.push(result_map.into());
        self
    }

    pub fn result_sets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.result_sets.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn flush_cache(mut self, flush: bool) -> Self {
        self.flush_cache = flush;
        self
    }

    pub fn result_ordered(mut self, ordered: bool) -> Self {
        self.result_ordered = ordered;
        self
    }

    pub fn parameter_type(mut self, ty: Type) -> Self {
        self.parameter_type = Some(ty);
        self
    }
}
