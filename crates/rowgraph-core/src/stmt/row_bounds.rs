/// Restricts which rows of a result set are materialized.
///
/// `offset` rows are skipped before materialization starts and at most
/// `limit` results are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowBounds {
    pub offset: usize,
    pub limit: usize,
}

impl RowBounds {
    pub const NO_ROW_OFFSET: usize = 0;
    pub const NO_ROW_LIMIT: usize = usize::MAX;

    /// No offset and no limit.
    pub const DEFAULT: RowBounds = RowBounds {
        offset: Self::NO_ROW_OFFSET,
        limit: Self::NO_ROW_LIMIT,
    };

    pub const fn new(offset: usize, limit: usize) -> RowBounds {
        RowBounds { offset, limit }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for RowBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
