use super::Column;
use crate::stmt::Value;
use crate::{async_trait, Result};

/// A forward-only cursor over one result set.
#[async_trait]
pub trait Cursor: Send {
    fn columns(&self) -> &[Column];

    /// Advances to the next row. Returns `false` when exhausted.
    async fn next_row(&mut self) -> Result<bool>;

    /// Reads a column of the current row, matching the label
    /// case-insensitively.
    fn get(&self, column: &str) -> Result<Value>;

    /// Skips up to `n` rows.
    async fn skip(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            if !self.next_row().await? {
                break;
            }
        }
        Ok(())
    }

    /// Releases the cursor. Further reads return no rows.
    fn close(&mut self) {}
}
