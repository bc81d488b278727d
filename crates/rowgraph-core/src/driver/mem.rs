use super::{Column, Cursor};
use crate::stmt::{Type, Value};
use crate::{async_trait, Result};

/// A cursor over rows held in memory.
#[derive(Debug, Clone)]
pub struct MemCursor {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
    pos: Option<usize>,
    closed: bool,
}

impl MemCursor {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> MemCursor {
        MemCursor {
            columns,
            rows,
            pos: None,
            closed: false,
        }
    }

    /// Builds a cursor from column names, declaring each column's type
    /// from the first non-null value in it.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> MemCursor
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let mut column = Column::new(name);
                column.declared = rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .find(|value| !value.is_null())
                    .map(Value::infer_ty)
                    .filter(Type::is_scalar);
                column
            })
            .collect();

        MemCursor::new(columns, rows)
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(column))
    }
}

#[async_trait]
impl Cursor for MemCursor {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    async fn next_row(&mut self) -> Result<bool> {
        if self.closed {
            return Ok(false);
        }

        let next = self.pos.map_or(0, |pos| pos + 1);
        if next < self.rows.len() {
            self.pos = Some(next);
            Ok(true)
        } else {
            self.pos = Some(self.rows.len());
            Ok(false)
        }
    }

    fn get(&self, column: &str) -> Result<Value> {
        let Some(index) = self.index_of(column) else {
            crate::bail!("column `{column}` is not in the result set");
        };

        let Some(row) = self.pos.and_then(|pos| self.rows.get(pos)) else {
            crate::bail!("cursor is not positioned on a row");
        };

        Ok(row.get(index).cloned().unwrap_or_default())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
