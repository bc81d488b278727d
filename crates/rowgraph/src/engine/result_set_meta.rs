use crate::{db::Shared, Converter};

use rowgraph_core::{
    driver::Column,
    schema::ResultMap,
    stmt::{Type, Value},
    Cursor, Result,
};

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

/// Wraps one cursor and memoizes what the handler asks about its columns on
/// every row.
pub(crate) struct ResultSetMeta {
    cursor: Box<dyn Cursor>,
    shared: Arc<Shared>,

    /// Column descriptions, captured once
    columns: Vec<Column>,

    /// Converter per (upper-cased column, property type)
    converters: HashMap<(String, Type), Arc<dyn Converter>>,

    /// Keyed by `result map id:prefix`
    mapped: HashMap<String, Arc<HashSet<String>>>,
    unmapped: HashMap<String, Arc<[String]>>,
}

impl ResultSetMeta {
    pub(crate) fn new(cursor: Box<dyn Cursor>, shared: Arc<Shared>) -> ResultSetMeta {
        let columns = cursor.columns().to_vec();

        ResultSetMeta {
            cursor,
            shared,
            columns,
            converters: HashMap::new(),
            mapped: HashMap::new(),
            unmapped: HashMap::new(),
        }
    }

    pub(crate) fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub(crate) fn first_column(&self) -> Option<&str> {
        self.columns.first().map(|column| column.name.as_str())
    }

    pub(crate) fn has_column(&self, name: &str) -> bool {
        self.columns
            .iter()
            .any(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub(crate) async fn next_row(&mut self) -> Result<bool> {
        self.cursor.next_row().await
    }

    pub(crate) async fn skip(&mut self, n: usize) -> Result<()> {
        if n > 0 {
            self.cursor.skip(n).await?;
        }
        Ok(())
    }

    /// The raw value of `column` in the current row.
    pub(crate) fn get(&self, column: &str) -> Result<Value> {
        self.cursor.get(column)
    }

    /// Reads `column` from the current row, converted for a property of type
    /// `ty`. Null is never converted.
    pub(crate) fn read(&mut self, column: &str, ty: &Type) -> Result<Value> {
        let raw = self.cursor.get(column)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }

        self.converter(column, ty)
            .convert(raw)
            .map_err(|err| err.context(rowgraph_core::err!("column `{column}`")))
    }

    pub(crate) fn converter(&mut self, column: &str, ty: &Type) -> Arc<dyn Converter> {
        let key = (column.to_uppercase(), ty.clone());

        if let Some(converter) = self.converters.get(&key) {
            return converter.clone();
        }

        let converter = match self
            .columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(column))
        {
            Some(descr) => self.shared.converters.resolve(ty, descr),
            None => self.shared.converters.resolve(ty, &Column::new(column)),
        };

        self.converters.insert(key, converter.clone());
        converter
    }

    /// Upper-cased names of the columns `result_map` maps explicitly, with
    /// `prefix` applied, that are present in this result set.
    pub(crate) fn mapped_column_names(
        &mut self,
        result_map: &ResultMap,
        prefix: &str,
    ) -> Arc<HashSet<String>> {
        let key = memo_key(result_map, prefix);
        if !self.mapped.contains_key(&key) {
            self.load_column_names(result_map, prefix, key.clone());
        }
        self.mapped.get(&key).cloned().unwrap_or_default()
    }

    /// Names, as the cursor spells them, of the columns `result_map` does
    /// not map explicitly.
    pub(crate) fn unmapped_column_names(
        &mut self,
        result_map: &ResultMap,
        prefix: &str,
    ) -> Arc<[String]> {
        let key = memo_key(result_map, prefix);
        if !self.unmapped.contains_key(&key) {
            self.load_column_names(result_map, prefix, key.clone());
        }
        self.unmapped
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn load_column_names(&mut self, result_map: &ResultMap, prefix: &str, key: String) {
        let prefix = prefix.to_uppercase();
        let declared: HashSet<String> = result_map
            .mapped_columns()
            .iter()
            .map(|column| format!("{prefix}{column}"))
            .collect();

        let mut mapped = HashSet::new();
        let mut unmapped = vec![];

        for column in &self.columns {
            let upper = column.name.to_uppercase();
            if declared.contains(&upper) {
                mapped.insert(upper);
            } else {
                unmapped.push(column.name.clone());
            }
        }

        self.mapped.insert(key.clone(), Arc::new(mapped));
        self.unmapped.insert(key, unmapped.into());
    }

    pub(crate) fn close(&mut self) {
        self.cursor.close();
    }
}

fn memo_key(result_map: &ResultMap, prefix: &str) -> String {
    format!("{}:{}", result_map.id(), prefix.to_uppercase())
}
