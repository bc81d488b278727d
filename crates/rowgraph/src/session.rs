use crate::{
    db::Shared,
    engine::{extract_from_list, CacheEntry, DeferredLoad, LocalCache, ResultSetHandler},
    settings::LocalCacheScope,
};

use rowgraph_core::{
    async_trait,
    object::{LoadHandle, Loader},
    schema::MappedStatement,
    stmt::{Fingerprint, RowBounds, Type, Value},
    Error, Object, Result,
};

use async_recursion::async_recursion;
use std::{collections::VecDeque, sync::Arc};
use tracing::debug;

/// A unit of work with its own query cache.
///
/// Results are cached per statement, bounds and parameter until a write,
/// commit, rollback or [`Session::clear_cache`]. Statements run while
/// materializing another statement's rows (nested queries) share the cache;
/// associations they cannot fill yet are applied once the outermost statement
/// completes.
///
/// Sessions are not shared between tasks; open one per unit of work with
/// [`Db::session`](crate::Db::session).
pub struct Session {
    shared: Arc<Shared>,
    local_cache: LocalCache,
    deferred_loads: VecDeque<DeferredLoad>,

    /// Number of statements currently running, including nested ones
    query_stack: usize,

    closed: bool,
}

impl Session {
    pub(crate) fn new(shared: Arc<Shared>) -> Session {
        Session {
            shared,
            local_cache: LocalCache::default(),
            deferred_loads: VecDeque::new(),
            query_stack: 0,
            closed: false,
        }
    }

    /// Runs `statement` and materializes every row.
    ///
    /// Statements with several result maps return one `Value::List` per
    /// result map.
    pub async fn select(&mut self, statement: &str, parameter: impl Into<Value>) -> Result<Vec<Value>> {
        self.select_with_bounds(statement, parameter, RowBounds::DEFAULT)
            .await
    }

    pub async fn select_with_bounds(
        &mut self,
        statement: &str,
        parameter: impl Into<Value>,
        bounds: RowBounds,
    ) -> Result<Vec<Value>> {
        let statement = self.shared.schema.statement(statement)?.clone();
        let parameter = parameter.into();
        let key = self.create_cache_key(&statement, &parameter, bounds);
        self.query(statement, parameter, bounds, key).await
    }

    /// Runs `statement` expecting at most one row; zero rows yield `Value::Null`.
    pub async fn select_one(&mut self, statement: &str, parameter: impl Into<Value>) -> Result<Value> {
        let mut rows = self.select(statement, parameter).await?;

        match rows.len() {
            0 => Ok(Value::Null),
            1 => Ok(rows.swap_remove(0)),
            n => Err(Error::too_many_records(format!(
                "expected one result (or null) to be returned by `{statement}`, but found {n}"
            ))),
        }
    }

    /// Runs a write. Cached results are discarded first.
    pub async fn update(&mut self, statement: &str, parameter: impl Into<Value>) -> Result<u64> {
        self.ensure_open()?;
        let statement = self.shared.schema.statement(statement)?.clone();
        self.clear_cache();
        self.shared.driver.update(&statement, &parameter.into()).await
    }

    pub fn commit(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.clear_cache();
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.clear_cache();
        Ok(())
    }

    pub fn clear_cache(&mut self) {
        self.local_cache.clear();
    }

    pub fn close(&mut self) {
        self.local_cache.clear();
        self.deferred_loads.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The key a statement's rows are cached under.
    pub fn create_cache_key(
        &self,
        statement: &MappedStatement,
        parameter: &Value,
        bounds: RowBounds,
    ) -> Fingerprint {
        let limit = i64::try_from(bounds.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(bounds.offset).unwrap_or(i64::MAX);

        Fingerprint::builder()
            .contribute(statement.id.as_str())
            .contribute(offset)
            .contribute(limit)
            .contribute(parameter.clone())
            .build()
    }

    /// Returns `true` if `key` has an entry, complete or still running.
    pub fn is_cached(&self, key: &Fingerprint) -> bool {
        self.local_cache.contains(key)
    }

    /// Assigns the cached result for `key` to `owner.property`, now if the
    /// statement has completed, otherwise after the outermost statement does.
    pub(crate) fn defer_load(
        &mut self,
        owner: Object,
        property: String,
        key: Fingerprint,
        target: Type,
    ) -> Result<()> {
        let load = DeferredLoad::new(owner, property, key, target);

        if load.can_load(&self.local_cache) {
            load.load(&self.local_cache, &*self.shared.factory)
        } else {
            self.deferred_loads.push_back(load);
            Ok(())
        }
    }

    #[async_recursion]
    pub(crate) async fn query(
        &mut self,
        statement: Arc<MappedStatement>,
        parameter: Value,
        bounds: RowBounds,
        key: Fingerprint,
    ) -> Result<Vec<Value>> {
        self.ensure_open()?;

        if self.query_stack == 0 && statement.flush_cache {
            self.clear_cache();
        }

        self.query_stack += 1;
        let result = self.query_cached(&statement, &parameter, bounds, key).await;
        self.query_stack -= 1;

        if self.query_stack > 0 {
            return result;
        }

        let loads = std::mem::take(&mut self.deferred_loads);
        let result = match result {
            Ok(rows) => self.apply_deferred_loads(&statement, &loads).map(|()| rows),
            Err(err) => Err(err),
        };

        if self.shared.settings.local_cache_scope == LocalCacheScope::Statement {
            self.clear_cache();
        }

        result
    }

    fn apply_deferred_loads(
        &self,
        statement: &MappedStatement,
        loads: &VecDeque<DeferredLoad>,
    ) -> Result<()> {
        if !loads.is_empty() {
            debug!(statement = %statement.id, count = loads.len(), "applying deferred loads");
        }

        for load in loads {
            load.load(&self.local_cache, &*self.shared.factory)?;
        }

        Ok(())
    }

    async fn query_cached(
        &mut self,
        statement: &Arc<MappedStatement>,
        parameter: &Value,
        bounds: RowBounds,
        key: Fingerprint,
    ) -> Result<Vec<Value>> {
        match self.local_cache.get(&key) {
            Some(CacheEntry::Loaded(rows)) => {
                debug!(statement = %statement.id, depth = self.query_stack, "local cache hit");
                return Ok(rows.clone());
            }
            Some(CacheEntry::Placeholder) => {
                rowgraph_core::bail!(
                    "statement `{}` was re-entered with the same parameter while running",
                    statement.id
                );
            }
            None => {}
        }

        self.local_cache.put_placeholder(key.clone());
        let result = self.execute(statement, parameter, bounds).await;
        self.local_cache.remove(&key);

        let rows = result?;
        self.local_cache.put(key, rows.clone());
        Ok(rows)
    }

    async fn execute(
        &mut self,
        statement: &Arc<MappedStatement>,
        parameter: &Value,
        bounds: RowBounds,
    ) -> Result<Vec<Value>> {
        debug!(
            statement = %statement.id,
            offset = bounds.offset,
            limit = bounds.limit,
            depth = self.query_stack,
            "executing statement"
        );

        let response = self
            .shared
            .driver
            .query(statement, parameter, bounds)
            .await?;

        ResultSetHandler::new(self.shared.clone(), statement.clone(), bounds)
            .handle_result_sets(self, response)
            .await
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            rowgraph_core::bail!("session is closed");
        }
        Ok(())
    }
}

#[async_trait]
impl Loader for Session {
    async fn load(&mut self, handle: &LoadHandle) -> Result<Value> {
        let statement = self.shared.schema.statement(handle.statement())?.clone();
        let rows = self
            .query(
                statement,
                handle.parameter().clone(),
                RowBounds::DEFAULT,
                handle.key().clone(),
            )
            .await?;

        extract_from_list(rows, handle.target(), &*self.shared.factory)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cached", &self.local_cache.len())
            .field("deferred_loads", &self.deferred_loads.len())
            .field("query_stack", &self.query_stack)
            .field("closed", &self.closed)
            .finish()
    }
}
