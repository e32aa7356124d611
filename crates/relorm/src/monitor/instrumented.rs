use super::config::MonitorConfig;
use super::truncate_sql;
use crate::client::Database;
use crate::error::{OrmError, OrmResult};
use crate::rel::{Placeholder, StatementKind};
use crate::row::ValueRow;
use crate::value::Value;
use std::future::Future;
use std::time::{Duration, Instant};

/// A database handle wrapper that enforces a query timeout and logs timings.
///
/// ```ignore
/// let db = InstrumentedDb::new(client).with_config(
///     MonitorConfig::new()
///         .with_query_timeout(Duration::from_secs(30))
///         .with_slow_query_threshold(Duration::from_millis(500)),
/// );
/// let users = User::relation().all(&db).await?;
/// ```
#[derive(Debug)]
pub struct InstrumentedDb<D> {
    db: D,
    config: MonitorConfig,
}

impl<D: Database> InstrumentedDb<D> {
    /// Wrap a handle with the default (inert) configuration.
    pub fn new(db: D) -> Self {
        Self {
            db,
            config: MonitorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the query timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = Some(timeout);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MonitorConfig {
        &mut self.config
    }

    /// Get a reference to the inner handle.
    pub fn inner(&self) -> &D {
        &self.db
    }

    /// Get the inner handle, consuming this wrapper.
    pub fn into_inner(self) -> D {
        self.db
    }

    async fn instrument<T, F>(&self, sql: &str, future: F) -> OrmResult<T>
    where
        F: Future<Output = OrmResult<T>> + Send,
    {
        let start = Instant::now();
        let result = match self.config.query_timeout {
            Some(limit) => match tokio::time::timeout(limit, future).await {
                Ok(result) => result,
                Err(_) => Err(OrmError::Timeout(limit)),
            },
            None => future.await,
        };
        self.report(sql, start.elapsed(), result.as_ref().err());
        result
    }

    fn report(&self, sql: &str, elapsed: Duration, error: Option<&OrmError>) {
        let slow = self
            .config
            .slow_query_threshold
            .is_some_and(|threshold| elapsed > threshold);
        if !slow && !self.config.logging_enabled {
            return;
        }

        let kind = StatementKind::from_sql(sql);
        let sql = truncate_sql(sql, self.config.max_sql_length);
        let elapsed_ms = elapsed.as_millis() as u64;

        if slow {
            tracing::warn!(
                target: "relorm.monitor",
                kind = ?kind,
                elapsed_ms,
                sql = %sql,
                "slow query"
            );
        }
        if self.config.logging_enabled {
            match error {
                None => tracing::debug!(
                    target: "relorm.monitor",
                    kind = ?kind,
                    elapsed_ms,
                    sql = %sql,
                    "query finished"
                ),
                Some(err) => tracing::debug!(
                    target: "relorm.monitor",
                    kind = ?kind,
                    elapsed_ms,
                    sql = %sql,
                    error = %err,
                    "query failed"
                ),
            }
        }
    }
}

impl<D: Database> Database for InstrumentedDb<D> {
    fn placeholder(&self) -> Placeholder {
        self.db.placeholder()
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<ValueRow>> {
        self.instrument(sql, self.db.query(sql, params)).await
    }

    async fn query_opt(&self, sql: &str, params: &[Value]) -> OrmResult<Option<ValueRow>> {
        self.instrument(sql, self.db.query_opt(sql, params)).await
    }

    async fn query_one(&self, sql: &str, params: &[Value]) -> OrmResult<ValueRow> {
        self.instrument(sql, self.db.query_one(sql, params)).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        self.instrument(sql, self.db.execute(sql, params)).await
    }
}
