//! Database handle abstraction.
//!
//! Relations and records never open connections. They are handed something
//! implementing [`Database`]: a plain `tokio_postgres::Client`, a
//! transaction, a pooled client, or a wrapper such as
//! [`InstrumentedDb`](crate::monitor::InstrumentedDb). They cannot tell
//! which.

use crate::error::{OrmError, OrmResult};
use crate::rel::Placeholder;
use crate::row::ValueRow;
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// The capability every handle provides: run a statement with positional
/// parameters.
///
/// Cancellation works by dropping the returned future. Deadlines belong to
/// the handle (see [`InstrumentedDb`](crate::monitor::InstrumentedDb)); the
/// core never retries.
pub trait Database: Send + Sync {
    /// Placeholder style this handle expects in SQL text.
    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }

    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Vec<ValueRow>>> + Send;

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Option<ValueRow>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a query and return the first row.
    ///
    /// Returns [`OrmError::NotFound`] if no rows are returned.
    fn query_one(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<ValueRow>> + Send {
        async move {
            self.query_opt(sql, params)
                .await?
                .ok_or_else(|| OrmError::not_found("Expected one row, got none"))
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;
}

fn pg_params(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl Database for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<ValueRow>> {
        let rows = tokio_postgres::Client::query(self, sql, &pg_params(params))
            .await
            .map_err(OrmError::from_db_error)?;
        ValueRow::from_pg_rows(&rows)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        tokio_postgres::Client::execute(self, sql, &pg_params(params))
            .await
            .map_err(OrmError::from_db_error)
    }
}

impl Database for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<ValueRow>> {
        let rows = tokio_postgres::Transaction::query(self, sql, &pg_params(params))
            .await
            .map_err(OrmError::from_db_error)?;
        ValueRow::from_pg_rows(&rows)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, &pg_params(params))
            .await
            .map_err(OrmError::from_db_error)
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl Database for deadpool_postgres::ClientWrapper {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<ValueRow>> {
        Database::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        Database::execute(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl Database for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<ValueRow>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        Database::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        Database::execute(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl Database for deadpool_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<ValueRow>> {
        Database::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        Database::execute(&**self, sql, params).await
    }
}

impl<D: Database> Database for &D {
    fn placeholder(&self) -> Placeholder {
        (*self).placeholder()
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<ValueRow>> {
        (*self).query(sql, params).await
    }

    async fn query_opt(&self, sql: &str, params: &[Value]) -> OrmResult<Option<ValueRow>> {
        (*self).query_opt(sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[Value]) -> OrmResult<ValueRow> {
        (*self).query_one(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        (*self).execute(sql, params).await
    }
}
