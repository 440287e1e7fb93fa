//! Generic client trait for the database collaborator.

use crate::error::{DbopError, DbopResult};
use crate::row::RowSource;

/// The database surface the table handles depend on.
///
/// Statements arrive as complete SQL text (literals already rendered), so
/// there are no bind parameters. Implementations propagate driver errors
/// unchanged and never retry.
pub trait GenericClient: Send + Sync {
    /// Row type returned by [`GenericClient::query`].
    type Row: RowSource + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = DbopResult<Vec<Self::Row>>> + Send;

    /// Execute a query and return all rows, associating a tag for logging.
    ///
    /// The default implementation ignores `tag` and calls [`GenericClient::query`].
    fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
    ) -> impl std::future::Future<Output = DbopResult<Vec<Self::Row>>> + Send {
        let _ = tag;
        self.query(sql)
    }

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 row: returns `Ok(Some(row))`
    /// - multiple rows: returns `Ok(Some(first_row))` (does **not** error)
    fn query_opt(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = DbopResult<Option<Self::Row>>> + Send {
        async move {
            let rows = self.query(sql).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a query and return the first row, failing with
    /// [`DbopError::NotFound`] when there is none.
    fn query_one(
        &self,
        sql: &str,
    ) -> impl std::future::Future<Output = DbopResult<Self::Row>> + Send {
        async move {
            self.query_opt(sql)
                .await?
                .ok_or_else(|| DbopError::not_found("Expected one row, got none"))
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = DbopResult<u64>> + Send;

    /// Execute a statement and return the number of affected rows, associating a tag for logging.
    ///
    /// The default implementation ignores `tag` and calls [`GenericClient::execute`].
    fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
    ) -> impl std::future::Future<Output = DbopResult<u64>> + Send {
        let _ = tag;
        self.execute(sql)
    }
}

impl GenericClient for tokio_postgres::Client {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str) -> DbopResult<Vec<tokio_postgres::Row>> {
        tokio_postgres::Client::query(self, sql, &[])
            .await
            .map_err(DbopError::from_db_error)
    }

    async fn execute(&self, sql: &str) -> DbopResult<u64> {
        tokio_postgres::Client::execute(self, sql, &[])
            .await
            .map_err(DbopError::from_db_error)
    }
}
