//! A single logged PostgreSQL connection.

use crate::client::GenericClient;
use crate::config::DbopConfig;
use crate::error::{DbopError, DbopResult};
use crate::monitor::{LoggedClient, SqlLogger};
use std::str::FromStr;
use std::time::Instant;
use tokio_postgres::NoTls;

/// One open connection. Statements run in the order they are awaited.
///
/// ```rust,ignore
/// let conn = DbConnection::connect("postgres://postgres@localhost/app").await?;
/// let mut users = DbTable::new("Users", &["name"], &["VARCHAR"], None)?;
/// users.set_field_value("name", "Ann");
/// users.do_insert(&conn).await?;
/// ```
pub struct DbConnection {
    client: LoggedClient<tokio_postgres::Client>,
}

impl DbConnection {
    /// Connect with the default [`SqlLogger`].
    pub async fn connect(url: &str) -> DbopResult<Self> {
        Self::connect_with_logger(url, SqlLogger::default()).await
    }

    /// Connect using the URL and logging settings of `config`.
    pub async fn from_config(config: &DbopConfig) -> DbopResult<Self> {
        config.validate()?;
        Self::connect_with_logger(&config.database.url, config.sql_logger()?).await
    }

    pub async fn connect_with_logger(url: &str, logger: SqlLogger) -> DbopResult<Self> {
        let pg_config = tokio_postgres::Config::from_str(url)
            .map_err(|e| DbopError::Connection(format!("invalid connection string: {e}")))?;
        let (client, connection) = pg_config
            .connect(NoTls)
            .await
            .map_err(|e| DbopError::Connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "dbop.sql", error = %e, "postgres connection closed");
            }
        });

        Ok(Self {
            client: LoggedClient::new(client).with_logger(logger),
        })
    }

    /// Run a statement that is not tied to any table (DDL and the like).
    /// Returns the number of affected rows.
    pub async fn exec(&self, sql: &str) -> DbopResult<u64> {
        self.client.execute(sql).await
    }

    /// Run several statements separated by `;`.
    pub async fn batch_exec(&self, sql: &str) -> DbopResult<()> {
        let logger = self.client.logger();
        logger.before("-", sql);
        let started = Instant::now();
        let result = self
            .client
            .inner()
            .batch_execute(sql)
            .await
            .map_err(DbopError::from_db_error);
        logger.after("-", started, result.as_ref().map(|_| 0));
        result
    }

    pub fn logger(&self) -> &SqlLogger {
        self.client.logger()
    }

    /// The underlying `tokio_postgres` client.
    pub fn client(&self) -> &tokio_postgres::Client {
        self.client.inner()
    }

    pub fn is_closed(&self) -> bool {
        self.client.inner().is_closed()
    }
}

impl GenericClient for DbConnection {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str) -> DbopResult<Vec<tokio_postgres::Row>> {
        self.client.query(sql).await
    }

    async fn query_tagged(&self, tag: &str, sql: &str) -> DbopResult<Vec<tokio_postgres::Row>> {
        self.client.query_tagged(tag, sql).await
    }

    async fn execute(&self, sql: &str) -> DbopResult<u64> {
        self.client.execute(sql).await
    }

    async fn execute_tagged(&self, tag: &str, sql: &str) -> DbopResult<u64> {
        self.client.execute_tagged(tag, sql).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_malformed_url_before_connecting() {
        let result = DbConnection::connect("postgres://localhost:notaport/db").await;
        assert!(matches!(result, Err(DbopError::Connection(_))));
    }
}
