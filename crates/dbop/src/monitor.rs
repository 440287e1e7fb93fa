//! SQL logging for executed statements.
//!
//! [`LoggedClient`] wraps any [`GenericClient`] and emits a `tracing` event
//! with target `dbop.sql` before each statement and one after it completes.
//!
//! ```rust,ignore
//! use dbop::monitor::{LoggedClient, SqlLogger};
//! use tracing::Level;
//!
//! let client = LoggedClient::new(pg_client).with_logger(SqlLogger::new().level(Level::INFO));
//! ```

use crate::client::GenericClient;
use crate::error::DbopResult;
use std::time::Instant;
use tracing::Level;

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        if $level == Level::ERROR {
            tracing::error!($($field)*)
        } else if $level == Level::WARN {
            tracing::warn!($($field)*)
        } else if $level == Level::INFO {
            tracing::info!($($field)*)
        } else if $level == Level::DEBUG {
            tracing::debug!($($field)*)
        } else {
            tracing::trace!($($field)*)
        }
    };
}

/// Truncate to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// Other SQL (e.g., DDL, custom)
    Other,
}

impl QueryType {
    /// Detect query type from the leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        fn starts_with_keyword(s: &str, keyword: &str) -> bool {
            match s.get(0..keyword.len()) {
                Some(prefix) => prefix.eq_ignore_ascii_case(keyword),
                None => false,
            }
        }

        let trimmed = sql.trim_start().trim_start_matches('(');
        if starts_with_keyword(trimmed, "SELECT") || starts_with_keyword(trimmed, "WITH") {
            QueryType::Select
        } else if starts_with_keyword(trimmed, "INSERT") {
            QueryType::Insert
        } else if starts_with_keyword(trimmed, "UPDATE") {
            QueryType::Update
        } else if starts_with_keyword(trimmed, "DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

/// A `tracing`-based logger for the SQL that will actually be executed.
#[derive(Debug, Clone)]
pub struct SqlLogger {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SqlLogger {
    /// Create a new logger with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Emit the "about to run" event.
    pub fn before(&self, tag: &str, sql: &str) {
        let query_type = QueryType::from_sql(sql);
        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "dbop.sql",
            query_type = ?query_type,
            tag,
            sql = %sql,
            "executing statement"
        );
    }

    /// Emit the completion event with the elapsed time and affected/returned rows.
    pub fn after(&self, tag: &str, started: Instant, result: Result<u64, &crate::DbopError>) {
        let elapsed_us = started.elapsed().as_micros() as u64;
        match result {
            Ok(rows) => emit_at_level!(
                self.level,
                target: "dbop.sql",
                tag,
                elapsed_us,
                rows,
                "statement finished"
            ),
            Err(err) => tracing::warn!(
                target: "dbop.sql",
                tag,
                elapsed_us,
                error = %err,
                "statement failed"
            ),
        }
    }
}

/// A client wrapper that logs every statement through a [`SqlLogger`].
#[derive(Debug, Clone)]
pub struct LoggedClient<C> {
    inner: C,
    logger: SqlLogger,
}

impl<C: GenericClient> LoggedClient<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            logger: SqlLogger::default(),
        }
    }

    pub fn with_logger(mut self, logger: SqlLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger(&self) -> &SqlLogger {
        &self.logger
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: GenericClient> GenericClient for LoggedClient<C> {
    type Row = C::Row;

    async fn query(&self, sql: &str) -> DbopResult<Vec<C::Row>> {
        self.query_tagged("-", sql).await
    }

    async fn query_tagged(&self, tag: &str, sql: &str) -> DbopResult<Vec<C::Row>> {
        self.logger.before(tag, sql);
        let started = Instant::now();
        let result = self.inner.query_tagged(tag, sql).await;
        self.logger.after(tag, started, result.as_ref().map(|rows| rows.len() as u64));
        result
    }

    async fn execute(&self, sql: &str) -> DbopResult<u64> {
        self.execute_tagged("-", sql).await
    }

    async fn execute_tagged(&self, tag: &str, sql: &str) -> DbopResult<u64> {
        self.logger.before(tag, sql);
        let started = Instant::now();
        let result = self.inner.execute_tagged(tag, sql).await;
        self.logger.after(tag, started, result.as_ref().copied());
        result
    }
}
