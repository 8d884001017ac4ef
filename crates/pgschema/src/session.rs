//! Typed statement execution.
//!
//! A [`Session`] pairs an [`Executor`] with a [`SessionConfig`]. It renders builders, runs them
//! and decodes the returned cells into the builder's field tuple.
//!
//! ```ignore
//! let session = Session::new(&client);
//!
//! let id = session
//!     .insert_returning_id(Item::insert((Name("a".into()), Score(5))))
//!     .await?;
//!
//! let rows: Vec<(Name, Score)> = session
//!     .fetch_all(&select((Item::NAME, Item::SCORE)).filter(Item::ID.eq(id)))
//!     .await?;
//! ```

use crate::builder::{BuildStatement, Insert, Select};
use crate::client::Executor;
use crate::codec::FieldSet;
use crate::error::{DbError, DbResult};
use crate::render::{RenderMode, Statement};
use crate::schema::{HasIdentity, IDENTITY_COLUMN, Table};
use crate::value::{SqlType, Value};
use std::time::Duration;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How values reach the executor.
    pub render_mode: RenderMode,
    /// Per-statement timeout.
    pub query_timeout: Option<Duration>,
    /// Whether to emit a tracing event per statement.
    pub logging_enabled: bool,
    /// Tracing event level for statements.
    #[cfg(feature = "tracing")]
    pub log_level: tracing::Level,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Numbered,
            query_timeout: None,
            logging_enabled: true,
            #[cfg(feature = "tracing")]
            log_level: tracing::Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value rendering mode.
    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Set the per-statement timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.query_timeout = Some(duration);
        self
    }

    /// Remove the per-statement timeout.
    pub fn no_timeout(mut self) -> Self {
        self.query_timeout = None;
        self
    }

    /// Enable or disable statement logging.
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Override the tracing event level.
    #[cfg(feature = "tracing")]
    pub fn log_level(mut self, level: tracing::Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}

/// Runs typed statements through an executor.
#[derive(Debug, Clone)]
pub struct Session<E> {
    executor: E,
    config: SessionConfig,
}

impl<E: Executor> Session<E> {
    /// Wrap an executor with the default configuration.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, SessionConfig::default())
    }

    pub fn with_config(executor: E, config: SessionConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    /// Run a SELECT and decode every row.
    pub async fn fetch_all<Q: FieldSet>(&self, query: &Select<Q>) -> DbResult<Vec<Q>> {
        let stmt = self.prepare(query)?;
        let rows = self.run_fetch(&stmt).await?;
        rows.into_iter().map(Q::decode).collect()
    }

    /// Run a SELECT expected to match zero or one row.
    ///
    /// More than one row is [`DbError::TooManyRows`].
    pub async fn fetch_opt<Q: FieldSet>(&self, query: &Select<Q>) -> DbResult<Option<Q>> {
        let stmt = self.prepare(query)?;
        let rows = self.run_fetch(&stmt).await?;
        match rows.len() {
            0 => Ok(None),
            1 => rows.into_iter().next().map(Q::decode).transpose(),
            got => Err(DbError::too_many_rows(1, got)),
        }
    }

    /// Run a SELECT that must match exactly one row.
    ///
    /// No row is [`DbError::NotFound`]; more than one is [`DbError::TooManyRows`].
    pub async fn fetch_one<Q: FieldSet>(&self, query: &Select<Q>) -> DbResult<Q> {
        self.fetch_opt(query).await?.ok_or_else(|| {
            DbError::not_found(format!(
                "Expected 1 row from {}, got 0",
                <Q::Table as Table>::NAME
            ))
        })
    }

    /// Run an INSERT, UPDATE or DELETE and return the affected row count.
    pub async fn execute(&self, statement: &impl BuildStatement) -> DbResult<u64> {
        let stmt = self.prepare(statement)?;
        self.run_execute(&stmt).await
    }

    /// Run an INSERT and return the identity the database assigned.
    pub async fn insert_returning_id<T>(&self, insert: Insert<T>) -> DbResult<i32>
    where
        T: Table,
        T::Fragment: HasIdentity,
    {
        let stmt = self.prepare(&insert.returning_id())?;
        let rows = self.run_fetch(&stmt).await?;
        let cell = match rows.as_slice() {
            [row] => match row.as_slice() {
                [cell] => cell.clone(),
                cells => {
                    return Err(DbError::Arity {
                        expected: 1,
                        got: cells.len(),
                    });
                }
            },
            [] => return Err(DbError::not_found(format!("INSERT INTO {} returned no id", T::NAME))),
            many => return Err(DbError::too_many_rows(1, many.len())),
        };
        i32::from_value(cell).map_err(|e| DbError::decode(IDENTITY_COLUMN.name, e.to_string()))
    }

    fn prepare(&self, builder: &impl BuildStatement) -> DbResult<Statement> {
        let stmt = builder.build_with(self.config.render_mode)?;
        self.log(&stmt);
        Ok(stmt)
    }

    async fn run_fetch(&self, stmt: &Statement) -> DbResult<Vec<Vec<Value>>> {
        self.with_timeout(self.executor.fetch(stmt)).await
    }

    async fn run_execute(&self, stmt: &Statement) -> DbResult<u64> {
        self.with_timeout(self.executor.execute(stmt)).await
    }

    /// Execute with timeout if configured.
    async fn with_timeout<T, F>(&self, future: F) -> DbResult<T>
    where
        F: std::future::Future<Output = DbResult<T>> + Send,
    {
        match self.config.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, future).await.map_err(|_| {
                if let Some(cancel_token) = self.executor.cancel_token() {
                    tokio::spawn(async move {
                        let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
                    });
                }
                DbError::Timeout(timeout)
            })?,
            None => future.await,
        }
    }

    #[cfg(feature = "tracing")]
    fn log(&self, stmt: &Statement) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    tracing::Level::ERROR => tracing::error!($($field)*),
                    tracing::Level::WARN => tracing::warn!($($field)*),
                    tracing::Level::INFO => tracing::info!($($field)*),
                    tracing::Level::DEBUG => tracing::debug!($($field)*),
                    tracing::Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        if stmt.is_unfiltered_mutation() {
            tracing::warn!(
                target: "pgschema.sql",
                kind = %stmt.kind,
                table = stmt.table,
                "statement has no WHERE clause and affects every row"
            );
        }
        if !self.config.logging_enabled {
            return;
        }
        let sql = truncate_sql(&stmt.sql, self.config.max_sql_length);
        emit_at_level!(
            self.config.log_level,
            target: "pgschema.sql",
            kind = %stmt.kind,
            table = stmt.table,
            param_count = stmt.params.len(),
            sql = %sql,
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn log(&self, _stmt: &Statement) {}
}

/// Truncate to at most `max` bytes on a char boundary, marking the cut.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn truncate_sql(sql: &str, max: Option<usize>) -> std::borrow::Cow<'_, str> {
    match max {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while end > 0 && !sql.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &sql[..end]).into()
        }
        _ => sql.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = SessionConfig::new()
            .render_mode(RenderMode::Inline)
            .timeout(Duration::from_millis(250))
            .logging(false)
            .max_sql_length(10);
        assert_eq!(config.render_mode, RenderMode::Inline);
        assert_eq!(config.query_timeout, Some(Duration::from_millis(250)));
        assert!(!config.logging_enabled);
        assert_eq!(config.max_sql_length, Some(10));
        assert_eq!(config.no_timeout().no_truncate().query_timeout, None);
    }

    #[test]
    fn default_config_renders_numbered() {
        let config = SessionConfig::default();
        assert_eq!(config.render_mode, RenderMode::Numbered);
        assert_eq!(config.max_sql_length, Some(200));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql("SELECT 1", Some(20)), "SELECT 1");
        assert_eq!(truncate_sql("SELECT 1", Some(6)), "SELECT...");
        assert_eq!(truncate_sql("'é'", Some(2)), "'...");
        assert_eq!(truncate_sql("SELECT 1", None), "SELECT 1");
    }
}
