//! Executor boundary.
//!
//! An [`Executor`] runs a rendered [`Statement`] and hands back rows as untyped cells, or an
//! affected-row count. It is implemented for `tokio_postgres` clients and transactions and for
//! pooled `deadpool_postgres` clients, so a [`Session`](crate::Session) works the same with or
//! without a transaction.

use crate::error::{DbError, DbResult};
use crate::render::Statement;
use crate::row::RowExt;
use crate::value::Value;

/// Runs statements and returns cells.
pub trait Executor: Send + Sync {
    /// Run a row-returning statement.
    fn fetch(
        &self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = DbResult<Vec<Vec<Value>>>> + Send;

    /// Run a statement and return the number of affected rows.
    fn execute(&self, stmt: &Statement) -> impl std::future::Future<Output = DbResult<u64>> + Send;

    /// A cancellation token for the underlying connection, if supported.
    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        None
    }
}

impl Executor for tokio_postgres::Client {
    async fn fetch(&self, stmt: &Statement) -> DbResult<Vec<Vec<Value>>> {
        let params = stmt.params_ref();
        let rows = tokio_postgres::Client::query(self, stmt.sql.as_str(), &params)
            .await
            .map_err(DbError::from_db_error)?;
        rows.iter().map(RowExt::values).collect()
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        let params = stmt.params_ref();
        tokio_postgres::Client::execute(self, stmt.sql.as_str(), &params)
            .await
            .map_err(DbError::from_db_error)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Client::cancel_token(self))
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    async fn fetch(&self, stmt: &Statement) -> DbResult<Vec<Vec<Value>>> {
        let params = stmt.params_ref();
        let rows = tokio_postgres::Transaction::query(self, stmt.sql.as_str(), &params)
            .await
            .map_err(DbError::from_db_error)?;
        rows.iter().map(RowExt::values).collect()
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        let params = stmt.params_ref();
        tokio_postgres::Transaction::execute(self, stmt.sql.as_str(), &params)
            .await
            .map_err(DbError::from_db_error)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Transaction::cancel_token(self))
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    async fn fetch(&self, stmt: &Statement) -> DbResult<Vec<Vec<Value>>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        Executor::fetch(&**self, stmt).await
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        Executor::execute(&**self, stmt).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Executor::cancel_token(&**self)
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::ClientWrapper {
    async fn fetch(&self, stmt: &Statement) -> DbResult<Vec<Vec<Value>>> {
        Executor::fetch(&**self, stmt).await
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        Executor::execute(&**self, stmt).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Executor::cancel_token(&**self)
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Transaction<'_> {
    async fn fetch(&self, stmt: &Statement) -> DbResult<Vec<Vec<Value>>> {
        Executor::fetch(&**self, stmt).await
    }

    async fn execute(&self, stmt: &Statement) -> DbResult<u64> {
        Executor::execute(&**self, stmt).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Executor::cancel_token(&**self)
    }
}

impl<E: Executor> Executor for &E {
    fn fetch(
        &self,
        stmt: &Statement,
    ) -> impl std::future::Future<Output = DbResult<Vec<Vec<Value>>>> + Send {
        (**self).fetch(stmt)
    }

    fn execute(&self, stmt: &Statement) -> impl std::future::Future<Output = DbResult<u64>> + Send {
        (**self).execute(stmt)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        (**self).cancel_token()
    }
}
