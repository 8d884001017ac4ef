//! Fetched rows as untyped cells

use crate::error::{DbError, DbResult};
use crate::value::Value;
use tokio_postgres::Row;

/// Convert a row into its cells, in column order.
pub fn row_values(row: &Row) -> DbResult<Vec<Value>> {
    (0..row.len())
        .map(|i| {
            row.try_get::<_, Value>(i)
                .map_err(|e| DbError::decode(row.columns()[i].name(), e.to_string()))
        })
        .collect()
}

/// Extension trait for Row to read every cell
pub trait RowExt {
    /// All cells, returning DbError::Decode on an unsupported column type
    fn values(&self) -> DbResult<Vec<Value>>;
}

impl RowExt for Row {
    fn values(&self) -> DbResult<Vec<Value>> {
        row_values(self)
    }
}
