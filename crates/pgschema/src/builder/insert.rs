//! INSERT builder.

use super::BuildStatement;
use crate::codec::FieldSet;
use crate::render::{SqlWriter, StatementKind};
use crate::schema::{HasIdentity, HasRefCount, IDENTITY_COLUMN, REF_COUNT_COLUMN, Table};
use crate::value::Value;
use std::marker::PhantomData;

/// INSERT builder over a table's writable columns.
///
/// Fragment columns are never written from the field tuple: the identity is assigned by the
/// database and the reference count is only written when given with [`Insert::ref_count`].
pub struct Insert<T: Table> {
    columns: Vec<&'static str>,
    values: Vec<Value>,
    ref_count: Option<i32>,
    returning: bool,
    _table: PhantomData<fn() -> T>,
}

impl<T: Table> Insert<T> {
    pub(crate) fn new<Q: FieldSet<Table = T>>(values: &Q) -> Self {
        Self {
            columns: Q::column_names(),
            values: values.encode(),
            ref_count: None,
            returning: false,
            _table: PhantomData,
        }
    }

    /// Values in column order, including an explicit reference count.
    pub fn values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.values.len() + 1);
        if let Some(n) = self.ref_count {
            values.push(Value::from(n));
        }
        values.extend(self.values.iter().cloned());
        values
    }
}

impl<T: Table> Insert<T>
where
    T::Fragment: HasRefCount,
{
    /// Write an explicit reference count instead of the column default.
    pub fn ref_count(mut self, count: i32) -> Self {
        self.ref_count = Some(count);
        self
    }
}

impl<T: Table> Insert<T>
where
    T::Fragment: HasIdentity,
{
    /// Append `RETURNING id` so the assigned identity is reported back.
    pub fn returning_id(mut self) -> Self {
        self.returning = true;
        self
    }
}

impl<T: Table> BuildStatement for Insert<T> {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn table_name(&self) -> &'static str {
        T::NAME
    }

    fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        if self.ref_count.is_some() {
            columns.push(REF_COUNT_COLUMN.name);
        }
        columns.extend_from_slice(&self.columns);
        columns
    }

    fn is_filtered(&self) -> bool {
        false
    }

    fn is_returning(&self) -> bool {
        self.returning
    }

    fn render(&self, w: &mut SqlWriter) {
        w.push("INSERT INTO ")
            .push(T::NAME)
            .push(" (")
            .push_names(&self.columns())
            .push(") VALUES (")
            .push_values(&self.values())
            .push(")");
        if self.returning {
            w.push(" RETURNING ").push(IDENTITY_COLUMN.name);
        }
    }
}

impl<T: Table> Clone for Insert<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            values: self.values.clone(),
            ref_count: self.ref_count,
            returning: self.returning,
            _table: PhantomData,
        }
    }
}

impl<T: Table> std::fmt::Debug for Insert<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Insert")
            .field("table", &T::NAME)
            .field("columns", &self.columns())
            .field("values", &self.values())
            .field("returning", &self.returning)
            .finish()
    }
}
