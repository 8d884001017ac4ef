//! DELETE builder.

use super::{BuildStatement, and_filter, render_where};
use crate::predicate::Predicate;
use crate::render::{SqlWriter, StatementKind};
use crate::schema::Table;
use std::marker::PhantomData;

/// DELETE builder. Without a filter every row is deleted; no guard is added.
pub struct Delete<T: Table> {
    filter: Option<Predicate<T>>,
    _table: PhantomData<fn() -> T>,
}

impl<T: Table> Delete<T> {
    pub(crate) fn new() -> Self {
        Self {
            filter: None,
            _table: PhantomData,
        }
    }

    /// Add a WHERE predicate. Repeated calls are combined with AND.
    pub fn filter(mut self, predicate: Predicate<T>) -> Self {
        self.filter = and_filter(self.filter.take(), predicate);
        self
    }
}

impl<T: Table> BuildStatement for Delete<T> {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn table_name(&self) -> &'static str {
        T::NAME
    }

    fn columns(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    fn render(&self, w: &mut SqlWriter) {
        w.push("DELETE FROM ").push(T::NAME);
        render_where(w, self.filter.as_ref());
    }
}

impl<T: Table> Clone for Delete<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            _table: PhantomData,
        }
    }
}

impl<T: Table> std::fmt::Debug for Delete<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delete")
            .field("table", &T::NAME)
            .field("filter", &self.filter)
            .finish()
    }
}
