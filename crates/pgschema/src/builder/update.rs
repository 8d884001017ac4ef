//! UPDATE builder.

use super::{BuildStatement, and_filter, render_where};
use crate::codec::FieldSet;
use crate::error::{DbError, DbResult};
use crate::field::{Column, Field};
use crate::predicate::Predicate;
use crate::render::{SqlWriter, StatementKind};
use crate::schema::Table;
use crate::value::{Nullable, SqlType, Value};
use std::marker::PhantomData;

/// UPDATE builder. Without a filter every row is updated; no guard is added.
pub struct Update<T: Table> {
    assignments: Vec<(&'static str, Value)>,
    filter: Option<Predicate<T>>,
    _table: PhantomData<fn() -> T>,
}

impl<T: Table> Update<T> {
    pub(crate) fn new() -> Self {
        Self {
            assignments: Vec::new(),
            filter: None,
            _table: PhantomData,
        }
    }

    fn assign(&mut self, name: &'static str, value: Value) {
        // A column assigned twice keeps its first position and the latest value.
        match self.assignments.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.assignments.push((name, value)),
        }
    }

    /// `SET column = value`
    pub fn set<F: Field<Table = T>>(mut self, _column: Column<F>, value: impl Into<F::Value>) -> Self {
        let value: F::Value = value.into();
        self.assign(F::NAME, value.to_value());
        self
    }

    /// `SET column = NULL`, optional columns only.
    pub fn set_null<F: Field<Table = T>>(mut self, _column: Column<F>) -> Self
    where
        F::Value: Nullable,
    {
        self.assign(F::NAME, Value::Null);
        self
    }

    /// Assign every field of a tuple, in tuple order.
    pub fn set_fields<Q: FieldSet<Table = T>>(mut self, values: Q) -> Self {
        for (name, value) in Q::column_names().into_iter().zip(values.encode()) {
            self.assign(name, value);
        }
        self
    }

    /// Add a WHERE predicate. Repeated calls are combined with AND.
    pub fn filter(mut self, predicate: Predicate<T>) -> Self {
        self.filter = and_filter(self.filter.take(), predicate);
        self
    }
}

impl<T: Table> BuildStatement for Update<T> {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn table_name(&self) -> &'static str {
        T::NAME
    }

    fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(name, _)| *name).collect()
    }

    fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    fn validate(&self) -> DbResult<()> {
        if self.assignments.is_empty() {
            return Err(DbError::validation(format!(
                "UPDATE {} has no SET assignments",
                T::NAME
            )));
        }
        Ok(())
    }

    fn render(&self, w: &mut SqlWriter) {
        w.push("UPDATE ").push(T::NAME).push(" SET ");
        for (i, (name, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push(name).push(" = ").push_value(value);
        }
        render_where(w, self.filter.as_ref());
    }
}

impl<T: Table> Clone for Update<T> {
    fn clone(&self) -> Self {
        Self {
            assignments: self.assignments.clone(),
            filter: self.filter.clone(),
            _table: PhantomData,
        }
    }
}

impl<T: Table> std::fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Update")
            .field("table", &T::NAME)
            .field("assignments", &self.assignments)
            .field("filter", &self.filter)
            .finish()
    }
}
