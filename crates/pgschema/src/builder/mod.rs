//! Typed statement builders.
//!
//! Each builder is a transient value for one statement kind. It accumulates projection,
//! predicate and assignment state through `mut self -> Self` methods and renders once.
//!
//! # Usage
//!
//! ```ignore
//! use pgschema::builder::{select, update, BuildStatement};
//!
//! // SELECT name, score FROM item WHERE (id = 7) AND (deleted = false)
//! let q = select((Item::NAME, Item::SCORE))
//!     .filter(Item::ID.eq(7) & Item::DELETED.eq(false));
//!
//! // UPDATE item SET score = 10
//! let u = update(Item).set(Item::SCORE, 10);
//!
//! let stmt = u.build()?; // numbered placeholders and parameters
//! let text = u.to_sql(); // inline literals
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::Delete;
pub use insert::Insert;
pub use select::{Order, Select};
pub use update::Update;

use crate::codec::{ColumnSet, FieldSet};
use crate::error::DbResult;
use crate::predicate::Predicate;
use crate::render::{RenderMode, SqlWriter, Statement, StatementKind};
use crate::schema::Table;

/// Rendering shared by all builders.
pub trait BuildStatement {
    fn kind(&self) -> StatementKind;

    /// Persisted name of the target table.
    fn table_name(&self) -> &'static str;

    /// Projected or written columns, in order.
    fn columns(&self) -> Vec<&'static str>;

    /// Whether a WHERE clause will be rendered.
    fn is_filtered(&self) -> bool;

    /// Whether the statement reports the assigned identity back.
    fn is_returning(&self) -> bool {
        false
    }

    /// Write the statement text.
    fn render(&self, w: &mut SqlWriter);

    /// Validate builder state before rendering.
    fn validate(&self) -> DbResult<()> {
        Ok(())
    }

    /// Validate and render with the given value mode.
    fn build_with(&self, mode: RenderMode) -> DbResult<Statement> {
        self.validate()?;
        let mut w = SqlWriter::new(mode);
        self.render(&mut w);
        let (sql, params) = w.finish();
        Ok(Statement {
            kind: self.kind(),
            table: self.table_name(),
            columns: self.columns(),
            filtered: self.is_filtered(),
            returning: self.is_returning(),
            sql,
            params,
        })
    }

    /// Validate and render with numbered placeholders.
    fn build(&self) -> DbResult<Statement> {
        self.build_with(RenderMode::Numbered)
    }

    /// Statement text with inline literals.
    fn to_sql(&self) -> String {
        let mut w = SqlWriter::new(RenderMode::Inline);
        self.render(&mut w);
        w.finish().0
    }
}

/// Create a SELECT over a column or a tuple of columns of one table.
///
/// The projection order defines the decoded tuple order.
pub fn select<C: ColumnSet>(_columns: C) -> Select<C::Fields> {
    Select::fields()
}

/// Create an INSERT from the table's writable field tuple.
pub fn insert<Q>(values: Q) -> Insert<Q::Table>
where
    Q: FieldSet,
    Q::Table: Table<Insert = Q>,
{
    Insert::new(&values)
}

/// Create an UPDATE for a table.
pub fn update<T: Table>(_table: T) -> Update<T> {
    Update::new()
}

/// Create a DELETE for a table.
pub fn delete<T: Table>(_table: T) -> Delete<T> {
    Delete::new()
}

/// Combine an accumulated filter with a new predicate.
fn and_filter<T>(current: Option<Predicate<T>>, next: Predicate<T>) -> Option<Predicate<T>> {
    Some(match current {
        Some(prev) => prev.and(next),
        None => next,
    })
}

fn render_where<T>(w: &mut SqlWriter, filter: Option<&Predicate<T>>) {
    if let Some(predicate) = filter {
        w.push(" WHERE ");
        predicate.render(w);
    }
}

#[cfg(test)]
mod tests;
