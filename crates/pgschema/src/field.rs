//! Typed fields and the column tokens that name them.
//!
//! A [`Field`] is a value holder bound to one table: it knows its persisted column name and
//! the Rust type of its value. A [`Column`] is a zero-sized token for a field type and is the
//! only way to build comparisons and assignments, so a literal of the wrong type, or a column
//! from another table, fails to compile.
//!
//! ```
//! use pgschema::prelude::*;
//!
//! mod exhibits {
//!     pgschema::table! {
//!         pub struct Exhibits("exhibits"): Identity {
//!             OPENED: Opened => "opened": Option<chrono::NaiveDate>,
//!             IS_DELETED: IsDeleted => "is_deleted": bool,
//!         }
//!     }
//! }
//! use exhibits::Exhibits;
//!
//! // `ID` is a `Column<Id>` where `Id: Field<Value = i32>`
//! let p = Exhibits::ID.eq(7) & Exhibits::IS_DELETED.eq(false);
//! assert_eq!(p.to_sql(), "(id = 7) AND (is_deleted = false)");
//! assert_eq!(Exhibits::OPENED.eq(None::<chrono::NaiveDate>).to_sql(), "opened IS NULL");
//! assert_eq!(Exhibits::OPENED.is_not_null().to_sql(), "opened IS NOT NULL");
//! ```
//!
//! A literal of another type does not compile:
//!
//! ```compile_fail
//! # mod exhibits {
//! #     pgschema::table! {
//! #         pub struct Exhibits("exhibits"): Identity {
//! #             IS_DELETED: IsDeleted => "is_deleted": bool,
//! #         }
//! #     }
//! # }
//! # use exhibits::Exhibits;
//! let p = Exhibits::ID.eq("7");
//! ```
//!
//! Neither does a null comparison on a required column:
//!
//! ```compile_fail
//! # mod exhibits {
//! #     pgschema::table! {
//! #         pub struct Exhibits("exhibits"): Identity {
//! #             IS_DELETED: IsDeleted => "is_deleted": bool,
//! #         }
//! #     }
//! # }
//! # use exhibits::Exhibits;
//! let p = Exhibits::IS_DELETED.is_null();
//! ```
//!
//! ```compile_fail
//! # mod exhibits {
//! #     pgschema::table! {
//! #         pub struct Exhibits("exhibits"): Identity {
//! #             IS_DELETED: IsDeleted => "is_deleted": bool,
//! #         }
//! #     }
//! # }
//! # use exhibits::Exhibits;
//! let p = Exhibits::IS_DELETED.eq(None::<bool>);
//! ```

use crate::predicate::{CompareOp, Predicate};
use crate::schema::Table;
use crate::value::{Nullable, SqlType, Value};
use std::fmt;
use std::marker::PhantomData;

/// A named, strongly typed value holder bound to one table.
///
/// Implementations are generated by [`table!`](crate::table); each is a newtype over its value,
/// so two fields compare structurally.
pub trait Field: Clone + fmt::Debug + PartialEq + Send + Sync + Sized + 'static {
    /// The table this field belongs to.
    type Table: Table;
    /// The Rust type of the value.
    type Value: SqlType;
    /// Persisted column name.
    const NAME: &'static str;

    fn new(value: Self::Value) -> Self;

    fn value(&self) -> &Self::Value;

    fn into_value(self) -> Self::Value;

    /// The value as an untyped cell.
    fn to_cell(&self) -> Value {
        self.value().to_value()
    }
}

/// Zero-sized handle for a field type, used to build predicates and assignments.
pub struct Column<F>(PhantomData<fn() -> F>);

impl<F> Column<F> {
    pub const fn new() -> Self {
        Column(PhantomData)
    }
}

impl<F> Default for Column<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Clone for Column<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for Column<F> {}

impl<F: Field> fmt::Debug for Column<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Column({}.{})", <F::Table as Table>::NAME, F::NAME)
    }
}

impl<F: Field> Column<F> {
    /// Persisted column name.
    pub const fn name(self) -> &'static str {
        F::NAME
    }

    fn compare(self, op: CompareOp, value: F::Value) -> Predicate<F::Table> {
        Predicate::compare(F::NAME, op, value.to_value())
    }

    /// `column = value`; on an optional column `None` renders `IS NULL`.
    pub fn eq(self, value: impl Into<F::Value>) -> Predicate<F::Table> {
        self.compare(CompareOp::Eq, value.into())
    }

    /// `column != value`; on an optional column `None` renders `IS NOT NULL`.
    pub fn ne(self, value: impl Into<F::Value>) -> Predicate<F::Table> {
        self.compare(CompareOp::Ne, value.into())
    }

    /// `column < value`
    pub fn lt(self, value: impl Into<F::Value>) -> Predicate<F::Table> {
        self.compare(CompareOp::Lt, value.into())
    }

    /// `column > value`
    pub fn gt(self, value: impl Into<F::Value>) -> Predicate<F::Table> {
        self.compare(CompareOp::Gt, value.into())
    }

    /// `column <= value`
    pub fn le(self, value: impl Into<F::Value>) -> Predicate<F::Table> {
        self.compare(CompareOp::Le, value.into())
    }

    /// `column >= value`
    pub fn ge(self, value: impl Into<F::Value>) -> Predicate<F::Table> {
        self.compare(CompareOp::Ge, value.into())
    }

    /// Wrap a value in this column's field type.
    pub fn field(self, value: impl Into<F::Value>) -> F {
        F::new(value.into())
    }
}

impl<F: Field> Column<F>
where
    F::Value: Nullable,
{
    /// `column IS NULL`
    pub fn is_null(self) -> Predicate<F::Table> {
        Predicate::compare(F::NAME, CompareOp::Eq, Value::Null)
    }

    /// `column IS NOT NULL`
    pub fn is_not_null(self) -> Predicate<F::Table> {
        Predicate::compare(F::NAME, CompareOp::Ne, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    mod frames {
        crate::table! {
            pub struct Frames("frames"): Bare {
                LABEL: Label => "label": String,
                FLOOR: Floor => "floor": Option<i32>,
                WIDTH: Width => "width": i32,
            }
        }
    }

    use frames::{Floor, Frames, Label};

    #[test]
    fn comparisons_render_each_operator() {
        assert_eq!(Frames::WIDTH.eq(3).to_sql(), "width = 3");
        assert_eq!(Frames::WIDTH.ne(3).to_sql(), "width != 3");
        assert_eq!(Frames::WIDTH.lt(3).to_sql(), "width < 3");
        assert_eq!(Frames::WIDTH.gt(3).to_sql(), "width > 3");
        assert_eq!(Frames::WIDTH.le(3).to_sql(), "width <= 3");
        assert_eq!(Frames::WIDTH.ge(3).to_sql(), "width >= 3");
    }

    #[test]
    fn text_comparison_takes_str() {
        assert_eq!(Frames::LABEL.eq("it's").to_sql(), "label = 'it''s'");
    }

    #[test]
    fn optional_column_accepts_value_and_null() {
        assert_eq!(Frames::FLOOR.eq(2).to_sql(), "floor = 2");
        assert_eq!(Frames::FLOOR.eq(None::<i32>).to_sql(), "floor IS NULL");
        assert_eq!(Frames::FLOOR.ne(None::<i32>).to_sql(), "floor IS NOT NULL");
        assert_eq!(Frames::FLOOR.is_null().to_sql(), "floor IS NULL");
        assert_eq!(Frames::FLOOR.is_not_null().to_sql(), "floor IS NOT NULL");
    }

    #[test]
    fn present_value_never_renders_equals_null() {
        let sql = Frames::FLOOR.eq(Some(0)).to_sql();
        assert_eq!(sql, "floor = 0");
        assert!(!sql.contains("NULL"));
    }

    #[test]
    fn fields_compare_structurally() {
        assert_eq!(Label("a".into()), Label("a".into()));
        assert_ne!(Label("a".into()), Label("b".into()));
        assert!(Floor(Some(1)) < Floor(Some(2)));
        assert_eq!(Frames::FLOOR.field(4), Floor(Some(4)));
    }

    #[test]
    fn column_debug_names_table_and_column() {
        assert_eq!(format!("{:?}", Frames::LABEL), "Column(frames.label)");
        assert_eq!(Frames::LABEL.name(), "label");
    }
}
