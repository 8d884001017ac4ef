//! SELECT builder.

use super::{BuildStatement, and_filter, render_where};
use crate::codec::FieldSet;
use crate::error::DbResult;
use crate::field::{Column, Field};
use crate::predicate::Predicate;
use crate::render::{SqlWriter, StatementKind};
use crate::schema::Table;
use crate::value::Value;
use std::marker::PhantomData;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// SELECT builder whose rows decode into `Q`.
pub struct Select<Q: FieldSet> {
    filter: Option<Predicate<Q::Table>>,
    order: Vec<(&'static str, Order)>,
    limit: Option<u64>,
    _fields: PhantomData<fn() -> Q>,
}

impl<Q: FieldSet> Select<Q> {
    /// Project exactly the fields of `Q`.
    pub fn fields() -> Self {
        Self {
            filter: None,
            order: Vec::new(),
            limit: None,
            _fields: PhantomData,
        }
    }

    /// Name the source table. The projection is already bound to it, so this only documents
    /// the statement and rejects a projection from another table at compile time.
    ///
    /// ```
    /// use pgschema::prelude::*;
    /// # mod item {
    /// #     pgschema::table! {
    /// #         pub struct Item("item"): Identity {
    /// #             NAME: Name => "name": String,
    /// #         }
    /// #     }
    /// # }
    /// # use item::Item;
    /// let q = select(Item::NAME).from(Item).filter(Item::ID.eq(3));
    /// assert_eq!(q.to_sql(), "SELECT name FROM item WHERE id = 3");
    /// ```
    ///
    /// ```compile_fail
    /// use pgschema::prelude::*;
    /// # mod item {
    /// #     pgschema::table! {
    /// #         pub struct Item("item"): Identity {
    /// #             NAME: Name => "name": String,
    /// #         }
    /// #     }
    /// # }
    /// # mod tags {
    /// #     pgschema::table! {
    /// #         pub struct Tags("tags"): Identity {
    /// #             LABEL: Label => "label": String,
    /// #         }
    /// #     }
    /// # }
    /// # use item::Item;
    /// # use tags::Tags;
    /// let q = select(Item::NAME).from(Tags);
    /// ```
    pub fn from(self, _table: Q::Table) -> Self {
        self
    }

    /// Add a WHERE predicate. Repeated calls are combined with AND.
    ///
    /// The predicate must be over the projected table:
    ///
    /// ```compile_fail
    /// use pgschema::prelude::*;
    /// # mod item {
    /// #     pgschema::table! {
    /// #         pub struct Item("item"): Identity {
    /// #             NAME: Name => "name": String,
    /// #         }
    /// #     }
    /// # }
    /// # mod tags {
    /// #     pgschema::table! {
    /// #         pub struct Tags("tags"): Identity {
    /// #             LABEL: Label => "label": String,
    /// #         }
    /// #     }
    /// # }
    /// # use item::Item;
    /// # use tags::Tags;
    /// let q = select(Item::NAME).filter(Tags::LABEL.eq("x"));
    /// ```
    pub fn filter(mut self, predicate: Predicate<Q::Table>) -> Self {
        self.filter = and_filter(self.filter.take(), predicate);
        self
    }

    /// Add an ORDER BY term.
    pub fn order_by<F: Field<Table = Q::Table>>(mut self, _column: Column<F>, order: Order) -> Self {
        self.order.push((F::NAME, order));
        self
    }

    /// `ORDER BY column ASC`
    pub fn asc<F: Field<Table = Q::Table>>(self, column: Column<F>) -> Self {
        self.order_by(column, Order::Asc)
    }

    /// `ORDER BY column DESC`
    pub fn desc<F: Field<Table = Q::Table>>(self, column: Column<F>) -> Self {
        self.order_by(column, Order::Desc)
    }

    /// Limit the number of rows. Postgres takes a `bigint`, so `n` is capped at `i64::MAX`.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n.min(i64::MAX as u64));
        self
    }

    /// Decode one fetched row into the projected tuple.
    pub fn decode(&self, cells: Vec<Value>) -> DbResult<Q> {
        Q::decode(cells)
    }
}

impl<Q: FieldSet> BuildStatement for Select<Q> {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn table_name(&self) -> &'static str {
        <Q::Table as Table>::NAME
    }

    fn columns(&self) -> Vec<&'static str> {
        Q::column_names()
    }

    fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    fn render(&self, w: &mut SqlWriter) {
        w.push("SELECT ")
            .push_names(&Q::column_names())
            .push(" FROM ")
            .push(<Q::Table as Table>::NAME);
        render_where(w, self.filter.as_ref());
        if !self.order.is_empty() {
            w.push(" ORDER BY ");
            for (i, (name, order)) in self.order.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.push(name).push(" ").push(order.as_str());
            }
        }
        if let Some(n) = self.limit {
            w.push(" LIMIT ").push(&n.to_string());
        }
    }
}

impl<Q: FieldSet> Clone for Select<Q> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            order: self.order.clone(),
            limit: self.limit,
            _fields: PhantomData,
        }
    }
}

impl<Q: FieldSet> std::fmt::Debug for Select<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Select")
            .field("columns", &Q::column_names())
            .field("filter", &self.filter)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .finish()
    }
}
