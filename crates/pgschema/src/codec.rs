//! Row codec: ordered field tuples to and from untyped cells.
//!
//! A [`FieldSet`] is a tuple of fields of one table. Its order is the order of the column list
//! it was built from, so reordering columns changes the tuple shape. Encoding produces the
//! VALUES / SET values of an insert or update; decoding turns one fetched row into the tuple,
//! failing on an arity or type disagreement rather than coercing.

use crate::error::{DbError, DbResult};
use crate::field::{Column, Field};
use crate::schema::Table;
use crate::value::{SqlType, Value};
use std::fmt;

/// An ordered tuple of fields belonging to one table.
///
/// Implemented for tuples of 1 to 12 fields, the widest tuples std gives `Clone`, `Debug` and
/// `PartialEq`.
pub trait FieldSet: Clone + fmt::Debug + PartialEq + Send + Sync + Sized + 'static {
    type Table: Table;

    /// Number of fields in the tuple.
    const ARITY: usize;

    /// Persisted column names, in tuple order.
    fn column_names() -> Vec<&'static str>;

    /// Field values as cells, in tuple order.
    fn encode(&self) -> Vec<Value>;

    /// Decode one row by positional correspondence.
    fn decode(cells: Vec<Value>) -> DbResult<Self>;
}

/// A projection: a single column token or a tuple of tokens.
pub trait ColumnSet {
    /// The field tuple one projected row decodes into.
    type Fields: FieldSet;
}

impl<F: Field> ColumnSet for Column<F> {
    type Fields = (F,);
}

fn decode_cell<F: Field>(cells: &mut impl Iterator<Item = Value>, expected: usize) -> DbResult<F> {
    let cell = cells
        .next()
        .ok_or_else(|| DbError::Arity { expected, got: 0 })?;
    F::Value::from_value(cell)
        .map(F::new)
        .map_err(|e| DbError::decode(F::NAME, e.to_string()))
}

macro_rules! impl_field_set {
    ($arity:literal; $first:ident $(, $rest:ident)*; $($idx:tt),+) => {
        impl<$first: Field $(, $rest: Field<Table = $first::Table>)*> FieldSet for ($first, $($rest,)*) {
            type Table = $first::Table;

            const ARITY: usize = $arity;

            fn column_names() -> Vec<&'static str> {
                vec![$first::NAME $(, $rest::NAME)*]
            }

            fn encode(&self) -> Vec<Value> {
                vec![$(self.$idx.to_cell()),+]
            }

            fn decode(cells: Vec<Value>) -> DbResult<Self> {
                if cells.len() != $arity {
                    return Err(DbError::Arity {
                        expected: $arity,
                        got: cells.len(),
                    });
                }
                let mut cells = cells.into_iter();
                Ok((
                    decode_cell::<$first>(&mut cells, $arity)?,
                    $(decode_cell::<$rest>(&mut cells, $arity)?,)*
                ))
            }
        }

        impl<$first: Field $(, $rest: Field<Table = $first::Table>)*> ColumnSet
            for (Column<$first>, $(Column<$rest>,)*)
        {
            type Fields = ($first, $($rest,)*);
        }
    };
}

impl_field_set!(1; A; 0);
impl_field_set!(2; A, B; 0, 1);
impl_field_set!(3; A, B, C; 0, 1, 2);
impl_field_set!(4; A, B, C, D; 0, 1, 2, 3);
impl_field_set!(5; A, B, C, D, E; 0, 1, 2, 3, 4);
impl_field_set!(6; A, B, C, D, E, F; 0, 1, 2, 3, 4, 5);
impl_field_set!(7; A, B, C, D, E, F, G; 0, 1, 2, 3, 4, 5, 6);
impl_field_set!(8; A, B, C, D, E, F, G, H; 0, 1, 2, 3, 4, 5, 6, 7);
impl_field_set!(9; A, B, C, D, E, F, G, H, I; 0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_field_set!(10; A, B, C, D, E, F, G, H, I, J; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_field_set!(11; A, B, C, D, E, F, G, H, I, J, K; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_field_set!(12; A, B, C, D, E, F, G, H, I, J, K, L; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);
