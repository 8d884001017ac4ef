//! # pgschema
//!
//! Typed table schemas and statement building for Postgres.
//!
//! ## Features
//!
//! - **Compile-time schemas**: `table!` declares a table, one typed field per column, and a
//!   column token per field
//! - **Typed predicates**: comparing a column with a value of the wrong type, or with a column
//!   of another table, fails to compile
//! - **Uniform rendering**: WHERE trees are fully parenthesized; literals follow fixed rules
//! - **Row codec**: rows decode positionally into field tuples, never by coercion
//! - **Transaction-friendly**: a `Session` runs over a client, a transaction or a pooled client
//!
//! ## Example
//!
//! ```ignore
//! use pgschema::prelude::*;
//!
//! mod item {
//!     pgschema::table! {
//!         pub struct Item("item"): IdentityRefCount {
//!             NAME: Name => "name": String,
//!             SCORE: Score => "score": i32,
//!         }
//!     }
//! }
//! use item::{Item, Name, Score};
//!
//! // INSERT INTO item (name, score) VALUES ('a', 5)
//! let q = Item::insert((Name("a".into()), Score(5)));
//!
//! // SELECT name FROM item WHERE (id = 7) AND (score > 3)
//! let s = select(Item::NAME).filter(Item::ID.eq(7) & Item::SCORE.gt(3));
//!
//! // UPDATE item SET score = 10
//! let u = Item::update().set(Item::SCORE, 10);
//!
//! let session = Session::new(&client);
//! let id = session.insert_returning_id(q).await?;
//! let names: Vec<(Name,)> = session.fetch_all(&s).await?;
//! ```

pub mod builder;
pub mod client;
pub mod codec;
pub mod error;
pub mod field;
pub mod predicate;
pub mod render;
pub mod row;
pub mod schema;
pub mod session;
pub mod value;

pub mod prelude;

pub use builder::{
    BuildStatement, Delete, Insert, Order, Select, Update, delete, insert, select, update,
};
pub use client::Executor;
pub use codec::{ColumnSet, FieldSet};
pub use error::{DbError, DbResult};
pub use field::{Column, Field};
pub use predicate::{CompareOp, Predicate, and, or};
pub use render::{RenderMode, SqlWriter, Statement, StatementKind};
pub use row::{RowExt, row_values};
pub use schema::{
    Bare, ColumnDef, ColumnDefault, ColumnRole, Fragment, HasIdentity, HasRefCount, Identity,
    IdentityRefCount, Table,
};
pub use session::{Session, SessionConfig};
pub use value::{CellError, NotNull, Nullable, SqlType, Value, ValueKind};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
