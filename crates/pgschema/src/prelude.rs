//! Convenient imports for typical `pgschema` usage.
//!
//! ```ignore
//! use pgschema::prelude::*;
//! ```

pub use crate::{
    BuildStatement, Column, DbError, DbResult, Executor, Field, FieldSet, Order, Predicate,
    RenderMode, Session, SessionConfig, Statement, Table, Value, and, delete, insert, or, select,
    update,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
