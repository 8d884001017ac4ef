//! Untyped cells and the typed values that map onto them.
//!
//! [`Value`] is the currency between the typed layer and the outside world: literals are
//! rendered from it, parameters are bound from it, and rows come back as vectors of it.
//! [`SqlType`] is implemented for the Rust types a column may hold and converts between the
//! two without any silent coercion.

use bytes::BytesMut;
use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt;
use thiserror::Error as ThisError;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type, to_sql_checked};

/// Semantic type tag of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Text,
    Boolean,
    Date,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// An untyped cell: a literal going out or a fetched value coming back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    /// The semantic type of this cell, `None` for `NULL`.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(ValueKind::Integer),
            Value::Text(_) => Some(ValueKind::Text),
            Value::Bool(_) => Some(ValueKind::Boolean),
            Value::Date(_) => Some(ValueKind::Date),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Append this value as an SQL literal.
    ///
    /// Text is single-quoted with embedded quotes doubled, booleans use `true`/`false`,
    /// dates are quoted `YYYY-MM-DD` (`YYYY-MM-DD BC` before year 1) and a null renders as the
    /// `NULL` keyword.
    pub fn write_literal(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("NULL"),
            Value::Int(v) => out.push_str(&v.to_string()),
            Value::Text(s) => write_quoted(out, s),
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Date(d) => write_date(out, *d),
        }
    }

    /// Render this value as an SQL literal.
    pub fn to_literal(&self) -> String {
        let mut out = String::new();
        self.write_literal(&mut out);
        out
    }
}

/// Postgres date input: no sign, at least four year digits, an era suffix before year 1.
fn write_date(out: &mut String, date: NaiveDate) {
    // Year 0 is 1 BC.
    let (year, era) = match date.year() {
        y if y > 0 => (y, ""),
        y => (1 - y, " BC"),
    };
    out.push_str(&format!(
        "'{year:04}-{:02}-{:02}{era}'",
        date.month(),
        date.day()
    ));
}

fn write_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Why a cell could not become a typed value.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CellError {
    #[error("expected {expected}, got {found}")]
    Mismatch { expected: ValueKind, found: ValueKind },

    #[error("expected {expected}, got NULL")]
    UnexpectedNull { expected: ValueKind },

    #[error("integer {value} is out of range for the column type")]
    OutOfRange { value: i64 },
}

fn mismatch(value: &Value, expected: ValueKind) -> CellError {
    match value.kind() {
        None => CellError::UnexpectedNull { expected },
        Some(found) => CellError::Mismatch { expected, found },
    }
}

/// A Rust type that a column may hold.
///
/// Implemented for `i32`, `i64`, `String`, `bool`, [`NaiveDate`] and `Option<T>` of those.
pub trait SqlType: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The semantic type tag.
    const KIND: ValueKind;
    /// Whether `NULL` is a legal value.
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, CellError>;
}

/// Marker for types that never hold `NULL`; only these may be wrapped in `Option`.
pub trait NotNull: SqlType {}

/// Marker for optional column types. Gates `IS NULL` comparisons and `SET col = NULL`.
pub trait Nullable: SqlType {}

impl SqlType for i32 {
    const KIND: ValueKind = ValueKind::Integer;

    fn to_value(&self) -> Value {
        Value::Int((*self).into())
    }

    fn from_value(value: Value) -> Result<Self, CellError> {
        match value {
            Value::Int(v) => i32::try_from(v).map_err(|_| CellError::OutOfRange { value: v }),
            other => Err(mismatch(&other, Self::KIND)),
        }
    }
}

impl SqlType for i64 {
    const KIND: ValueKind = ValueKind::Integer;

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Result<Self, CellError> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(mismatch(&other, Self::KIND)),
        }
    }
}

impl SqlType for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, CellError> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch(&other, Self::KIND)),
        }
    }
}

impl SqlType for bool {
    const KIND: ValueKind = ValueKind::Boolean;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, CellError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(&other, Self::KIND)),
        }
    }
}

impl SqlType for NaiveDate {
    const KIND: ValueKind = ValueKind::Date;

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self, CellError> {
        match value {
            Value::Date(v) => Ok(v),
            other => Err(mismatch(&other, Self::KIND)),
        }
    }
}

impl NotNull for i32 {}
impl NotNull for i64 {}
impl NotNull for String {}
impl NotNull for bool {}
impl NotNull for NaiveDate {}

impl<T: NotNull> SqlType for Option<T> {
    const KIND: ValueKind = T::KIND;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: Value) -> Result<Self, CellError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: NotNull> Nullable for Option<T> {}

// ===== tokio-postgres bridges =====

fn bind_mismatch(kind: ValueKind, ty: &Type) -> Box<dyn Error + Sync + Send> {
    format!("cannot bind a {kind} value to a column of type {ty}").into()
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Int(v) => {
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql(ty, out)
                } else if <i64 as ToSql>::accepts(ty) {
                    v.to_sql(ty, out)
                } else {
                    Err(bind_mismatch(ValueKind::Integer, ty))
                }
            }
            Value::Text(v) if <String as ToSql>::accepts(ty) => v.to_sql(ty, out),
            Value::Bool(v) if <bool as ToSql>::accepts(ty) => v.to_sql(ty, out),
            Value::Date(v) if <NaiveDate as ToSql>::accepts(ty) => v.to_sql(ty, out),
            other => Err(bind_mismatch(
                other.kind().unwrap_or(ValueKind::Text),
                ty,
            )),
        }
    }

    fn accepts(ty: &Type) -> bool {
        supported(ty)
    }

    to_sql_checked!();
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        if *ty == Type::INT2 {
            Ok(Value::Int(i16::from_sql(ty, raw)?.into()))
        } else if *ty == Type::INT4 {
            Ok(Value::Int(i32::from_sql(ty, raw)?.into()))
        } else if *ty == Type::INT8 {
            Ok(Value::Int(i64::from_sql(ty, raw)?))
        } else if <bool as FromSql>::accepts(ty) {
            Ok(Value::Bool(bool::from_sql(ty, raw)?))
        } else if <NaiveDate as FromSql>::accepts(ty) {
            Ok(Value::Date(NaiveDate::from_sql(ty, raw)?))
        } else if <String as FromSql>::accepts(ty) {
            Ok(Value::Text(String::from_sql(ty, raw)?))
        } else {
            Err(format!("unsupported column type {ty}").into())
        }
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(Value::Null)
    }

    fn accepts(ty: &Type) -> bool {
        supported(ty)
    }
}

fn supported(ty: &Type) -> bool {
    *ty == Type::INT2
        || *ty == Type::INT4
        || *ty == Type::INT8
        || <String as ToSql>::accepts(ty)
        || <bool as ToSql>::accepts(ty)
        || <NaiveDate as ToSql>::accepts(ty)
}
