//! Statement text accumulation.
//!
//! Every builder renders through a [`SqlWriter`]. The writer decides how a value is
//! emitted: inline as a literal, or as a numbered `$n` placeholder whose value is collected
//! into the ordered parameter list. Placeholder numbers are assigned in the order values are
//! written, so an UPDATE's SET values always precede its WHERE values without any renumbering.

use crate::value::Value;
use std::fmt;
use tokio_postgres::types::ToSql;

/// How values are emitted into statement text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Values are rendered as SQL literals (`'a'`, `5`, `true`, `'2024-01-31'`).
    Inline,
    /// Values become `$1, $2, ...` placeholders and are returned as parameters.
    #[default]
    Numbered,
}

/// Text buffer plus ordered parameters for one statement.
#[derive(Debug, Clone)]
pub struct SqlWriter {
    sql: String,
    params: Vec<Value>,
    mode: RenderMode,
}

impl SqlWriter {
    pub fn new(mode: RenderMode) -> Self {
        Self {
            sql: String::with_capacity(64),
            params: Vec::new(),
            mode,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Append raw statement text.
    pub fn push(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    /// Append a value. `NULL` is always written inline as the keyword.
    pub fn push_value(&mut self, value: &Value) -> &mut Self {
        if self.mode == RenderMode::Inline || value.is_null() {
            value.write_literal(&mut self.sql);
        } else {
            self.params.push(value.clone());
            self.sql.push('$');
            self.sql.push_str(&self.params.len().to_string());
        }
        self
    }

    /// Append a comma separated list of column names.
    pub fn push_names(&mut self, names: &[&str]) -> &mut Self {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.sql.push_str(name);
        }
        self
    }

    /// Append a comma separated list of values.
    pub fn push_values(&mut self, values: &[Value]) -> &mut Self {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            self.push_value(value);
        }
        self
    }

    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// The four statement verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn verb(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }

    /// Whether the statement yields rows (as opposed to an affected-row count).
    pub fn returns_rows(self) -> bool {
        matches!(self, StatementKind::Select)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A fully rendered statement, ready to hand to an executor.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub table: &'static str,
    /// Projected columns (SELECT), written columns (INSERT/UPDATE), empty for DELETE.
    pub columns: Vec<&'static str>,
    /// Whether a WHERE clause was rendered.
    pub filtered: bool,
    /// Whether an INSERT asks for the assigned identity back.
    pub returning: bool,
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// Parameters as references compatible with tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    /// Whether the statement is an UPDATE or DELETE that touches every row.
    pub fn is_unfiltered_mutation(&self) -> bool {
        matches!(self.kind, StatementKind::Update | StatementKind::Delete) && !self.filtered
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
