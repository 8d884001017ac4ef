//! WHERE clause expression trees.
//!
//! A [`Predicate`] is a binary tree of column comparisons joined by AND / OR. It is typed by
//! the table its columns belong to, so a predicate over one table cannot filter a statement on
//! another.
//!
//! Rendering is deliberately uniform: a leaf renders as `name OP literal`, and every composite
//! node renders as `(left) AND (right)` or `(left) OR (right)` regardless of what its operands
//! contain. No simplification is performed.

use crate::render::{RenderMode, SqlWriter};
use crate::value::Value;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr};

/// Comparison operator of a predicate leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Compare {
        column: &'static str,
        op: CompareOp,
        value: Value,
    },
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
}

impl Node {
    fn render(&self, w: &mut SqlWriter) {
        match self {
            Node::Compare { column, op, value } => {
                w.push(column);
                match (op, value.is_null()) {
                    (CompareOp::Eq, true) => {
                        w.push(" IS NULL");
                    }
                    (CompareOp::Ne, true) => {
                        w.push(" IS NOT NULL");
                    }
                    _ => {
                        w.push(" ").push(op.as_str()).push(" ").push_value(value);
                    }
                }
            }
            Node::And(left, right) => Self::render_pair(w, left, "AND", right),
            Node::Or(left, right) => Self::render_pair(w, left, "OR", right),
        }
    }

    fn render_pair(w: &mut SqlWriter, left: &Node, keyword: &str, right: &Node) {
        w.push("(");
        left.render(w);
        w.push(") ").push(keyword).push(" (");
        right.render(w);
        w.push(")");
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Compare { .. } => 1,
            Node::And(l, r) | Node::Or(l, r) => l.leaf_count() + r.leaf_count(),
        }
    }
}

/// A boolean expression over the columns of table `T`.
pub struct Predicate<T> {
    node: Node,
    _table: PhantomData<fn() -> T>,
}

impl<T> Predicate<T> {
    fn from_node(node: Node) -> Self {
        Self {
            node,
            _table: PhantomData,
        }
    }

    /// A leaf comparison. Columns build these; see [`Column`](crate::Column).
    pub(crate) fn compare(column: &'static str, op: CompareOp, value: Value) -> Self {
        Self::from_node(Node::Compare { column, op, value })
    }

    /// `(self) AND (other)`
    pub fn and(self, other: Self) -> Self {
        Self::from_node(Node::And(Box::new(self.node), Box::new(other.node)))
    }

    /// `(self) OR (other)`
    pub fn or(self, other: Self) -> Self {
        Self::from_node(Node::Or(Box::new(self.node), Box::new(other.node)))
    }

    /// Number of comparisons in the tree.
    pub fn len(&self) -> usize {
        self.node.leaf_count()
    }

    /// A predicate always holds at least one comparison.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub(crate) fn render(&self, w: &mut SqlWriter) {
        self.node.render(w);
    }

    /// Render with inline literals.
    pub fn to_sql(&self) -> String {
        let mut w = SqlWriter::new(RenderMode::Inline);
        self.render(&mut w);
        w.finish().0
    }
}

/// `(left) AND (right)`
pub fn and<T>(left: Predicate<T>, right: Predicate<T>) -> Predicate<T> {
    left.and(right)
}

/// `(left) OR (right)`
pub fn or<T>(left: Predicate<T>, right: Predicate<T>) -> Predicate<T> {
    left.or(right)
}

impl<T> BitAnd for Predicate<T> {
    type Output = Predicate<T>;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl<T> BitOr for Predicate<T> {
    type Output = Predicate<T>;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<T> PartialEq for Predicate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.to_sql()).finish()
    }
}

impl<T> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
