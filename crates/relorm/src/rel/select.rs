//! SELECT statement.

use super::Statement;
use super::StatementKind;
use super::expr::{Collector, Expr};

/// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT n] [OFFSET n]`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectStatement {
    pub table: String,
    /// Empty renders `*`.
    pub columns: Vec<Expr>,
    /// ANDed together in insertion order.
    pub wheres: Vec<Expr>,
    pub orders: Vec<Expr>,
    /// 0 = no LIMIT
    pub limit: u64,
    /// 0 = no OFFSET
    pub offset: u64,
}

impl SelectStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }
}

impl Statement for SelectStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Select
    }

    fn write_to(&self, c: &mut Collector) {
        c.push_str("SELECT ");
        if self.columns.is_empty() {
            c.push_str("*");
        } else {
            c.push_list(&self.columns, ", ");
        }

        c.push_str(" FROM ");
        c.push_str(&self.table);

        if !self.wheres.is_empty() {
            c.push_str(" WHERE ");
            c.push_list(&self.wheres, " AND ");
        }

        if !self.orders.is_empty() {
            c.push_str(" ORDER BY ");
            c.push_list(&self.orders, ", ");
        }

        if self.limit != 0 {
            c.push_str(&format!(" LIMIT {}", self.limit));
        }
        if self.offset != 0 {
            c.push_str(&format!(" OFFSET {}", self.offset));
        }
    }
}
