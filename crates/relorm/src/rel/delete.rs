//! DELETE statement.

use super::Statement;
use super::StatementKind;
use super::expr::{Collector, Expr};

/// `DELETE FROM <table> [WHERE ...]`
///
/// With no where-clauses this deletes every row of the table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub wheres: Vec<Expr>,
}

impl DeleteStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            wheres: Vec::new(),
        }
    }
}

impl Statement for DeleteStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Delete
    }

    fn write_to(&self, c: &mut Collector) {
        c.push_str("DELETE FROM ");
        c.push_str(&self.table);

        if !self.wheres.is_empty() {
            c.push_str(" WHERE ");
            c.push_list(&self.wheres, " AND ");
        }
    }
}
