//! UPDATE statement.

use super::Statement;
use super::StatementKind;
use super::expr::{Collector, Expr};

/// `UPDATE <table> SET <assignments> [WHERE ...]`
///
/// An empty `values` list renders an invalid `SET` clause; the record layer
/// never builds one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    pub values: Vec<Expr>,
    pub wheres: Vec<Expr>,
}

impl UpdateStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }
}

impl Statement for UpdateStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Update
    }

    fn write_to(&self, c: &mut Collector) {
        c.push_str("UPDATE ");
        c.push_str(&self.table);
        c.push_str(" SET ");
        c.push_list(&self.values, ", ");

        if !self.wheres.is_empty() {
            c.push_str(" WHERE ");
            c.push_list(&self.wheres, " AND ");
        }
    }
}
