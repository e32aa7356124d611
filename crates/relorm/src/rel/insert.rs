//! INSERT statement.

use super::Statement;
use super::StatementKind;
use super::expr::{Collector, Expr};

/// `INSERT INTO <table> [(<columns>)] VALUES (<values>) [RETURNING <col>]`
///
/// Without columns the values bind positionally. Without values it renders
/// `DEFAULT VALUES`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Expr>,
    /// Column to read back after the insert, e.g. a serial primary key.
    pub returning: Option<String>,
}

impl InsertStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Add a column together with its value.
    pub fn push(&mut self, column: impl Into<String>, value: Expr) {
        self.columns.push(column.into());
        self.values.push(value);
    }
}

impl Statement for InsertStatement {
    fn kind(&self) -> StatementKind {
        StatementKind::Insert
    }

    fn write_to(&self, c: &mut Collector) {
        c.push_str("INSERT INTO ");
        c.push_str(&self.table);

        if self.values.is_empty() {
            c.push_str(" DEFAULT VALUES");
        } else {
            if !self.columns.is_empty() {
                c.push_str(" (");
                c.push_str(&self.columns.join(", "));
                c.push_str(")");
            }
            c.push_str(" VALUES (");
            c.push_list(&self.values, ", ");
            c.push_str(")");
        }

        if let Some(col) = &self.returning {
            c.push_str(" RETURNING ");
            c.push_str(col);
        }
    }
}
