//! SQL expression AST and statement builders.
//!
//! Statements are plain data: fill in the fields, call [`Statement::build`],
//! and get back the SQL text plus the bind values in placeholder order.
//! Building never fails and never has side effects.
//!
//! ```ignore
//! use relorm::rel::{Expr, SelectStatement, Statement};
//!
//! let stmt = SelectStatement {
//!     table: "users".into(),
//!     columns: vec![Expr::field("id"), Expr::field("first_name")],
//!     wheres: vec![Expr::assign("id", 5)],
//!     limit: 1,
//!     ..Default::default()
//! };
//! let (sql, values) = stmt.build();
//! assert_eq!(sql, "SELECT id, first_name FROM users WHERE id = ? LIMIT 1");
//! ```

mod delete;
mod expr;
mod insert;
mod parse;
mod select;
mod update;

pub use delete::DeleteStatement;
pub use expr::{Collector, Expr, Placeholder};
pub use insert::InsertStatement;
pub use parse::{parse_assignment, parse_order, parse_where};
pub use select::SelectStatement;
pub use update::UpdateStatement;

use crate::value::Value;

/// Statement type, used for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// Detect the statement kind from its leading keyword.
    pub fn from_sql(sql: &str) -> Option<Self> {
        let keyword = sql.trim_start().split(|c: char| !c.is_ascii_alphabetic()).next()?;
        [
            StatementKind::Select,
            StatementKind::Insert,
            StatementKind::Update,
            StatementKind::Delete,
        ]
        .into_iter()
        .find(|kind| keyword.eq_ignore_ascii_case(&kind.to_string()))
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A complete SQL statement.
pub trait Statement {
    fn kind(&self) -> StatementKind;

    /// Append the statement to a collector.
    fn write_to(&self, c: &mut Collector);

    /// Render with `?` placeholders.
    fn build(&self) -> (String, Vec<Value>) {
        self.build_with(Placeholder::Question)
    }

    /// Render with the given placeholder style.
    fn build_with(&self, style: Placeholder) -> (String, Vec<Value>) {
        let mut c = Collector::new(style);
        self.write_to(&mut c);
        c.finish()
    }
}
