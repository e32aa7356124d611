//! Per-table model metadata.
//!
//! A model is the plain field struct of a table. Instead of looking fields up
//! by name at run time, each model carries a static table of
//! [`Field`] accessors, normally generated by `#[derive(Model)]`:
//!
//! ```ignore
//! use relorm::Model;
//!
//! #[derive(Debug, Clone, Default, Model)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     id: i64,
//!     first_name: String,
//!     last_name: String,
//! }
//! ```

use crate::error::{OrmError, OrmResult};
use crate::relation::Relation;
use crate::row::ValueRow;
use crate::value::Value;

/// Typed accessor/mutator pair for one column.
pub struct Field<M> {
    pub column: &'static str,
    pub get: fn(&M) -> Value,
    pub set: fn(&mut M, Value) -> OrmResult<()>,
}

impl<M> std::fmt::Debug for Field<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("column", &self.column).finish()
    }
}

/// A table-backed struct.
pub trait Model: Clone + Default + Send + Sync + 'static {
    /// Table name.
    const TABLE: &'static str;

    /// Identity column. Excluded from INSERTs while it holds its zero value.
    const PRIMARY_KEY: &'static str;

    /// Every column, in declaration order.
    const FIELDS: &'static [Field<Self>];

    /// Column names in declaration order.
    fn columns() -> Vec<&'static str> {
        Self::FIELDS.iter().map(|f| f.column).collect()
    }

    /// Accessor for a column.
    fn field(column: &str) -> Option<&'static Field<Self>> {
        Self::FIELDS.iter().find(|f| f.column == column)
    }

    /// Current value of a column.
    fn get(&self, column: &str) -> Option<Value> {
        Self::field(column).map(|f| (f.get)(self))
    }

    /// Assign a column from a value.
    fn set(&mut self, column: &str, value: Value) -> OrmResult<()> {
        let field = Self::field(column).ok_or_else(|| {
            OrmError::decode(column, format!("unknown column for table {}", Self::TABLE))
        })?;
        (field.set)(self, value)
    }

    /// Current primary key value.
    fn primary_key_value(&self) -> Value {
        self.get(Self::PRIMARY_KEY).unwrap_or(Value::Null)
    }

    /// Build a model from a row. Columns absent from the row keep their default.
    fn from_row(row: &ValueRow) -> OrmResult<Self> {
        let mut model = Self::default();
        for (column, value) in row.iter() {
            model.set(column, value.clone())?;
        }
        Ok(model)
    }

    /// Start a query on this table.
    fn relation() -> Relation<Self> {
        Relation::new()
    }
}
