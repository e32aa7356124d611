//! Driver-independent result rows.

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};
use std::sync::Arc;

/// One result row: column names plus decoded values.
///
/// Rows of one result set share their column list.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueRow {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl ValueRow {
    /// Build a row. `values` must line up with `columns`.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> OrmResult<Self> {
        if columns.len() != values.len() {
            return Err(OrmError::Other(format!(
                "row has {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) =
            pairs.into_iter().map(|(c, v)| (c.into(), v)).unzip();
        Self {
            columns: columns.into(),
            values,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a column by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Value at a column index.
    pub fn get_index(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Typed value of a column by name.
    pub fn try_get<T: FromValue>(&self, column: &str) -> OrmResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| OrmError::decode(column, "no such column in row"))?;
        T::from_value(value.clone()).map_err(|e| OrmError::decode(column, e))
    }

    /// Iterate `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Move the values out, in result order.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Decode a `tokio_postgres::Row`.
    pub fn from_pg(row: &tokio_postgres::Row) -> OrmResult<Self> {
        let columns: Arc<[String]> = row.columns().iter().map(|c| c.name().to_string()).collect();
        Self::from_pg_with_columns(row, columns)
    }

    /// Decode every row of a result set, sharing one column list.
    pub fn from_pg_rows(rows: &[tokio_postgres::Row]) -> OrmResult<Vec<Self>> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let columns: Arc<[String]> = first
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        rows.iter()
            .map(|row| Self::from_pg_with_columns(row, columns.clone()))
            .collect()
    }

    fn from_pg_with_columns(row: &tokio_postgres::Row, columns: Arc<[String]>) -> OrmResult<Self> {
        let values = (0..row.len())
            .map(|i| {
                row.try_get::<_, Value>(i)
                    .map_err(|e| OrmError::decode(columns[i].clone(), e.to_string()))
            })
            .collect::<OrmResult<Vec<_>>>()?;
        Ok(Self { columns, values })
    }
}
