//! Chainable per-table queries.
//!
//! A [`Relation`] accumulates filters, orders, a limit and an offset, and
//! runs them through one of its terminal operations. Chaining consumes the
//! relation and hands back a new one; branching from a shared base is an
//! explicit `.clone()`:
//!
//! ```ignore
//! let base = User::relation().filter("last_name = ?", args!["Lovelace"]);
//! let adas = base.clone().filter("first_name = ?", args!["Ada"]);
//! let everyone = base.order("id DESC").all(&client).await?;
//! ```
//!
//! Shorthand strings are parsed while chaining. The first parse failure is
//! kept in the relation and returned by the next terminal, before anything
//! is sent to the database.

use crate::client::Database;
use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::monitor::truncate_sql;
use crate::record::Record;
use crate::rel::{
    DeleteStatement, Expr, SelectStatement, Statement, UpdateStatement, parse_assignment,
    parse_order, parse_where,
};
use crate::row::ValueRow;
use crate::value::{Arg, FromValue, Value};
use std::fmt;
use std::marker::PhantomData;

/// Longest SQL text written to the `relorm.sql` statement log. Timing events
/// from [`InstrumentedDb`](crate::monitor::InstrumentedDb) use their own limit.
const LOGGED_SQL_LENGTH: usize = 200;

/// A parse failure recorded while chaining.
#[derive(Clone, Debug)]
struct Deferred {
    position: usize,
    message: String,
}

impl Deferred {
    fn from_error(err: OrmError) -> Self {
        match err {
            OrmError::Parse { position, message } => Self { position, message },
            other => Self {
                position: 0,
                message: other.to_string(),
            },
        }
    }

    fn to_error(&self) -> OrmError {
        OrmError::parse(self.position, self.message.clone())
    }
}

/// A query on the table of `M`.
pub struct Relation<M> {
    fields: Option<Vec<String>>,
    wheres: Vec<Expr>,
    orders: Vec<Expr>,
    limit: u64,
    offset: u64,
    error: Option<Deferred>,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for Relation<M> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            wheres: self.wheres.clone(),
            orders: self.orders.clone(),
            limit: self.limit,
            offset: self.offset,
            error: self.error.clone(),
            _model: PhantomData,
        }
    }
}

impl<M: Model> Default for Relation<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> fmt::Debug for Relation<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("table", &M::TABLE)
            .field("fields", &self.fields)
            .field("wheres", &self.wheres)
            .field("orders", &self.orders)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("error", &self.error)
            .finish()
    }
}

impl<M: Model> Relation<M> {
    /// An unfiltered query on the whole table.
    pub fn new() -> Self {
        Self {
            fields: None,
            wheres: Vec::new(),
            orders: Vec::new(),
            limit: 0,
            offset: 0,
            error: None,
            _model: PhantomData,
        }
    }

    fn defer(&mut self, err: OrmError) {
        if self.error.is_none() {
            self.error = Some(Deferred::from_error(err));
        }
    }

    // ==================== chaining ====================

    /// Add `field = ?` / `field IN ?` conditions.
    ///
    /// ```ignore
    /// User::relation().filter("last_name = ?, id IN ?", args!["Hopper", vec![1, 2]])
    /// ```
    pub fn filter(mut self, query: &str, args: Vec<Arg>) -> Self {
        if self.error.is_some() {
            return self;
        }
        match parse_where(query, args) {
            Ok(exprs) => self.wheres.extend(exprs),
            Err(e) => self.defer(e),
        }
        self
    }

    /// Add a prebuilt condition.
    pub fn filter_expr(mut self, expr: Expr) -> Self {
        self.wheres.push(expr);
        self
    }

    /// Add `column = value`.
    pub fn filter_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.wheres.push(Expr::assign(column, value));
        self
    }

    /// Add orderings, e.g. `"last_name, id DESC"`.
    pub fn order(mut self, query: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match parse_order(query) {
            Ok(exprs) => self.orders.extend(exprs),
            Err(e) => self.defer(e),
        }
        self
    }

    /// Add a prebuilt ordering.
    pub fn order_expr(mut self, expr: Expr) -> Self {
        self.orders.push(expr);
        self
    }

    /// Limit the number of rows. Zero means no limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Skip rows. Zero means no offset.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Restrict the selected columns. Repeated calls accumulate.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.fields
            .get_or_insert_with(Vec::new)
            .extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// The deferred parse error, if any link of the chain failed.
    pub fn validate(&self) -> OrmResult<()> {
        match &self.error {
            Some(deferred) => Err(deferred.to_error()),
            None => Ok(()),
        }
    }

    pub fn wheres(&self) -> &[Expr] {
        &self.wheres
    }

    pub fn orders(&self) -> &[Expr] {
        &self.orders
    }

    // ==================== statements ====================

    /// The SELECT this relation runs for `all`.
    pub fn to_select(&self) -> SelectStatement {
        let columns = match &self.fields {
            Some(fields) => fields.iter().map(Expr::field).collect(),
            None => M::FIELDS.iter().map(|f| Expr::field(f.column)).collect(),
        };
        SelectStatement {
            table: M::TABLE.to_string(),
            columns,
            wheres: self.wheres.clone(),
            orders: self.orders.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// Rendered SELECT with `?` placeholders.
    pub fn to_sql(&self) -> OrmResult<(String, Vec<Value>)> {
        self.validate()?;
        Ok(self.to_select().build())
    }

    /// An unsaved record pre-filled from the `column = value` filters.
    ///
    /// Filters of any other shape are skipped.
    pub fn new_record(&self) -> OrmResult<Record<M>> {
        self.validate()?;
        let mut fields = M::default();
        for (column, value) in self.wheres.iter().filter_map(Expr::as_equality) {
            fields.set(column, value.clone())?;
        }
        Ok(Record::new(fields))
    }

    // ==================== terminals ====================

    /// Every matching record.
    pub async fn all<D: Database>(&self, db: &D) -> OrmResult<Vec<Record<M>>> {
        self.validate()?;
        let rows = fetch(db, &self.to_select()).await?;
        rows.iter().map(Record::from_row).collect()
    }

    /// One matching record, or [`OrmError::NotFound`].
    pub async fn take<D: Database>(&self, db: &D) -> OrmResult<Record<M>> {
        self.validate()?;
        let mut stmt = self.to_select();
        stmt.limit = 1;
        let rows = fetch(db, &stmt).await?;
        match rows.first() {
            Some(row) => Record::from_row(row),
            None => Err(OrmError::not_found(format!("no matching row in {}", M::TABLE))),
        }
    }

    /// The matching record with the lowest primary key.
    pub async fn first<D: Database>(&self, db: &D) -> OrmResult<Record<M>> {
        self.clone()
            .order_expr(Expr::asc(M::PRIMARY_KEY))
            .take(db)
            .await
    }

    /// The matching record with the highest primary key.
    pub async fn last<D: Database>(&self, db: &D) -> OrmResult<Record<M>> {
        self.clone()
            .order_expr(Expr::desc(M::PRIMARY_KEY))
            .take(db)
            .await
    }

    /// The matching record with primary key `id`.
    pub async fn find<D: Database>(&self, db: &D, id: impl Into<Value>) -> OrmResult<Record<M>> {
        self.clone().filter_eq(M::PRIMARY_KEY, id).take(db).await
    }

    /// The first record matching the extra conditions.
    pub async fn find_by<D: Database>(
        &self,
        db: &D,
        query: &str,
        args: Vec<Arg>,
    ) -> OrmResult<Record<M>> {
        self.clone().filter(query, args).take(db).await
    }

    /// Number of matching rows. Orders, limit and offset are ignored.
    pub async fn count<D: Database>(&self, db: &D) -> OrmResult<u64> {
        self.validate()?;
        let stmt = SelectStatement {
            table: M::TABLE.to_string(),
            columns: vec![Expr::literal("COUNT(*)")],
            wheres: self.wheres.clone(),
            ..Default::default()
        };
        let rows = fetch(db, &stmt).await?;
        let value = rows
            .first()
            .and_then(|row| row.get_index(0))
            .cloned()
            .ok_or_else(|| OrmError::decode("count", "no row returned"))?;
        let count = i64::from_value(value).map_err(|e| OrmError::decode("count", e))?;
        u64::try_from(count)
            .map_err(|_| OrmError::decode("count", format!("negative count {}", count)))
    }

    /// Whether at least one row matches.
    pub async fn exists<D: Database>(&self, db: &D) -> OrmResult<bool> {
        self.validate()?;
        let stmt = SelectStatement {
            table: M::TABLE.to_string(),
            columns: vec![Expr::literal("1")],
            wheres: self.wheres.clone(),
            limit: 1,
            ..Default::default()
        };
        Ok(!fetch(db, &stmt).await?.is_empty())
    }

    /// Delete every matching row and return how many went.
    ///
    /// Without filters this empties the table.
    pub async fn delete_all<D: Database>(&self, db: &D) -> OrmResult<u64> {
        self.validate()?;
        let stmt = DeleteStatement {
            table: M::TABLE.to_string(),
            wheres: self.wheres.clone(),
        };
        execute(db, &stmt).await
    }

    /// Apply `field = ?` assignments to every matching row.
    pub async fn update_all<D: Database>(
        &self,
        db: &D,
        query: &str,
        args: Vec<Arg>,
    ) -> OrmResult<u64> {
        self.validate()?;
        let stmt = UpdateStatement {
            table: M::TABLE.to_string(),
            values: parse_assignment(query, args)?,
            wheres: self.wheres.clone(),
        };
        execute(db, &stmt).await
    }
}

fn log_statement(stmt: &impl Statement, sql: &str, param_count: usize) {
    tracing::debug!(
        target: "relorm.sql",
        kind = %stmt.kind(),
        param_count,
        sql = %truncate_sql(sql, Some(LOGGED_SQL_LENGTH)),
        "statement"
    );
}

/// Run a row-returning statement on `db`.
pub(crate) async fn fetch<D: Database>(
    db: &D,
    stmt: &impl Statement,
) -> OrmResult<Vec<ValueRow>> {
    let (sql, values) = stmt.build_with(db.placeholder());
    log_statement(stmt, &sql, values.len());
    let result = db.query(&sql, &values).await;
    result.map_err(|e| e.in_statement(sql))
}

/// Run a statement on `db` and return the affected-row count.
pub(crate) async fn execute<D: Database>(db: &D, stmt: &impl Statement) -> OrmResult<u64> {
    let (sql, values) = stmt.build_with(db.placeholder());
    log_statement(stmt, &sql, values.len());
    let result = db.execute(&sql, &values).await;
    result.map_err(|e| e.in_statement(sql))
}
