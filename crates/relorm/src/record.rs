//! Records: a model plus its persistence state.

use crate::client::Database;
use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::rel::{DeleteStatement, Expr, InsertStatement, UpdateStatement};
use crate::relation::{Relation, execute, fetch};
use crate::row::ValueRow;
use crate::value::Value;
use std::ops::{Deref, DerefMut};

/// One row of `M`'s table.
///
/// The fields are reachable through `Deref`/`DerefMut`. `old` is the last
/// state known to be stored, and drives the SET list of the next UPDATE.
#[derive(Clone, Debug)]
pub struct Record<M> {
    fields: M,
    old: M,
    persisted: bool,
    deleted: bool,
}

impl<M> Deref for Record<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.fields
    }
}

impl<M> DerefMut for Record<M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut self.fields
    }
}

impl<M: Model> From<M> for Record<M> {
    fn from(fields: M) -> Self {
        Self::new(fields)
    }
}

impl<M: Model> Record<M> {
    /// An unsaved record.
    pub fn new(fields: M) -> Self {
        Self {
            fields,
            old: M::default(),
            persisted: false,
            deleted: false,
        }
    }

    /// A record loaded from storage.
    pub fn from_row(row: &ValueRow) -> OrmResult<Self> {
        let fields = M::from_row(row)?;
        Ok(Self {
            old: fields.clone(),
            fields,
            persisted: true,
            deleted: false,
        })
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Last stored state.
    pub fn old(&self) -> &M {
        &self.old
    }

    pub fn into_inner(self) -> M {
        self.fields
    }

    /// Columns whose value differs from the last stored state.
    pub fn changed_columns(&self) -> Vec<&'static str> {
        M::FIELDS
            .iter()
            .filter(|f| (f.get)(&self.fields) != (f.get)(&self.old))
            .map(|f| f.column)
            .collect()
    }

    fn stored_key(&self) -> Value {
        if self.persisted {
            self.old.primary_key_value()
        } else {
            self.fields.primary_key_value()
        }
    }

    fn ensure_live(&self) -> OrmResult<()> {
        if self.deleted {
            return Err(OrmError::RecordDeleted { table: M::TABLE });
        }
        Ok(())
    }

    /// Insert or update the record.
    ///
    /// An UPDATE only carries the changed columns and sends nothing at all
    /// when there are none. An INSERT omits an unset primary key and reads
    /// the assigned one back.
    pub async fn save<D: Database>(&mut self, db: &D) -> OrmResult<()> {
        self.ensure_live()?;
        if self.persisted {
            self.update(db).await?;
        } else {
            self.insert(db).await?;
        }
        self.persisted = true;
        self.old = self.fields.clone();
        Ok(())
    }

    async fn update<D: Database>(&self, db: &D) -> OrmResult<()> {
        let values: Vec<Expr> = M::FIELDS
            .iter()
            .filter_map(|f| {
                let current = (f.get)(&self.fields);
                (current != (f.get)(&self.old)).then(|| Expr::assign(f.column, current))
            })
            .collect();
        if values.is_empty() {
            return Ok(());
        }

        let stmt = UpdateStatement {
            table: M::TABLE.to_string(),
            values,
            wheres: vec![Expr::assign(M::PRIMARY_KEY, self.old.primary_key_value())],
        };
        execute(db, &stmt).await?;
        Ok(())
    }

    async fn insert<D: Database>(&mut self, db: &D) -> OrmResult<()> {
        let key = self.fields.primary_key_value();
        let key_unset = key.is_null() || key.is_zero();

        let mut stmt = InsertStatement::new(M::TABLE);
        for field in M::FIELDS {
            if key_unset && field.column == M::PRIMARY_KEY {
                continue;
            }
            stmt.push(field.column, Expr::BindParam((field.get)(&self.fields)));
        }

        if !key_unset {
            execute(db, &stmt).await?;
            return Ok(());
        }

        stmt.returning = Some(M::PRIMARY_KEY.to_string());
        let rows = fetch(db, &stmt).await?;
        let id = rows
            .first()
            .and_then(|row| row.get(M::PRIMARY_KEY).or_else(|| row.get_index(0)))
            .cloned()
            .unwrap_or(Value::Null);
        if id.is_null() {
            return Err(OrmError::decode(
                M::PRIMARY_KEY,
                format!("insert into {} returned no identifier", M::TABLE),
            ));
        }
        self.fields.set(M::PRIMARY_KEY, id)
    }

    /// Delete the record's row.
    ///
    /// Deleting twice is an error.
    pub async fn delete<D: Database>(&mut self, db: &D) -> OrmResult<()> {
        self.ensure_live()?;
        let stmt = DeleteStatement {
            table: M::TABLE.to_string(),
            wheres: vec![Expr::assign(M::PRIMARY_KEY, self.stored_key())],
        };
        execute(db, &stmt).await?;
        self.deleted = true;
        Ok(())
    }

    /// Re-read the record from storage, dropping unsaved changes.
    pub async fn reload<D: Database>(&mut self, db: &D) -> OrmResult<()> {
        self.ensure_live()?;
        if !self.persisted {
            return Err(OrmError::validation(format!(
                "cannot reload an unsaved {} record",
                M::TABLE
            )));
        }
        *self = M::relation().find(db, self.old.primary_key_value()).await?;
        Ok(())
    }

    /// Child rows whose `foreign_key` column points at this record.
    ///
    /// ```ignore
    /// let posts = user.has_many::<Post>("user_id").order("id").all(&client).await?;
    /// ```
    pub fn has_many<C: Model>(&self, foreign_key: &str) -> Relation<C> {
        C::relation().filter_eq(foreign_key, self.stored_key())
    }

    /// The parent row this record's `foreign_key` column points at.
    pub async fn belongs_to<P: Model, D: Database>(
        &self,
        db: &D,
        foreign_key: &str,
    ) -> OrmResult<Record<P>> {
        let key = self.fields.get(foreign_key).ok_or_else(|| {
            OrmError::decode(foreign_key, format!("unknown column for table {}", M::TABLE))
        })?;
        P::relation().find(db, key).await
    }
}
