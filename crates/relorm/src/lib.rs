//! # relorm
//!
//! Typed active-record relations for PostgreSQL.
//!
//! ## Features
//!
//! - **Statement AST**: SELECT/INSERT/UPDATE/DELETE are plain data rendered to SQL plus
//!   ordered bind values
//! - **Shorthand conditions**: `"last_name = ?, id IN ?"` parsed by a small token scanner
//! - **Chainable relations**: filters, orders, limit and offset, copy-on-chain
//! - **Dirty tracking**: `save` only sends the columns that changed
//! - **No reflection**: `#[derive(Model)]` emits a static column table per struct
//! - **Handle-agnostic**: clients, transactions, pooled clients and wrappers all implement
//!   [`Database`]
//!
//! ## Example
//!
//! ```ignore
//! use relorm::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Model)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     id: i64,
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! let mut ada = User::relation()
//!     .filter("first_name = ?", args!["Ada"])
//!     .new_record()?;
//! ada.last_name = "Lovelace".into();
//! ada.save(&client).await?;
//!
//! let lovelaces = User::relation()
//!     .filter("last_name = ?", args!["Lovelace"])
//!     .order("id DESC")
//!     .limit(10)
//!     .all(&client)
//!     .await?;
//! ```

extern crate self as relorm;

pub mod client;
pub mod error;
pub mod model;
pub mod monitor;
pub mod prelude;
pub mod record;
pub mod rel;
pub mod relation;
pub mod row;
pub mod value;

pub use client::Database;
pub use error::{OrmError, OrmResult};
pub use model::{Field, Model};
pub use monitor::{InstrumentedDb, MonitorConfig};
pub use record::Record;
pub use rel::{Expr, Placeholder, Statement};
pub use relation::Relation;
pub use row::ValueRow;
pub use value::{Arg, FromValue, Value};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "derive")]
pub use relorm_derive::Model;
