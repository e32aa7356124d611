//! Convenient imports for typical `relorm` usage.
//!
//! ```ignore
//! use relorm::prelude::*;
//! ```

pub use crate::{Arg, Database, Model, OrmError, OrmResult, Record, Relation, Value, args};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
