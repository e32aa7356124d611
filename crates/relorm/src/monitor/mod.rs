//! Query timeouts and SQL logging.
//!
//! Every statement the relation engine runs is logged at `DEBUG` under the
//! `relorm.sql` tracing target, before it is sent. [`InstrumentedDb`] wraps
//! any handle to add a deadline, slow-query warnings and per-query timings,
//! logged under `relorm.monitor` once the query has finished:
//!
//! ```rust,ignore
//! use relorm::monitor::{InstrumentedDb, MonitorConfig};
//! use std::time::Duration;
//!
//! let config = MonitorConfig::new()
//!     .with_query_timeout(Duration::from_secs(30))
//!     .with_slow_query_threshold(Duration::from_secs(1))
//!     .enable_logging();
//!
//! let db = InstrumentedDb::new(client).with_config(config);
//! ```

mod config;
mod instrumented;

#[cfg(test)]
mod tests;

pub use config::MonitorConfig;
pub use instrumented::InstrumentedDb;

use std::borrow::Cow;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Shorten `sql` for logging, marking the cut with `...`.
pub(crate) fn truncate_sql(sql: &str, max_bytes: Option<usize>) -> Cow<'_, str> {
    match max_bytes {
        Some(max) if sql.len() > max => Cow::Owned(format!("{}...", truncate_sql_bytes(sql, max))),
        _ => Cow::Borrowed(sql),
    }
}
