use std::time::Duration;

/// Configuration for [`InstrumentedDb`](super::InstrumentedDb).
///
/// By default there is no timeout, no slow-query threshold and no
/// per-query logging.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Query timeout. `None` means wait forever (default).
    pub query_timeout: Option<Duration>,
    /// Queries slower than this are logged at `WARN`.
    pub slow_query_threshold: Option<Duration>,
    /// Truncate SQL in `relorm.monitor` events to this many bytes. `None`
    /// means never truncate.
    pub max_sql_length: Option<usize>,
    /// Log every finished query at `DEBUG` with its duration.
    pub logging_enabled: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            query_timeout: None,
            slow_query_threshold: None,
            max_sql_length: Some(200),
            logging_enabled: false,
        }
    }
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query timeout.
    ///
    /// A query exceeding it is abandoned and returns
    /// [`OrmError::Timeout`](crate::OrmError::Timeout).
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Set the slow query threshold.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Set maximum SQL length to log.
    pub fn with_max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Log every query with its duration.
    pub fn enable_logging(mut self) -> Self {
        self.logging_enabled = true;
        self
    }

    pub fn disable_logging(mut self) -> Self {
        self.logging_enabled = false;
        self
    }
}
