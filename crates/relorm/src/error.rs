//! Error types for relorm

use thiserror::Error;

/// Result type alias for relorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement building and database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// Shorthand query string could not be parsed, or its arguments don't fit it
    #[error("Parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },

    /// A `take`-family call matched no rows
    #[error("Not found: {0}")]
    NotFound(String),

    /// `save`/`delete` on a record that was already deleted
    #[error("record deleted: {table}")]
    RecordDeleted { table: &'static str },

    /// A storage error, annotated with the SQL that was attempted
    #[error("executing {sql:?}: {source}")]
    Statement {
        sql: String,
        #[source]
        source: Box<OrmError>,
    },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a parse error at a byte offset of the input
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a storage error with the SQL that produced it
    pub fn in_statement(self, sql: impl Into<String>) -> Self {
        match self {
            // never double-wrap
            Self::Statement { .. } => self,
            other => Self::Statement {
                sql: sql.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, looking through a `Statement` wrapper
    pub fn kind(&self) -> &OrmError {
        match self {
            Self::Statement { source, .. } => source.kind(),
            other => other,
        }
    }

    /// The SQL that was being executed, if known
    pub fn sql(&self) -> Option<&str> {
        match self {
            Self::Statement { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// Check if this is a parse error
    pub fn is_parse(&self) -> bool {
        matches!(self.kind(), Self::Parse { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), Self::NotFound(_))
    }

    /// Check if this is a deleted-record error
    pub fn is_record_deleted(&self) -> bool {
        matches!(self.kind(), Self::RecordDeleted { .. })
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self.kind(), Self::UniqueViolation(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind(), Self::Timeout(_))
    }

    /// Parse a tokio_postgres error into a more specific OrmError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
