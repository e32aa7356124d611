use super::*;
use crate::client::Database;
use crate::error::{OrmError, OrmResult};
use crate::rel::{Placeholder, StatementKind};
use crate::row::ValueRow;
use crate::value::Value;
use std::time::Duration;

// ── Shared DummyDb for tests ──

struct DummyDb {
    delay: Duration,
}

impl Database for DummyDb {
    fn placeholder(&self) -> Placeholder {
        Placeholder::Question
    }

    async fn query(&self, _: &str, _: &[Value]) -> OrmResult<Vec<ValueRow>> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![ValueRow::from_pairs([("n", Value::Int(1))])])
    }

    async fn execute(&self, _: &str, _: &[Value]) -> OrmResult<u64> {
        tokio::time::sleep(self.delay).await;
        Ok(3)
    }
}

#[test]
fn test_statement_kind_detection() {
    assert_eq!(
        StatementKind::from_sql("SELECT * FROM users"),
        Some(StatementKind::Select)
    );
    assert_eq!(
        StatementKind::from_sql("  select 1"),
        Some(StatementKind::Select)
    );
    assert_eq!(
        StatementKind::from_sql("INSERT INTO users DEFAULT VALUES"),
        Some(StatementKind::Insert)
    );
    assert_eq!(
        StatementKind::from_sql("UPDATE users SET a = $1"),
        Some(StatementKind::Update)
    );
    assert_eq!(
        StatementKind::from_sql("DELETE FROM users"),
        Some(StatementKind::Delete)
    );
    assert_eq!(StatementKind::from_sql("CREATE TABLE t (id INT)"), None);
}

#[test]
fn test_truncate_sql() {
    assert_eq!(truncate_sql("SELECT * FROM users", Some(10)), "SELECT * F...");
    assert_eq!(truncate_sql("SELECT 1", Some(10)), "SELECT 1");
    assert_eq!(truncate_sql("SELECT * FROM users", None), "SELECT * FROM users");
}

#[test]
fn test_truncate_respects_char_boundaries() {
    // 'é' is two bytes; cutting at byte 2 would split it
    assert_eq!(truncate_sql_bytes("aé", 2), "a");
}

#[test]
fn test_config_builder() {
    let config = MonitorConfig::new()
        .with_query_timeout(Duration::from_secs(5))
        .with_slow_query_threshold(Duration::from_millis(100))
        .with_max_sql_length(50)
        .enable_logging();

    assert_eq!(config.query_timeout, Some(Duration::from_secs(5)));
    assert_eq!(config.slow_query_threshold, Some(Duration::from_millis(100)));
    assert_eq!(config.max_sql_length, Some(50));
    assert!(config.logging_enabled);

    let defaults = MonitorConfig::default();
    assert_eq!(defaults.query_timeout, None);
    assert!(!defaults.logging_enabled);
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let db = InstrumentedDb::new(DummyDb {
        delay: Duration::from_secs(5),
    })
    .with_query_timeout(Duration::from_millis(10));

    let err = db.query("SELECT 1", &[]).await.unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(err, OrmError::Timeout(d) if d == Duration::from_millis(10)));
}

#[tokio::test]
async fn test_passthrough_within_deadline() {
    let db = InstrumentedDb::new(DummyDb {
        delay: Duration::ZERO,
    })
    .with_config(
        MonitorConfig::new()
            .with_query_timeout(Duration::from_secs(5))
            .with_slow_query_threshold(Duration::ZERO)
            .enable_logging(),
    );

    assert_eq!(db.placeholder(), Placeholder::Question);
    assert_eq!(db.execute("DELETE FROM users", &[]).await.unwrap(), 3);

    let row = db.query_one("SELECT 1", &[]).await.unwrap();
    assert_eq!(row.get("n"), Some(&Value::Int(1)));
}
