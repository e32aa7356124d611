//! Relation chaining and terminal operations against a scripted handle.

mod common;

use common::{MockDb, Post, User, post_row, user_row};
use relorm::rel::{Expr, Placeholder, Statement};
use relorm::{Model, OrmError, Relation, Value, args};

#[test]
fn test_default_select_lists_every_column() {
    let (sql, values) = User::relation().to_sql().unwrap();
    assert_eq!(sql, "SELECT id, first_name, last_name FROM users");
    assert!(values.is_empty());

    // renamed columns use the column name
    let (sql, _) = Post::relation().to_sql().unwrap();
    assert_eq!(sql, "SELECT id, user_id, content FROM posts");
}

#[test]
fn test_chain_accumulates_in_order() {
    let rel = User::relation()
        .filter("last_name = ?", args!["Lovelace"])
        .filter("id IN ?", args![vec![1, 2, 3]])
        .order("first_name, id DESC")
        .limit(10)
        .offset(20)
        .select(&["id", "first_name"]);

    let (sql, values) = rel.to_sql().unwrap();
    assert_eq!(
        sql,
        "SELECT id, first_name FROM users WHERE last_name = ? AND id IN (?, ?, ?) \
         ORDER BY first_name ASC, id DESC LIMIT 10 OFFSET 20"
    );
    assert_eq!(
        values,
        vec![
            Value::from("Lovelace"),
            Value::Int(1),
            Value::Int(2),
            Value::Int(3)
        ]
    );
}

#[test]
fn test_branching_from_a_clone_leaves_the_base_alone() {
    let base = User::relation().filter("last_name = ?", args!["Hopper"]);
    let before = base.to_sql().unwrap();

    let narrowed = base.clone().filter("first_name = ?", args!["Grace"]).limit(1);
    let ordered = base.clone().order("id DESC");

    assert_eq!(base.to_sql().unwrap(), before);
    assert_eq!(narrowed.wheres().len(), 2);
    assert_eq!(ordered.wheres().len(), 1);
    assert_eq!(ordered.orders(), &[Expr::desc("id")]);
}

#[test]
fn test_prebuilt_expressions() {
    let rel = User::relation()
        .filter_expr(Expr::literal_with("length(first_name) > ?", vec![Value::Int(3)]))
        .filter_eq("last_name", "Turing")
        .order_expr(Expr::asc("id"));

    let (sql, values) = rel.to_select().build_with(Placeholder::Dollar);
    assert_eq!(
        sql,
        "SELECT id, first_name, last_name FROM users \
         WHERE length(first_name) > $1 AND last_name = $2 ORDER BY id ASC"
    );
    assert_eq!(values, vec![Value::Int(3), Value::from("Turing")]);
}

#[tokio::test]
async fn test_parse_error_is_deferred_to_the_terminal() {
    let db = MockDb::new();
    let rel = User::relation()
        .filter("first_name = ? junk", args!["Ada"])
        // later links don't replace the first failure
        .order("id SIDEWAYS");

    assert!(rel.validate().unwrap_err().is_parse());
    assert!(rel.to_sql().is_err());

    let err = rel.all(&db).await.unwrap_err();
    assert!(matches!(err, OrmError::Parse { position: 15, .. }));
    assert!(rel.count(&db).await.unwrap_err().is_parse());
    assert!(rel.delete_all(&db).await.unwrap_err().is_parse());
    assert!(rel.new_record().is_err());

    // nothing reached the database
    assert!(db.statements().is_empty());
}

#[tokio::test]
async fn test_all_loads_persisted_records() {
    let db = MockDb::new();
    db.rows(vec![user_row(1, "Ada", "Lovelace"), user_row(2, "Alan", "Turing")]);

    let users = User::relation().order("id").all(&db).await.unwrap();

    assert_eq!(
        db.sql(),
        vec!["SELECT id, first_name, last_name FROM users ORDER BY id ASC"]
    );
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].first_name, "Alan");
    assert!(users.iter().all(|u| u.is_persisted() && !u.is_deleted()));
    assert!(users.iter().all(|u| u.changed_columns().is_empty()));
}

#[tokio::test]
async fn test_take_not_found() {
    let db = MockDb::new();
    let err = User::relation()
        .filter("last_name = ?", args!["Nobody"])
        .take(&db)
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let (sql, values) = db.last();
    assert_eq!(
        sql,
        "SELECT id, first_name, last_name FROM users WHERE last_name = ? LIMIT 1"
    );
    assert_eq!(values, vec![Value::from("Nobody")]);
}

#[tokio::test]
async fn test_first_last_find() {
    let db = MockDb::new();
    db.rows(vec![user_row(1, "Ada", "Lovelace")])
        .rows(vec![user_row(9, "Grace", "Hopper")])
        .rows(vec![user_row(5, "Edsger", "Dijkstra")])
        .rows(vec![user_row(6, "Barbara", "Liskov")]);

    let rel = User::relation();
    assert_eq!(rel.first(&db).await.unwrap().id, 1);
    assert_eq!(rel.last(&db).await.unwrap().id, 9);
    assert_eq!(rel.find(&db, 5i64).await.unwrap().last_name, "Dijkstra");
    let barbara = rel
        .find_by(&db, "first_name = ?", args!["Barbara"])
        .await
        .unwrap();
    assert_eq!(barbara.id, 6);

    let sql = db.sql();
    assert_eq!(
        sql[0],
        "SELECT id, first_name, last_name FROM users ORDER BY id ASC LIMIT 1"
    );
    assert_eq!(
        sql[1],
        "SELECT id, first_name, last_name FROM users ORDER BY id DESC LIMIT 1"
    );
    assert_eq!(
        sql[2],
        "SELECT id, first_name, last_name FROM users WHERE id = ? LIMIT 1"
    );
    assert_eq!(
        sql[3],
        "SELECT id, first_name, last_name FROM users WHERE first_name = ? LIMIT 1"
    );

    // the base relation was not touched by the terminals
    assert_eq!(
        rel.to_sql().unwrap().0,
        "SELECT id, first_name, last_name FROM users"
    );
}

#[tokio::test]
async fn test_count_ignores_order_limit_offset() {
    let db = MockDb::new();
    db.rows(vec![relorm::ValueRow::from_pairs([("count", Value::Int(42))])]);

    let n = User::relation()
        .filter("last_name = ?", args!["Smith"])
        .order("id DESC")
        .limit(5)
        .offset(10)
        .count(&db)
        .await
        .unwrap();

    assert_eq!(n, 42);
    assert_eq!(
        db.last(),
        (
            "SELECT COUNT(*) FROM users WHERE last_name = ?".to_string(),
            vec![Value::from("Smith")]
        )
    );
}

#[tokio::test]
async fn test_exists() {
    let db = MockDb::new();
    db.rows(vec![relorm::ValueRow::from_pairs([("?column?", Value::Int(1))])]);

    let rel = User::relation().filter("id = ?", args![3]);
    assert!(rel.exists(&db).await.unwrap());
    assert!(!rel.exists(&db).await.unwrap());
    assert_eq!(db.last().0, "SELECT 1 FROM users WHERE id = ? LIMIT 1");
}

#[tokio::test]
async fn test_delete_all_without_filters_deletes_everything() {
    let db = MockDb::new();
    db.affected(7);

    let n = Relation::<User>::new().delete_all(&db).await.unwrap();
    assert_eq!(n, 7);
    assert_eq!(db.last(), ("DELETE FROM users".to_string(), vec![]));
}

#[tokio::test]
async fn test_delete_all_scoped() {
    let db = MockDb::new();
    db.affected(2);

    let n = Post::relation()
        .filter("user_id = ?", args![4])
        .delete_all(&db)
        .await
        .unwrap();
    assert_eq!(n, 2);
    assert_eq!(
        db.last(),
        (
            "DELETE FROM posts WHERE user_id = ?".to_string(),
            vec![Value::Int(4)]
        )
    );
}

#[tokio::test]
async fn test_update_all() {
    let db = MockDb::new();
    db.affected(3);

    let n = User::relation()
        .filter("last_name IN ?", args![vec!["Smyth", "Smithe"]])
        .update_all(&db, "last_name = ?", args!["Smith"])
        .await
        .unwrap();

    assert_eq!(n, 3);
    assert_eq!(
        db.last(),
        (
            "UPDATE users SET last_name = ? WHERE last_name IN (?, ?)".to_string(),
            vec![
                Value::from("Smith"),
                Value::from("Smyth"),
                Value::from("Smithe")
            ]
        )
    );

    // no assignments is a parse error, and nothing is sent
    let sent = db.statements().len();
    let err = User::relation()
        .update_all(&db, "", args![])
        .await
        .unwrap_err();
    assert!(err.is_parse());
    assert_eq!(db.statements().len(), sent);
}

#[test]
fn test_new_record_projects_equalities() {
    let post = Post::relation()
        .filter("user_id = ?", args![5])
        .filter("id IN ?", args![vec![1, 2]])
        .filter_expr(Expr::literal("content <> ''"))
        .new_record()
        .unwrap();

    assert_eq!(post.user_id, 5);
    assert_eq!(post.id, 0);
    assert!(!post.is_persisted());
}

#[test]
fn test_new_record_rejects_bad_projection() {
    let err = User::relation()
        .filter("nickname = ?", args!["x"])
        .new_record()
        .unwrap_err();
    assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "nickname"));

    let err = User::relation()
        .filter("first_name = ?", args![12])
        .new_record()
        .unwrap_err();
    assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "first_name"));
}

#[tokio::test]
async fn test_storage_errors_carry_the_sql() {
    let db = MockDb::new();
    db.fail("connection reset");

    let err = User::relation()
        .filter("id = ?", args![1])
        .all(&db)
        .await
        .unwrap_err();

    assert_eq!(
        err.sql(),
        Some("SELECT id, first_name, last_name FROM users WHERE id = ?")
    );
    assert!(matches!(err.kind(), OrmError::Other(m) if m == "connection reset"));
}

#[test]
fn test_model_metadata() {
    assert_eq!(User::TABLE, "users");
    assert_eq!(Post::PRIMARY_KEY, "id");
    assert_eq!(Post::columns(), vec!["id", "user_id", "content"]);
    assert!(Post::field("body").is_none());

    let mut post = Post::default();
    post.set("content", Value::from("hello")).unwrap();
    assert_eq!(post.body, "hello");
    assert_eq!(post.get("content"), Some(Value::from("hello")));
    assert!(post.set("user_id", Value::Null).is_err());
}

#[derive(Debug, Clone, Default, PartialEq, Model)]
#[orm(table = "events")]
struct Event {
    #[orm(id)]
    id: i64,
    r#type: String,
}

#[test]
fn test_raw_identifiers_map_to_plain_columns() {
    assert_eq!(Event::columns(), vec!["id", "type"]);

    let (sql, values) = Event::relation()
        .filter("type = ?", args!["signup"])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT id, type FROM events WHERE type = ?");
    assert_eq!(values, vec![Value::from("signup")]);

    let mut event = Event::default();
    event.set("type", Value::from("login")).unwrap();
    assert_eq!(event.r#type, "login");
}

#[tokio::test]
async fn test_from_row_maps_renamed_columns() {
    let db = MockDb::new();
    db.rows(vec![post_row(3, 1, "first!")]);

    let post = Post::relation().take(&db).await.unwrap();
    assert_eq!(post.body, "first!");
    assert_eq!(post.user_id, 1);
}
