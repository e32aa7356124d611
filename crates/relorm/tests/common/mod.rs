//! Scripted in-memory database handle shared by the integration tests.

#![allow(dead_code)]

use relorm::rel::Placeholder;
use relorm::{Database, Model, OrmError, OrmResult, Value, ValueRow};
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Model)]
#[orm(table = "users")]
pub struct User {
    #[orm(id)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Model)]
#[orm(table = "posts")]
pub struct Post {
    #[orm(id)]
    pub id: i64,
    pub user_id: i64,
    #[orm(column = "content")]
    pub body: String,
}

/// One scripted response, consumed by the next call.
pub enum Reply {
    Rows(Vec<ValueRow>),
    Affected(u64),
    Fail(String),
}

/// Records every statement and answers from a queue of replies.
///
/// An empty queue answers queries with no rows and executes with zero
/// affected rows.
#[derive(Default)]
pub struct MockDb {
    replies: Mutex<VecDeque<Reply>>,
    log: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: Reply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn rows(&self, rows: Vec<ValueRow>) -> &Self {
        self.reply(Reply::Rows(rows))
    }

    pub fn affected(&self, n: u64) -> &Self {
        self.reply(Reply::Affected(n))
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.reply(Reply::Fail(message.to_string()))
    }

    /// Every statement sent so far, in order.
    pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.log.lock().unwrap().clone()
    }

    pub fn sql(&self) -> Vec<String> {
        self.statements().into_iter().map(|(sql, _)| sql).collect()
    }

    pub fn last(&self) -> (String, Vec<Value>) {
        self.statements().pop().expect("no statement was sent")
    }

    fn record(&self, sql: &str, params: &[Value]) -> Option<Reply> {
        self.log
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        self.replies.lock().unwrap().pop_front()
    }
}

impl Database for MockDb {
    fn placeholder(&self) -> Placeholder {
        Placeholder::Question
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<ValueRow>> {
        match self.record(sql, params) {
            Some(Reply::Rows(rows)) => Ok(rows),
            Some(Reply::Affected(_)) | None => Ok(Vec::new()),
            Some(Reply::Fail(message)) => Err(OrmError::Other(message)),
        }
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<u64> {
        match self.record(sql, params) {
            Some(Reply::Affected(n)) => Ok(n),
            Some(Reply::Rows(rows)) => Ok(rows.len() as u64),
            None => Ok(0),
            Some(Reply::Fail(message)) => Err(OrmError::Other(message)),
        }
    }
}

pub fn user_row(id: i64, first_name: &str, last_name: &str) -> ValueRow {
    ValueRow::from_pairs([
        ("id", Value::Int(id)),
        ("first_name", Value::from(first_name)),
        ("last_name", Value::from(last_name)),
    ])
}

pub fn post_row(id: i64, user_id: i64, body: &str) -> ValueRow {
    ValueRow::from_pairs([
        ("id", Value::Int(id)),
        ("user_id", Value::Int(user_id)),
        ("content", Value::from(body)),
    ])
}

pub fn id_row(id: i64) -> ValueRow {
    ValueRow::from_pairs([("id", Value::Int(id))])
}
