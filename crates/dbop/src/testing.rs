//! In-memory client for unit tests.

use crate::client::GenericClient;
use crate::error::DbopResult;
use crate::row::Scalar;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Reply {
    Rows(Vec<Vec<Scalar>>),
    Affected(u64),
}

/// Records every statement and answers from a queue of canned replies.
#[derive(Default)]
pub(crate) struct RecordingClient {
    replies: Mutex<VecDeque<Reply>>,
    log: Mutex<Vec<(String, String)>>,
}

impl RecordingClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_rows(&self, rows: Vec<Vec<Scalar>>) {
        self.replies.lock().unwrap().push_back(Reply::Rows(rows));
    }

    pub(crate) fn push_affected(&self, rows: u64) {
        self.replies.lock().unwrap().push_back(Reply::Affected(rows));
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.log.lock().unwrap().iter().map(|(_, sql)| sql.clone()).collect()
    }

    pub(crate) fn tags(&self) -> Vec<String> {
        self.log.lock().unwrap().iter().map(|(tag, _)| tag.clone()).collect()
    }

    fn next(&self, tag: &str, sql: &str) -> Reply {
        self.log
            .lock()
            .unwrap()
            .push((tag.to_string(), sql.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no reply queued for: {sql}"))
    }
}

impl GenericClient for RecordingClient {
    type Row = Vec<Scalar>;

    async fn query(&self, sql: &str) -> DbopResult<Vec<Vec<Scalar>>> {
        self.query_tagged("-", sql).await
    }

    async fn query_tagged(&self, tag: &str, sql: &str) -> DbopResult<Vec<Vec<Scalar>>> {
        match self.next(tag, sql) {
            Reply::Rows(rows) => Ok(rows),
            Reply::Affected(_) => panic!("query got an execute reply: {sql}"),
        }
    }

    async fn execute(&self, sql: &str) -> DbopResult<u64> {
        self.execute_tagged("-", sql).await
    }

    async fn execute_tagged(&self, tag: &str, sql: &str) -> DbopResult<u64> {
        match self.next(tag, sql) {
            Reply::Affected(rows) => Ok(rows),
            Reply::Rows(_) => panic!("execute got a query reply: {sql}"),
        }
    }
}
