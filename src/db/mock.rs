//! Scripted in-memory database for tests and local demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{ExplorerError, Result};
use crate::query::QueryOutput;
use super::Database;

/// Answers statements from a table of canned responses keyed by exact SQL
/// text and records every statement it receives.
pub struct MockDatabase {
    responses: Mutex<HashMap<String, std::result::Result<QueryOutput, String>>>,
    executed: Mutex<Vec<String>>,
    closed: AtomicBool,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            executed: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Scripts the answer for `sql`. `Err` carries the driver message.
    pub fn respond(&self, sql: &str, response: std::result::Result<QueryOutput, String>) {
        self.responses.lock().insert(sql.to_string(), response);
    }

    /// Statements received so far, in arrival order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }
}

impl Default for MockDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn execute(&self, sql: &str) -> Result<QueryOutput> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ExplorerError::NotConnected);
        }

        self.executed.lock().push(sql.to_string());

        match self.responses.lock().get(sql) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(ExplorerError::Database(message.clone())),
            None => Err(ExplorerError::Database(format!(
                "You have an error in your SQL syntax; check the manual that corresponds to your \
                 MySQL server version for the right syntax to use near '{}' at line 1",
                sql
            ))),
        }
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
