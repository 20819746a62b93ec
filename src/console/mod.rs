//! Terminal console for the gateway: state, canned queries, table rendering
//! and the interactive prompt.

pub mod canned;
pub mod client;
pub mod render;
pub mod repl;
pub mod state;

pub use canned::CannedQuery;
pub use client::{GatewayClient, QueryBackend, DEFAULT_GATEWAY_URL};
pub use render::{render, View};
pub use state::{Console, ConsoleState, SubmitOutcome, Ticket};

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::error::{ExplorerError, Result};
    use crate::query::QueryResponse;
    use super::QueryBackend;

    fn replay(err: &ExplorerError) -> ExplorerError {
        match err {
            ExplorerError::Gateway(m) => ExplorerError::Gateway(m.clone()),
            other => ExplorerError::Transport(other.to_string()),
        }
    }

    /// Backend answering from fixed responses; unknown SQL is a gateway error.
    pub struct ScriptedBackend {
        tables: Result<Vec<String>>,
        queries: HashMap<String, Result<QueryResponse>>,
        sent: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn new() -> Self {
            Self {
                tables: Ok(vec![]),
                queries: HashMap::new(),
                sent: Mutex::new(vec![]),
            }
        }

        pub fn with_tables(mut self, tables: Result<Vec<String>>) -> Self {
            self.tables = tables;
            self
        }

        pub fn with_query(mut self, sql: &str, response: Result<QueryResponse>) -> Self {
            self.queries.insert(sql.to_string(), response);
            self
        }

        pub fn sent(&self) -> Vec<String> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl QueryBackend for ScriptedBackend {
        async fn list_tables(&self) -> Result<Vec<String>> {
            match &self.tables {
                Ok(tables) => Ok(tables.clone()),
                Err(e) => Err(replay(e)),
            }
        }

        async fn run_query(&self, sql: &str) -> Result<QueryResponse> {
            self.sent.lock().push(sql.to_string());
            match self.queries.get(sql) {
                Some(Ok(response)) => Ok(response.clone()),
                Some(Err(e)) => Err(replay(e)),
                None => Err(ExplorerError::Gateway(format!("unscripted query: {}", sql))),
            }
        }
    }
}
