use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::Result;
use super::{display_value, QueryOutput};

/// Native introspection command of the backing MySQL server.
pub const LIST_TABLES_SQL: &str = "SHOW TABLES";

/// Forwards SQL text to the database untouched.
///
/// There is no validation, retry or timeout here: whatever the database
/// accepts runs, including destructive statements.
pub struct QueryGateway {
    db: Arc<dyn Database>,
}

impl QueryGateway {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let output = self.execute(LIST_TABLES_SQL).await?;

        let tables = output
            .rows
            .iter()
            .filter_map(|row| row.values().next().map(display_value))
            .collect::<Vec<_>>();

        debug!("Listed {} tables", tables.len());
        Ok(tables)
    }

    pub async fn run_query(&self, sql: &str) -> Result<QueryOutput> {
        self.execute(sql).await
    }

    /// Releases the underlying connection.
    pub async fn shutdown(&self) -> Result<()> {
        self.db.close().await
    }

    async fn execute(&self, sql: &str) -> Result<QueryOutput> {
        let query_id = Uuid::new_v4();
        let started = Instant::now();

        debug!("Query {}: {}", query_id, sql);

        match self.db.execute(sql).await {
            Ok(output) => {
                info!(
                    "Query {} completed in {:?}: {} rows",
                    query_id,
                    started.elapsed(),
                    output.rows.len()
                );
                Ok(output)
            }
            Err(e) => {
                warn!("Query {} failed after {:?}: {}", query_id, started.elapsed(), e);
                Err(e)
            }
        }
    }
}
