use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::Conn;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::error::{ExplorerError, Result};
use crate::query::QueryOutput;
use super::value::row_to_json;
use super::Database;

/// One persistent MySQL connection, opened at startup and closed at shutdown.
///
/// The mutex serializes requests onto the connection. A connection that
/// drops mid-session is not re-established: every later statement reports
/// the driver error until the process restarts.
pub struct MysqlDatabase {
    conn: Mutex<Option<Conn>>,
    target: String,
}

impl MysqlDatabase {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let target = config.target();
        debug!("Connecting to MySQL at {}", target);

        let conn = Conn::new(config.opts()).await?;
        info!("Connected to MySQL database {}", target);

        Ok(Self {
            conn: Mutex::new(Some(conn)),
            target,
        })
    }

    /// A handle with no live connection; every statement fails with
    /// `NotConnected`. Used when the startup connection attempt failed.
    pub fn disconnected(config: &DatabaseConfig) -> Self {
        Self {
            conn: Mutex::new(None),
            target: config.target(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[async_trait]
impl Database for MysqlDatabase {
    async fn execute(&self, sql: &str) -> Result<QueryOutput> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(ExplorerError::NotConnected)?;

        let mut result = conn.query_iter(sql).await?;

        let has_result_set = result
            .columns()
            .map(|columns| !columns.is_empty())
            .unwrap_or(false);

        let rows: Vec<mysql_async::Row> = result.collect().await?;
        let affected_rows = result.affected_rows();
        let last_insert_id = result.last_insert_id();

        // Only the first result set is returned. Later statements of a
        // multi-statement text are drained, and their errors only logged.
        if let Err(e) = result.drop_result().await {
            warn!("Discarding error from trailing statement on {}: {}", self.target, e);
        }

        if has_result_set {
            Ok(QueryOutput::new_rows(rows.into_iter().map(row_to_json).collect()))
        } else {
            Ok(QueryOutput::new_statement(affected_rows, last_insert_id))
        }
    }

    async fn close(&self) -> Result<()> {
        let conn = self.conn.lock().await.take();

        match conn {
            Some(conn) => {
                if let Err(e) = conn.disconnect().await {
                    warn!("Error while disconnecting from {}: {}", self.target, e);
                    return Err(e.into());
                }
                info!("Disconnected from MySQL database {}", self.target);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disconnected_handle_reports_not_connected() {
        let db = MysqlDatabase::disconnected(&DatabaseConfig::default());

        let err = db.execute("SELECT 1").await.unwrap_err();
        assert!(matches!(err, ExplorerError::NotConnected));
    }

    #[tokio::test]
    async fn closing_a_disconnected_handle_is_a_no_op() {
        let db = MysqlDatabase::disconnected(&DatabaseConfig::default());
        assert!(db.close().await.is_ok());
        assert_eq!(db.target(), "root@127.0.0.1:3306/club_management");
    }
}
