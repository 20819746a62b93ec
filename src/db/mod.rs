mod mock;
mod mysql;
pub mod value;

pub use mock::MockDatabase;
pub use mysql::MysqlDatabase;

use async_trait::async_trait;

use crate::error::Result;
use crate::query::QueryOutput;

/// The single connection the gateway talks to.
///
/// Implementations run one statement at a time; callers never see a pool.
#[async_trait]
pub trait Database: Send + Sync {
    /// Runs `sql` exactly as given.
    async fn execute(&self, sql: &str) -> Result<QueryOutput>;

    /// Releases the connection. Later calls to `execute` fail with
    /// `ExplorerError::NotConnected`.
    async fn close(&self) -> Result<()>;
}
