// Library exports for db-explorer
// The gateway and console binaries and the integration tests use these modules

pub mod error;
pub mod config;
pub mod logging;
pub mod db;
pub mod query;
pub mod http;
pub mod console;

// Re-export commonly used types
pub use error::{ExplorerError, Result};
pub use config::Config;
pub use query::{QueryGateway, QueryOutput, QueryResponse, Row};
