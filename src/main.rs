use anyhow::Result;
use std::sync::Arc;
use tracing::{info, error};

use db_explorer::config::Config;
use db_explorer::db::{Database, MysqlDatabase};
use db_explorer::http::HttpServer;
use db_explorer::logging::{init_tracing, GATEWAY_FILTER};
use db_explorer::query::QueryGateway;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(GATEWAY_FILTER);

    info!("Starting Database Explorer gateway");

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded: {:?}", config);

    // A failed connection is not fatal: the gateway keeps serving and every
    // request reports that the database is unavailable.
    let db: Arc<dyn Database> = match MysqlDatabase::connect(&config.database).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Error connecting to database {}: {}", config.database.target(), e);
            Arc::new(MysqlDatabase::disconnected(&config.database))
        }
    };

    let gateway = Arc::new(QueryGateway::new(db));

    let http_server = HttpServer::bind(&config.bind_addr(), gateway.clone()).await?;
    info!("Gateway ready on {}", http_server.local_addr()?);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    if let Err(e) = http_server.serve_with_shutdown(shutdown).await {
        error!("HTTP server error: {}", e);
    }

    info!("Closing database connection");
    if let Err(e) = gateway.shutdown().await {
        error!("Failed to close database connection: {}", e);
    }

    info!("Shutting down Database Explorer gateway");
    Ok(())
}
