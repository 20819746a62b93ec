use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::query::QueryGateway;
use super::handlers::{AppState, health_handler, query_handler, tables_handler};

pub struct HttpServer {
    listener: TcpListener,
    gateway: Arc<QueryGateway>,
}

impl HttpServer {
    /// Binds the listener up front so callers learn the real address
    /// (port 0 picks an ephemeral port).
    pub async fn bind(addr: &str, gateway: Arc<QueryGateway>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, gateway })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn router(gateway: Arc<QueryGateway>) -> Router {
        let state = Arc::new(AppState { gateway });

        Router::new()
            .route("/api/tables", get(tables_handler))
            .route("/api/query", post(query_handler))
            // Health check
            .route("/api/health", get(health_handler))
            // Browser consoles call from another origin
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        let app = Self::router(self.gateway);

        info!("HTTP server listening on {}", addr);

        axum::serve(self.listener, app)
            .with_graceful_shutdown(signal)
            .await?;

        info!("HTTP server on {} stopped", addr);
        Ok(())
    }
}
