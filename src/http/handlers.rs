use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{info, error};
use serde_json::json;

use crate::error::ExplorerError;
use crate::query::{ErrorResponse, QueryGateway, QueryRequest, QueryResponse, TablesResponse};

pub struct AppState {
    pub gateway: Arc<QueryGateway>,
}

// Table listing handler: GET /api/tables
pub async fn tables_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.gateway.list_tables().await {
        Ok(tables) => (StatusCode::OK, Json(TablesResponse { tables })).into_response(),
        Err(e) => {
            error!("Failed to list tables: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

// Query passthrough handler: POST /api/query
pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    // Undecodable bodies still answer with an `error` payload so clients
    // only ever have to look at one error channel.
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = ExplorerError::BadRequest(rejection.body_text());
            error!("Rejected query request: {}", err);
            return error_response(StatusCode::BAD_REQUEST, err.to_string());
        }
    };

    info!("Query request: {} bytes of SQL", request.query.len());

    match state.gateway.run_query(&request.query).await {
        Ok(output) => (StatusCode::OK, Json(QueryResponse::from(output))).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "explorer-gateway",
        })),
    )
}

pub(crate) fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}
