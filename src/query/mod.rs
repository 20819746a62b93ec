mod gateway;

pub use gateway::{QueryGateway, LIST_TABLES_SQL};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One result row: column name to value, in the order the database reported
/// the columns.
pub type Row = serde_json::Map<String, Value>;

/// Outcome of a statement that did not produce a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementSummary {
    pub affected_rows: u64,
    pub last_insert_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    pub rows: Vec<Row>,
    pub summary: Option<StatementSummary>,
}

impl QueryOutput {
    pub fn new_rows(rows: Vec<Row>) -> Self {
        Self { rows, summary: None }
    }

    pub fn new_statement(affected_rows: u64, last_insert_id: Option<u64>) -> Self {
        Self {
            rows: vec![],
            summary: Some(StatementSummary {
                affected_rows,
                last_insert_id,
            }),
        }
    }
}

/// Body of `POST /api/query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Success body of `POST /api/query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_rows: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_insert_id: Option<u64>,
}

impl From<QueryOutput> for QueryResponse {
    fn from(output: QueryOutput) -> Self {
        Self {
            results: output.rows,
            affected_rows: output.summary.map(|s| s.affected_rows),
            last_insert_id: output.summary.and_then(|s| s.last_insert_id),
        }
    }
}

/// Success body of `GET /api/tables`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablesResponse {
    #[serde(default)]
    pub tables: Vec<String>,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// String form of a cell. `null` becomes the `NULL` token, which is
/// indistinguishable from a text cell holding "NULL".
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
