use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{ExplorerError, Result};
use crate::query::{display_value, QueryRequest, QueryResponse, TablesResponse};

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:5000";

/// What the console needs from a gateway.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    async fn list_tables(&self) -> Result<Vec<String>>;

    async fn run_query(&self, sql: &str) -> Result<QueryResponse>;
}

/// HTTP client for the gateway's `/api/tables` and `/api/query` endpoints.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = reqwest::Client::builder().build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl QueryBackend for GatewayClient {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let url = self.endpoint("/api/tables");
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let body: TablesResponse = decode(response).await?;
        Ok(body.tables)
    }

    async fn run_query(&self, sql: &str) -> Result<QueryResponse> {
        let url = self.endpoint("/api/query");
        debug!("POST {} ({} bytes of SQL)", url, sql.len());

        let response = self
            .http
            .post(&url)
            .json(&QueryRequest { query: sql.to_string() })
            .send()
            .await?;
        decode(response).await
    }
}

/// Reads a gateway payload. The `error` key wins regardless of HTTP status;
/// anything that is not a decodable payload is a transport failure.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| ExplorerError::Transport(format!("HTTP {}: {}", status, e)))?;

    decode_payload(status.is_success(), body)
}

pub(crate) fn decode_payload<T: DeserializeOwned>(success: bool, body: Value) -> Result<T> {
    match body.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) if message.is_empty() => {}
        Some(error) => return Err(ExplorerError::Gateway(display_value(error))),
    }

    if !success {
        return Err(ExplorerError::Transport(
            "gateway answered with a failure status and no error message".to_string(),
        ));
    }

    serde_json::from_value(body).map_err(|e| ExplorerError::Transport(e.to_string()))
}

/// Normalizes a gateway base URL: adds `http://` when no scheme is given and
/// strips trailing slashes. A repeated scheme (`http://http://host`) is
/// rejected instead of being requested as-is.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ExplorerError::Config("gateway URL is empty".to_string()));
    }

    let url = match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let scheme = scheme.to_ascii_lowercase();
            if scheme != "http" && scheme != "https" {
                return Err(ExplorerError::Config(format!(
                    "unsupported gateway URL scheme '{}'",
                    scheme
                )));
            }
            if rest.contains("://") {
                return Err(ExplorerError::Config(format!(
                    "malformed gateway URL '{}': scheme given more than once",
                    trimmed
                )));
            }
            if rest.is_empty() {
                return Err(ExplorerError::Config(format!("gateway URL '{}' has no host", trimmed)));
            }
            format!("{}://{}", scheme, rest)
        }
        None => format!("http://{}", trimmed),
    };

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_gets_default_scheme_and_loses_trailing_slash() {
        assert_eq!(normalize_base_url("localhost:5000/").unwrap(), "http://localhost:5000");
        assert_eq!(
            normalize_base_url("sqlapi.example.org").unwrap(),
            "http://sqlapi.example.org"
        );
        assert_eq!(
            normalize_base_url(" HTTPS://db.example.org// ").unwrap(),
            "https://db.example.org"
        );
    }

    #[test]
    fn doubled_scheme_is_rejected() {
        let err = normalize_base_url("http://http://sqlapi.example.org").unwrap_err();
        assert!(matches!(err, ExplorerError::Config(ref m) if m.contains("more than once")));
    }

    #[test]
    fn empty_and_foreign_urls_are_rejected() {
        assert!(normalize_base_url("  ").is_err());
        assert!(normalize_base_url("ftp://host").is_err());
        assert!(normalize_base_url("http://").is_err());
    }

    #[test]
    fn error_key_wins_even_on_success_status() {
        let result: Result<QueryResponse> =
            decode_payload(true, json!({ "error": "Unknown column 'x'" }));
        assert!(matches!(result, Err(ExplorerError::Gateway(ref m)) if m == "Unknown column 'x'"));
    }

    #[test]
    fn failure_status_without_error_key_is_transport() {
        let result: Result<QueryResponse> = decode_payload(false, json!({ "results": [] }));
        assert!(matches!(result, Err(ExplorerError::Transport(_))));
    }

    #[test]
    fn null_or_empty_error_is_not_an_error() {
        let result: Result<QueryResponse> =
            decode_payload(true, json!({ "error": null, "results": [] }));
        assert!(result.unwrap().results.is_empty());

        let result: Result<TablesResponse> =
            decode_payload(true, json!({ "error": "", "tables": ["event"] }));
        assert_eq!(result.unwrap().tables, vec!["event"]);
    }

    #[test]
    fn undecodable_success_payload_is_transport() {
        let result: Result<TablesResponse> = decode_payload(true, json!({ "tables": 3 }));
        assert!(matches!(result, Err(ExplorerError::Transport(_))));
    }

    #[test]
    fn client_keeps_normalized_base() {
        let client = GatewayClient::new("127.0.0.1:5000/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(client.endpoint("/api/query"), "http://127.0.0.1:5000/api/query");
    }
}
