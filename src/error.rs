use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Message reported by the database driver, passed through verbatim.
    #[error("{0}")]
    Database(String),

    #[error("Database connection is not established")]
    NotConnected,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Error payload returned by the gateway (`{ "error": ... }`).
    #[error("{0}")]
    Gateway(String),

    /// The request never produced a decodable gateway payload.
    #[error("Gateway request failed: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<mysql_async::Error> for ExplorerError {
    fn from(err: mysql_async::Error) -> Self {
        match err {
            // Server errors carry the message users expect to see, without
            // the "ERROR 1146 (42S02):" prefix of the Display impl.
            mysql_async::Error::Server(server) => ExplorerError::Database(server.message),
            other => ExplorerError::Database(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
