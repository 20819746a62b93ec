use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

use crate::error::{ExplorerError, Result};

pub const CONFIG_FILE: &str = "gateway_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_host: String,
    pub http_port: u16,
    pub database: DatabaseConfig,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            http_port: 5000,
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "club_management".to_string(),
        }
    }
}

// Keeps the password out of `info!("{:?}", config)`.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

impl DatabaseConfig {
    /// Connection options for the single gateway connection.
    pub fn opts(&self) -> mysql_async::Opts {
        mysql_async::OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .db_name(Some(self.database.clone()))
            // Always TCP to the configured host, never a local socket.
            .prefer_socket(false)
            .into()
    }

    /// `user@host:port/database`, safe to log.
    pub fn target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Try to load from config file, otherwise use defaults
        let mut config = match fs::read_to_string(CONFIG_FILE) {
            Ok(content) => Self::from_json(&content)?,
            Err(_) => {
                let config = Config::default();
                // Save default config for reference
                let _ = fs::write(
                    format!("{}.example", CONFIG_FILE),
                    serde_json::to_string_pretty(&config)?,
                );
                config
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| ExplorerError::Config(format!("{}: {}", CONFIG_FILE, e)))
    }

    /// Applies `GATEWAY_*` and `DB_*` overrides. Unparseable ports are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("GATEWAY_BIND_HOST") {
            self.bind_host = host;
        }

        if let Some(port) = lookup("GATEWAY_HTTP_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.http_port = port;
        }

        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }

        if let Some(port) = lookup("DB_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.database.port = port;
        }

        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }

        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = password;
        }

        if let Some(name) = lookup("DB_NAME") {
            self.database.database = name;
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_point_at_local_mysql_on_port_5000() {
        let config = Config::default();
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.database, "club_management");
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = Config::from_json(r#"{"http_port": 8080, "database": {"host": "db.local"}}"#)
            .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(config.database.host, "db.local");
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ExplorerError::Config(_)));
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let vars = env(&[
            ("GATEWAY_HTTP_PORT", "7000"),
            ("DB_HOST", "10.0.0.5"),
            ("DB_PORT", "3307"),
            ("DB_USER", "clubadmin"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "club"),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| vars.get(k).cloned());

        assert_eq!(config.http_port, 7000);
        assert_eq!(config.database.target(), "clubadmin@10.0.0.5:3307/club");
        assert_eq!(config.database.password, "s3cret");
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let vars = env(&[("GATEWAY_HTTP_PORT", "not-a-port"), ("DB_PORT", "99999")]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| vars.get(k).cloned());

        assert_eq!(config.http_port, 5000);
        assert_eq!(config.database.port, 3306);
    }

    #[test]
    fn debug_output_redacts_password() {
        let mut config = Config::default();
        config.database.password = "database457".to_string();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("database457"));
        assert!(rendered.contains("<redacted>"));
    }
}
