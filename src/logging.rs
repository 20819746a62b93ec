use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const GATEWAY_FILTER: &str = "db_explorer=info,explorer_gateway=info,tower_http=info";
pub const CONSOLE_FILTER: &str = "warn";

/// Installs the global subscriber. `RUST_LOG` wins over `default_filter`.
/// Output goes to stderr so console tables on stdout stay clean.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    #[test]
    fn repeated_initialization_is_harmless() {
        init_tracing(GATEWAY_FILTER);
        init_tracing(CONSOLE_FILTER);

        info!(query_id = "test-123", rows = 1, "Query completed");
        warn!("Query failed: {}", "Table 'club.nope' doesn't exist");
    }

    #[test]
    fn default_filters_parse() {
        assert!(EnvFilter::try_new(GATEWAY_FILTER).is_ok());
        assert!(EnvFilter::try_new(CONSOLE_FILTER).is_ok());
    }
}
