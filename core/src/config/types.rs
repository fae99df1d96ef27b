//! Minimal configuration types for Integra core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default address of a locally running calculation service
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Path of the calculation endpoint on the service
pub const DEFAULT_ENDPOINT: &str = "/calculate";

/// Plot range sent when the user does not pick one
pub const DEFAULT_GRAPH_RANGE: &str = "-10,10";

/// Number of calculations kept in history
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// A fully resolved client configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedClientConfig {
    /// Base URL of the calculation service
    pub server_url: String,
    /// Path of the calculation endpoint
    pub endpoint: String,
    /// Plot range in `min,max` form
    pub graph_range: String,
    /// Plot the antiderivative instead of the integrand
    pub dual_graph: bool,
    /// History file location
    pub history_path: PathBuf,
    /// Maximum number of history entries
    pub history_capacity: usize,
    /// Additional headers for requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ResolvedClientConfig {
    /// Create a new resolved config with defaults for everything but the server
    pub fn new(server_url: String) -> Self {
        Self {
            server_url,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            graph_range: DEFAULT_GRAPH_RANGE.to_string(),
            dual_graph: false,
            history_path: crate::history::JsonFileHistoryStore::default_path(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            headers: HashMap::new(),
        }
    }

    /// Set the endpoint path
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set the number of history entries kept
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the plot range
    pub fn with_graph_range(mut self, graph_range: String) -> Self {
        self.graph_range = graph_range;
        self
    }

    /// Enable or disable dual graph display
    pub fn with_dual_graph(mut self, dual_graph: bool) -> Self {
        self.dual_graph = dual_graph;
        self
    }

    /// Set the history file
    pub fn with_history_path(mut self, path: PathBuf) -> Self {
        self.history_path = path;
        self
    }

    /// Add multiple headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Full URL of the calculation endpoint
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.server_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "server_url".to_string(),
            });
        }

        // Validate URL format
        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            return Err(invalid("server_url", &self.server_url));
        }

        if url::Url::parse(&self.endpoint_url()).is_err() {
            return Err(invalid("endpoint", &self.endpoint_url()));
        }

        if parse_graph_range(&self.graph_range).is_none() {
            return Err(invalid("graph_range", &self.graph_range));
        }

        if self.history_capacity == 0 {
            return Err(invalid("history_capacity", "0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Parse a `min,max` plot range.
///
/// The service falls back to its own default for anything that does not
/// split into two parts, so the client only checks the shape it will send.
pub fn parse_graph_range(range: &str) -> Option<(f64, f64)> {
    let (min, max) = range.split_once(',')?;
    let min: f64 = min.trim().parse().ok()?;
    let max: f64 = max.trim().parse().ok()?;
    (min.is_finite() && max.is_finite() && min < max).then_some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ResolvedClientConfig::new(DEFAULT_SERVER_URL.to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint_url(), "http://127.0.0.1:5000/calculate");
        assert_eq!(config.history_capacity, 10);
    }

    #[test]
    fn test_endpoint_url_joins_slashes() {
        let config = ResolvedClientConfig::new("http://calc.local:8080/".to_string());
        assert_eq!(config.endpoint_url(), "http://calc.local:8080/calculate");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ResolvedClientConfig::new("calc.local".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "server_url"
        ));

        let config = ResolvedClientConfig::new(String::new());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingField { .. })
        ));

        let config = ResolvedClientConfig::new(DEFAULT_SERVER_URL.to_string())
            .with_graph_range("10,-10".to_string());
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for field 'graph_range': 10,-10"
        );

        let mut config = ResolvedClientConfig::new(DEFAULT_SERVER_URL.to_string());
        config.history_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_graph_range() {
        assert_eq!(parse_graph_range("-10,10"), Some((-10.0, 10.0)));
        assert_eq!(parse_graph_range(" -2.5 , 4 "), Some((-2.5, 4.0)));
        assert_eq!(parse_graph_range("-10"), None);
        assert_eq!(parse_graph_range("a,b"), None);
        assert_eq!(parse_graph_range("1,1"), None);
    }
}
