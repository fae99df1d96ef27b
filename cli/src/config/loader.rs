//! Finds the calculator's settings file and turns it into a
//! [`ResolvedClientConfig`] for the core crate.
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./integra.json or ./.integra/config.json
//! 3. Git repository root: <repo_root>/.integra/config.json
//! 4. XDG config: $XDG_CONFIG_HOME/integra/config.json or ~/.config/integra/config.json
//! 5. Environment variables only (no files)

use anyhow::{anyhow, Context, Result};
use integra_core::config::{DEFAULT_GRAPH_RANGE, DEFAULT_SERVER_URL};
use integra_core::{JsonFileHistoryStore, ResolvedClientConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw configuration file format (simple single-file schema)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// Base URL of the calculation service
    pub server_url: Option<String>,
    /// Endpoint path (defaults to /calculate)
    pub endpoint: Option<String>,
    /// Plot range in `min,max` form
    pub graph_range: Option<String>,
    /// Plot the antiderivative instead of the integrand
    pub dual_graph: Option<bool>,
    /// History file, `~` is expanded
    pub history_file: Option<String>,
    /// Number of history entries kept
    pub history_capacity: Option<usize>,
    /// Additional headers (optional)
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Directory the search starts from
    working_dir: PathBuf,
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    server_url_override: Option<String>,
    graph_range_override: Option<String>,
    dual_graph_override: Option<bool>,
    history_file_override: Option<PathBuf>,
}

impl CliConfigLoader {
    /// Create a new loader searching from the current directory
    pub fn new() -> Self {
        Self {
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_override: None,
            server_url_override: None,
            graph_range_override: None,
            dual_graph_override: None,
            history_file_override: None,
        }
    }

    /// Search from `dir` instead of the current directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set server URL override
    pub fn with_server_url_override(mut self, server_url: String) -> Self {
        self.server_url_override = Some(server_url);
        self
    }

    /// Set graph range override
    pub fn with_graph_range_override(mut self, graph_range: String) -> Self {
        self.graph_range_override = Some(graph_range);
        self
    }

    /// Set dual graph override
    pub fn with_dual_graph_override(mut self, dual_graph: bool) -> Self {
        self.dual_graph_override = Some(dual_graph);
        self
    }

    /// Set history file override
    pub fn with_history_file_override(mut self, path: PathBuf) -> Self {
        self.history_file_override = Some(path);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ResolvedClientConfig> {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            // Use explicit config override
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            // Search in priority order
            self.search_and_load().await?
        };

        // Step 2: Apply flag overrides
        if let Some(server_url) = &self.server_url_override {
            config.server_url = Some(server_url.clone());
        }
        if let Some(graph_range) = &self.graph_range_override {
            config.graph_range = Some(graph_range.clone());
        }
        if let Some(dual_graph) = self.dual_graph_override {
            config.dual_graph = Some(dual_graph);
        }
        if let Some(history_file) = &self.history_file_override {
            config.history_file = Some(history_file.display().to_string());
        }

        // Step 3: Resolve to final client config
        self.resolve_config(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        // 1. Current working directory
        if let Some(config) = self.try_load_cwd().await? {
            return Ok(config);
        }

        // 2. Git repository root
        if let Some(config) = self.try_load_git_root().await? {
            return Ok(config);
        }

        // 3. XDG config directory
        if let Some(config) = self.try_load_xdg().await? {
            return Ok(config);
        }

        // 4. Environment variables only
        self.try_load_env_only()
    }

    /// Try loading from current working directory
    async fn try_load_cwd(&self) -> Result<Option<RawConfig>> {
        // Try ./integra.json first
        let integra_json = self.working_dir.join("integra.json");
        if integra_json.exists() {
            return Ok(Some(self.load_file(&integra_json).await?));
        }

        // Try ./.integra/config.json
        let integra_dir_config = self.working_dir.join(".integra").join("config.json");
        if integra_dir_config.exists() {
            return Ok(Some(self.load_file(&integra_dir_config).await?));
        }

        Ok(None)
    }

    /// Try loading from git repository root
    async fn try_load_git_root(&self) -> Result<Option<RawConfig>> {
        if let Some(git_root) = self.find_git_root() {
            let config_path = git_root.join(".integra").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Try loading from XDG config directory
    async fn try_load_xdg(&self) -> Result<Option<RawConfig>> {
        if let Some(config_dir) = self.get_xdg_config_dir() {
            let config_path = config_dir.join("integra").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Build the configuration from environment variables only
    fn try_load_env_only(&self) -> Result<RawConfig> {
        let dual_graph = match std::env::var("INTEGRA_DUAL_GRAPH") {
            Ok(value) => Some(parse_bool(&value).ok_or_else(|| {
                anyhow!("INTEGRA_DUAL_GRAPH must be true or false, got '{}'", value)
            })?),
            Err(_) => None,
        };

        debug!("No config file found, using environment");
        Ok(RawConfig {
            server_url: std::env::var("INTEGRA_SERVER_URL").ok(),
            graph_range: std::env::var("INTEGRA_GRAPH_RANGE").ok(),
            dual_graph,
            history_file: std::env::var("INTEGRA_HISTORY_FILE").ok(),
            ..RawConfig::default()
        })
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            // Try config.json in the directory
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find git repository root
    fn find_git_root(&self) -> Option<PathBuf> {
        let mut current = self.working_dir.clone();

        loop {
            if current.join(".git").exists() {
                return Some(current);
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        None
    }

    /// Get XDG config directory
    fn get_xdg_config_dir(&self) -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg_config))
        } else {
            dirs::home_dir().map(|home| home.join(".config"))
        }
    }

    /// Resolve raw config to ResolvedClientConfig
    fn resolve_config(&self, config: RawConfig) -> Result<ResolvedClientConfig> {
        let server_url = config
            .server_url
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let history_path = match config.history_file {
            Some(path) => {
                let expanded = shellexpand::tilde(&path);
                PathBuf::from(expanded.as_ref())
            }
            None => JsonFileHistoryStore::default_path(),
        };

        let mut resolved = ResolvedClientConfig::new(server_url)
            .with_graph_range(
                config
                    .graph_range
                    .unwrap_or_else(|| DEFAULT_GRAPH_RANGE.to_string()),
            )
            .with_dual_graph(config.dual_graph.unwrap_or(false))
            .with_history_path(history_path)
            .with_headers(config.headers);
        if let Some(endpoint) = config.endpoint {
            resolved = resolved.with_endpoint(endpoint);
        }
        if let Some(capacity) = config.history_capacity {
            resolved = resolved.with_history_capacity(capacity);
        }

        // Validate
        resolved
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(resolved)
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
