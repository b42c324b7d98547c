use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_SEARCH_LIMIT, POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS, POSTGRES_DEFAULT_MAX_CONNECTIONS,
    POSTGRES_DEFAULT_MAX_LIFETIME_SECS, POSTGRES_DEFAULT_MIN_CONNECTIONS,
    POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS, POSTGRES_DEFAULT_URL,
};

// =============================================================================
// File Config Structs (all fields optional, merged across files)
// =============================================================================

/// PostgreSQL configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PostgresFileConfig {
    /// PostgreSQL connection URL (or use LIGHTBNB_POSTGRES_URL env var)
    pub url: Option<String>,
    /// Maximum number of connections in the pool (default: 10)
    pub max_connections: Option<u32>,
    /// Minimum number of connections to keep warm (default: 1)
    pub min_connections: Option<u32>,
    /// Connection acquire timeout in seconds (default: 30)
    pub acquire_timeout_secs: Option<u64>,
    /// Idle connection timeout in seconds (default: 600)
    pub idle_timeout_secs: Option<u64>,
    /// Max connection lifetime in seconds (default: 1800)
    pub max_lifetime_secs: Option<u64>,
    /// Statement timeout in seconds, 0 to disable (default: 30)
    pub statement_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    pub postgres: Option<PostgresFileConfig>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SearchFileConfig {
    /// Rows returned when a search gives no limit (default: 10)
    pub default_limit: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub database: Option<DatabaseFileConfig>,
    pub search: Option<SearchFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(database) = other.database
            && let Some(pg) = database.postgres
        {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default)
                .postgres
                .get_or_insert_with(PostgresFileConfig::default);
            if pg.url.is_some() {
                tracing::trace!("Merging database.postgres.url");
                current.url = pg.url;
            }
            if pg.max_connections.is_some() {
                tracing::trace!(max_connections = ?pg.max_connections, "Merging database.postgres.max_connections");
                current.max_connections = pg.max_connections;
            }
            if pg.min_connections.is_some() {
                tracing::trace!(min_connections = ?pg.min_connections, "Merging database.postgres.min_connections");
                current.min_connections = pg.min_connections;
            }
            if pg.acquire_timeout_secs.is_some() {
                current.acquire_timeout_secs = pg.acquire_timeout_secs;
            }
            if pg.idle_timeout_secs.is_some() {
                current.idle_timeout_secs = pg.idle_timeout_secs;
            }
            if pg.max_lifetime_secs.is_some() {
                current.max_lifetime_secs = pg.max_lifetime_secs;
            }
            if pg.statement_timeout_secs.is_some() {
                current.statement_timeout_secs = pg.statement_timeout_secs;
            }
        }

        if let Some(search) = other.search {
            let current = self.search.get_or_insert_with(SearchFileConfig::default);
            if search.default_limit.is_some() {
                tracing::trace!(default_limit = ?search.default_limit, "Merging search.default_limit");
                current.default_limit = search.default_limit;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// PostgreSQL configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to keep warm
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,
    /// Max connection lifetime in seconds
    pub max_lifetime_secs: u64,
    /// Statement timeout in seconds (0 = disabled)
    pub statement_timeout_secs: u64,
}

/// Search configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub default_limit: u32,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub postgres: PostgresConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.lightbnb/lightbnb.json)
    /// 3. Local directory config or CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_home(path);
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_layers(file_config, cli)
    }

    /// Layer defaults, merged file config and CLI/env overrides, then validate
    fn from_layers(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_pg = file_config
            .database
            .unwrap_or_default()
            .postgres
            .unwrap_or_default();
        let file_search = file_config.search.unwrap_or_default();

        let postgres = PostgresConfig {
            url: cli
                .postgres_url
                .clone()
                .or(file_pg.url)
                .unwrap_or_else(|| POSTGRES_DEFAULT_URL.to_string()),
            max_connections: cli
                .max_connections
                .or(file_pg.max_connections)
                .unwrap_or(POSTGRES_DEFAULT_MAX_CONNECTIONS),
            min_connections: file_pg
                .min_connections
                .unwrap_or(POSTGRES_DEFAULT_MIN_CONNECTIONS),
            acquire_timeout_secs: file_pg
                .acquire_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS),
            idle_timeout_secs: file_pg
                .idle_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS),
            max_lifetime_secs: file_pg
                .max_lifetime_secs
                .unwrap_or(POSTGRES_DEFAULT_MAX_LIFETIME_SECS),
            statement_timeout_secs: file_pg
                .statement_timeout_secs
                .unwrap_or(POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS),
        };

        let search = SearchConfig {
            default_limit: cli
                .search_limit
                .or(file_search.default_limit)
                .unwrap_or(DEFAULT_SEARCH_LIMIT),
        };

        let config = Self { postgres, search };
        config.validate()?;

        tracing::debug!(
            max_connections = config.postgres.max_connections,
            search_limit = config.search.default_limit,
            "Configuration loaded"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.postgres.url.trim().is_empty() {
            anyhow::bail!("PostgreSQL URL cannot be empty");
        }
        if self.postgres.max_connections == 0 {
            anyhow::bail!("database.postgres.max_connections must be greater than 0");
        }
        if self.postgres.min_connections > self.postgres.max_connections {
            anyhow::bail!(
                "database.postgres.min_connections ({}) exceeds max_connections ({})",
                self.postgres.min_connections,
                self.postgres.max_connections
            );
        }
        if self.search.default_limit == 0 {
            anyhow::bail!("search.default_limit must be greater than 0");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.lightbnb/lightbnb.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
