use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use common::walker::DOCUMENT_NODE_TYPE;

pub const APP_NAME: &str = "crlib";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const SITES_PATH: &str = "/sites";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Human readable name of the site
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Node name of the site below `/sites`
    #[serde(default = "default_site_node_name")]
    pub site_node_name: String,
    /// User whose workspace page commands work in
    #[serde(default = "default_user")]
    pub default_user: String,
    /// Node types walked and listed as pages
    #[serde(default = "default_document_types")]
    pub document_types: Vec<String>,
    /// Default log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for a daily rolling log file
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_site_name() -> String {
    "Demo Site".to_string()
}

fn default_site_node_name() -> String {
    "demo".to_string()
}

fn default_user() -> String {
    "admin".to_string()
}

fn default_document_types() -> Vec<String> {
    vec![DOCUMENT_NODE_TYPE.to_string()]
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            site_node_name: default_site_node_name(),
            default_user: default_user(),
            document_types: default_document_types(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Node path of the site root, e.g. `/sites/demo`
    pub fn site_path(&self) -> String {
        format!("{}/{}", SITES_PATH, self.site_node_name)
    }

    /// Configured level, `WARN` when it does not parse
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::WARN)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the crlib directory (~/.crlib)
    pub crlib_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the crlib directory path (custom or default ~/.crlib)
    pub fn crlib_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Create a new state directory holding the config file. The database
    /// file is created on first connect.
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let crlib_dir = Self::crlib_dir(custom_path)?;
        if crlib_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&crlib_dir)?;

        let config = config.unwrap_or_default();
        let config_path = crlib_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            db_path: crlib_dir.join(DB_FILE_NAME),
            crlib_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the crlib directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let crlib_dir = Self::crlib_dir(custom_path)?;
        let config_path = crlib_dir.join(CONFIG_FILE_NAME);

        if !crlib_dir.exists() {
            return Err(StateError::NotInitialized);
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            db_path: crlib_dir.join(DB_FILE_NAME),
            crlib_dir,
            config_path,
            config,
        })
    }

    /// `sqlite://` URL of the database file
    pub fn database_url(&self) -> Result<Url, StateError> {
        let url = format!("sqlite://{}", self.db_path.display());
        Url::parse(&url).map_err(|e| StateError::InvalidDatabaseUrl(url, e))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("crlib directory not initialized. Run 'crlib init' first")]
    NotInitialized,

    #[error("crlib directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid database url {0}: {1}")]
    InvalidDatabaseUrl(String, url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
