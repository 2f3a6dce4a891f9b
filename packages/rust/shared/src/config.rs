//! Application configuration for the Pokédex client.
//!
//! User config lives at `~/.pokedex/pokedex.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PokedexError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pokedex.toml";

/// Default config/data directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pokedex";

// ---------------------------------------------------------------------------
// Config structs (matching pokedex.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote catalog API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Catalog store settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[catalog]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Entries fetched per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Directory for persisted state. Defaults to the config directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            data_dir: None,
        }
    }
}

fn default_page_size() -> u32 {
    10
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pokedex/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PokedexError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pokedex/pokedex.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Resolve the data directory for persisted state: the configured
/// `catalog.data_dir` if set, otherwise the config directory itself.
pub fn data_dir(config: &AppConfig) -> Result<PathBuf> {
    match &config.catalog.data_dir {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => config_dir(),
    }
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PokedexError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PokedexError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PokedexError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| PokedexError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PokedexError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
