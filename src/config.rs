use crate::domain::Pagination;
use crate::error::ConfigError;
use crate::favorites::DEFAULT_FAVORITES_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DATA_DIR_ENV: &str = "STOREFRONT_PATH";
const CONFIG_FILE: &str = "config.toml";

/// Resolve the data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. STOREFRONT_PATH environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.storefront
pub fn resolve_data_dir(explicit_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(&path.to_string_lossy()));
    }

    if let Ok(env_path) = std::env::var(DATA_DIR_ENV) {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("storefront"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".storefront"));
    }

    Err(ConfigError::NoDataDir)
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Simulated latencies, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub cart_ms: u64,
    pub search_ms: u64,
    pub page_ms: u64,
    pub toast_ms: u64,
}

impl DelayConfig {
    pub fn cart(&self) -> Duration {
        Duration::from_millis(self.cart_ms)
    }

    pub fn search(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }

    pub fn page(&self) -> Duration {
        Duration::from_millis(self.page_ms)
    }

    pub fn toast(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            cart_ms: 500,
            search_ms: 500,
            page_ms: 500,
            toast_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub page_size: usize,
    pub favorites_key: String,
    pub data_dir: Option<PathBuf>,
    pub dataset_path: Option<PathBuf>,
    pub delays: DelayConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: Pagination::DEFAULT_PAGE_SIZE,
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
            data_dir: None,
            dataset_path: None,
            delays: DelayConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Loads `config.toml` from the resolved data directory. An explicit
    /// directory also becomes the config's `data_dir`.
    pub fn load_in(data_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::path_in(data_dir)?)?;
        if let Some(dir) = data_dir {
            config.data_dir = Some(dir.to_path_buf());
        }
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: CatalogConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn path_in(data_dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
        Ok(resolve_data_dir(data_dir)?.join(CONFIG_FILE))
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        resolve_data_dir(self.data_dir.as_deref())
    }
}
