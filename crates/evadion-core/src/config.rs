//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use evadion_navigation::{HistoryLimits, InputClassifier, DEFAULT_HOME_URL, DEFAULT_SEARCH_TEMPLATE};
use evadion_proxy::ProxyConfig;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file backing tabs, bookmarks and history; `None` keeps
    /// everything in memory
    pub storage_path: Option<PathBuf>,
    /// Search engine URL template (%s replaced with query)
    pub search_engine: String,
    /// Target for empty address input and new tabs
    pub home_url: String,
    pub history: HistoryLimits,
    pub proxy: ProxyConfig,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            storage_path: Some(data_dir.join("evadion.db")),
            ..Self::in_memory()
        }
    }

    /// Configuration that persists nothing across runs
    pub fn in_memory() -> Self {
        Self {
            storage_path: None,
            search_engine: DEFAULT_SEARCH_TEMPLATE.to_string(),
            home_url: DEFAULT_HOME_URL.to_string(),
            history: HistoryLimits::default(),
            proxy: ProxyConfig::default(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Evadion"))
            .unwrap_or_else(|| PathBuf::from(".evadion"))
    }

    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.search_engine.contains("%s") {
            return Err(CoreError::Config(
                "search_engine must contain a %s placeholder".to_string(),
            ));
        }
        if self.history.max_entries == 0 {
            return Err(CoreError::Config(
                "history.max_entries must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn classifier(&self) -> InputClassifier {
        InputClassifier::with_search_engine(self.search_engine.clone(), self.home_url.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
