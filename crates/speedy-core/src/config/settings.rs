use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

impl Config {
    /// Load config from file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the overlay or the index cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.overlay.min_query_length == 0 {
            return Err(Error::Config(
                "overlay.minQueryLength must be at least 1".to_string(),
            ));
        }
        if self.overlay.toggle_shortcut.trim().is_empty() {
            return Err(Error::Config(
                "overlay.toggleShortcut must not be empty".to_string(),
            ));
        }
        if self.overlay.quit_shortcut.trim().is_empty() {
            return Err(Error::Config(
                "overlay.quitShortcut must not be empty".to_string(),
            ));
        }
        if self.index.max_results == 0 {
            return Err(Error::Config(
                "index.maxResults must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Shortcut that shows or hides the overlay, e.g. `Ctrl+Space`
    #[serde(default = "default_toggle_shortcut")]
    pub toggle_shortcut: String,

    #[serde(default = "default_quit_shortcut")]
    pub quit_shortcut: String,

    /// Quiescence window before a query is sent to the engine
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    #[serde(default = "default_min_query_length")]
    pub min_query_length: usize,

    #[serde(default = "default_true")]
    pub start_visible: bool,
}

impl OverlayConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            toggle_shortcut: default_toggle_shortcut(),
            quit_shortcut: default_quit_shortcut(),
            debounce_ms: default_debounce(),
            min_query_length: default_min_query_length(),
            start_visible: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    /// Directories to walk; a leading `~` expands to the home directory
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_true")]
    pub include_applications: bool,

    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl IndexConfig {
    /// Roots with `~` expanded. Roots that cannot be expanded are dropped.
    #[must_use]
    pub fn resolved_roots(&self) -> Vec<PathBuf> {
        self.roots.iter().filter_map(|r| expand_home(r)).collect()
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            max_depth: default_max_depth(),
            max_results: default_max_results(),
            include_applications: true,
            include_hidden: false,
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

/// Expand a leading `~` to the user's home directory.
#[must_use]
pub fn expand_home(path: &str) -> Option<PathBuf> {
    if path == "~" {
        return home_dir();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home_dir().map(|home| home.join(rest));
    }
    Some(PathBuf::from(path))
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

fn default_toggle_shortcut() -> String {
    "Ctrl+Space".to_string()
}

fn default_quit_shortcut() -> String {
    "Ctrl+C".to_string()
}

fn default_debounce() -> u64 {
    200
}

fn default_min_query_length() -> usize {
    2
}

fn default_roots() -> Vec<String> {
    vec!["~".to_string()]
}

fn default_max_depth() -> usize {
    5
}

fn default_max_results() -> usize {
    20
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_true() -> bool {
    true
}
