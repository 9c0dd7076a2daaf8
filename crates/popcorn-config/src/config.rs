use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Remote movie database endpoints. The API key is kept in the credential
/// store, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default)]
    pub include_adult: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Pause after the last query change before the request goes out
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Key of the watched list in the local store
    #[serde(default = "default_watched_key")]
    pub watched_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
    #[serde(default = "default_overview_max_chars")]
    pub overview_max_chars: usize,
    /// At or above this width the result list is always shown
    #[serde(default = "default_wide_viewport_min_width")]
    pub wide_viewport_min_width: u32,
    /// Width the terminal front end reports as its viewport
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
}

fn default_api_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_watched_key() -> String {
    "watchedMovies".to_string()
}

fn default_title_max_chars() -> usize {
    20
}

fn default_overview_max_chars() -> usize {
    300
}

fn default_wide_viewport_min_width() -> u32 {
    751
}

fn default_viewport_width() -> u32 {
    1024
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            include_adult: false,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms() }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { watched_key: default_watched_key() }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title_max_chars: default_title_max_chars(),
            overview_max_chars: default_overview_max_chars(),
            wide_viewport_min_width: default_wide_viewport_min_width(),
            viewport_width: default_viewport_width(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tmdb.api_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.api_base_url cannot be empty"));
        }
        if self.tmdb.image_base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.image_base_url cannot be empty"));
        }
        if self.storage.watched_key.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.watched_key cannot be empty"));
        }
        // The key becomes a file name in the data directory
        if self.storage.watched_key.contains(['/', '\\']) {
            return Err(anyhow::anyhow!(
                "storage.watched_key must not contain path separators: {}",
                self.storage.watched_key
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.search.debounce_ms = 250;
        config.tmdb.api_base_url = "http://localhost:8080/3".to_string();

        config.save_to_file(file.path()).unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.search.debounce_ms, 250);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[search]\ndebounce_ms = 100\n").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.search.debounce_ms, 100);
        assert_eq!(config.tmdb.api_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.storage.watched_key, "watchedMovies");
        assert_eq!(config.display.title_max_chars, 20);
        assert_eq!(config.display.overview_max_chars, 300);
        assert_eq!(config.display.wide_viewport_min_width, 751);
        assert!(!config.tmdb.include_adult);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.storage.watched_key = "../escape".to_string();
        assert!(config.validate().is_err());

        config.storage.watched_key = "watchedMovies".to_string();
        config.tmdb.api_base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
