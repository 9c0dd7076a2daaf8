pub mod config;
pub mod interactive;
pub mod movie;
pub mod prompts;
pub mod render;
pub mod search;
pub mod watched;

use color_eyre::Result;
use popcorn_config::{Config, CredentialStore, PathManager, API_KEY_ENV};
use popcorn_core::{AppController, ControllerOptions, DisplayPolicy, LocalStore, WatchedStore};
use popcorn_sources::{MovieSource, TmdbClient};

/// Everything a command needs from disk: paths, config and display rules.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub display: DisplayPolicy,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        let display = DisplayPolicy::from_config(&config);
        Ok(Self { paths, config, display })
    }

    pub fn watched_store(&self) -> WatchedStore {
        WatchedStore::new(
            LocalStore::new(self.paths.data_dir()),
            self.config.storage.watched_key.clone(),
        )
    }

    pub fn api_key(&self) -> Result<String> {
        let credentials_file = self.paths.credentials_file();
        let mut cred_store = CredentialStore::new(credentials_file.clone());
        cred_store
            .load()
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

        cred_store.resolve_tmdb_api_key().ok_or_else(|| {
            color_eyre::eyre::eyre!(
                "No TMDB API key configured. Run 'popcorn config api-key' or set {}.",
                API_KEY_ENV
            )
        })
    }

    /// Controller wired to TMDB, with the watched list already hydrated.
    pub fn controller(&self) -> Result<AppController<TmdbClient>> {
        let client = TmdbClient::new(self.api_key()?, &self.config.tmdb);
        tracing::debug!(source = client.source_name(), api_base_url = client.api_base_url(), "Using movie source");
        Ok(AppController::new(
            client,
            self.watched_store(),
            ControllerOptions::from_config(&self.config),
        ))
    }
}
