pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, DisplayConfig, SearchConfig, StorageConfig, TmdbConfig};
pub use credentials::{CredentialStore, API_KEY_ENV};
pub use paths::PathManager;
