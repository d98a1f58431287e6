/// Database connection and table creation for the local store
pub mod database;

/// Application settings loaded from config.toml and the environment
pub mod settings;

pub use settings::{AppConfig, StoreBackend, StoreConfig, load_config};
