/// Database configuration and connection management
pub mod database;

/// Storage keys and seed accounts from the TOML config file
pub mod settings;

pub use settings::{AppConfig, SeedEmployee, StorageKeys, load_app_configuration, load_config};
