//! Application settings loaded from a TOML file.
//!
//! The file names the storage keys for the three persisted collections and
//! lists the accounts to seed on first run. Every section is optional; a
//! missing file yields [`AppConfig::default`], which seeds one admin account.

use crate::core::employee::NewEmployee;
use crate::core::permissions::Role;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "STAFF_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config file
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key names for the persisted collections
    pub storage: StorageKeys,
    /// Accounts created when the employee collection is empty
    pub seed_employees: Vec<SeedEmployee>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            seed_employees: vec![SeedEmployee::default_admin()],
        }
    }
}

/// Key names under which the store persists its three collections
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// Ordered employee collection
    pub employees_key: String,
    /// Current session (single employee, absent when logged out)
    pub session_key: String,
    /// Ordered sales records
    pub sales_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            employees_key: "pos_employees".to_string(),
            session_key: "pos_current_employee".to_string(),
            sales_key: "pos_sales_records".to_string(),
        }
    }
}

/// A single account to seed
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEmployee {
    /// Display name
    pub name: String,
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Role; defaults to cashier like any new account
    #[serde(default)]
    pub role: Option<Role>,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Postal address
    #[serde(default)]
    pub address: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
}

impl SeedEmployee {
    /// The account seeded when no config file is present.
    #[must_use]
    pub fn default_admin() -> Self {
        Self {
            name: "Administrator".to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            role: Some(Role::Admin),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
        }
    }
}

impl From<&SeedEmployee> for NewEmployee {
    fn from(seed: &SeedEmployee) -> Self {
        Self {
            name: seed.name.clone(),
            username: seed.username.clone(),
            password: seed.password.clone(),
            role: seed.role,
            phone: seed.phone.clone(),
            address: seed.address.clone(),
            notes: seed.notes.clone(),
        }
    }
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A seed entry lacks a required field
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {}: {e}", path_ref.display()),
    })
}

/// Loads the configuration from `$STAFF_CONFIG` or `./config.toml`.
///
/// A missing file is not an error; the defaults are used instead.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        let config = load_config(&path)?;
        info!(
            "Loaded configuration from {} ({} seed accounts)",
            path,
            config.seed_employees.len()
        );
        Ok(config)
    } else {
        info!("No configuration file at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}
