//! Unified error type for the staff store.
//!
//! Domain rejections (duplicate username, unknown id, no session) are plain
//! variants so callers can tell them apart from storage faults. Nothing in
//! here is fatal to the store; a rejected operation leaves state untouched.

use thiserror::Error;

/// Errors produced by the store, its storage backends and configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Another employee already uses this username
    #[error("Username already exists: {username}")]
    DuplicateUsername {
        /// The colliding username
        username: String,
    },

    /// No employee with this id
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The id that was looked up
        id: String,
    },

    /// The operation requires a logged-in employee
    #[error("No employee is logged in")]
    NotLoggedIn,

    /// Input rejected before any mutation
    #[error("Validation error: {message}")]
    Validation {
        /// Why the input was rejected
        message: String,
    },

    /// Key-value backend failure that is not a database error
    #[error("Storage error: {message}")]
    Storage {
        /// Backend specific description
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A persisted collection could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
