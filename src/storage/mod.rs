//! Durable key-value storage behind the staff store.
//!
//! The store never talks to a database directly; it reads and writes whole
//! JSON blobs through [`KeyValueStorage`]. Two backends ship with the crate:
//! [`MemoryStorage`] for tests and embedding, and [`SqliteStorage`] which
//! mirrors the blobs into a `SQLite` table via `SeaORM`.

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::errors::Result;
use std::future::Future;

/// A string-keyed store of string values.
///
/// `set` replaces the previous value wholesale; there is no partial update.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value stored under `key`, or `None` if the key was never set
    /// or has been removed.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}
