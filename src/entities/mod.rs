//! Entity module - Contains the SeaORM entity definitions for the database.
//! The store keeps its collections as JSON blobs, so a single key-value
//! table is all the schema there is.

pub mod kv_entry;

pub use kv_entry::{Entity as KvEntry, Model as KvEntryModel};
