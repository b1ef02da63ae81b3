//! Database configuration module.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. The only
//! table is the key-value table backing [`crate::storage::SqliteStorage`]; it is
//! generated from the entity definition with `Schema::create_table_from_entity`
//! so the schema always matches the Rust model.

use crate::entities::KvEntry;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/pos_staff.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the key-value table if it does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut kv_table = schema.create_table_from_entity(KvEntry);
    kv_table.if_not_exists();

    db.execute(builder.build(&kv_table)).await?;
    info!("Database tables ensured");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::KvEntryModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let rows: Vec<KvEntryModel> = KvEntry::find().limit(1).all(&db).await?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
