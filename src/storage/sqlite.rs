use super::KeyValueStorage;
use crate::entities::{KvEntry, kv_entry};
use crate::errors::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tracing::{debug, instrument};

/// Storage that persists each key as a row of the `kv_entries` table.
///
/// The table must exist; see [`crate::config::database::create_tables`].
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: DatabaseConnection,
}

impl SqliteStorage {
    /// Wraps an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl KeyValueStorage for SqliteStorage {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = KvEntry::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(entry.map(|e| e.value))
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = kv_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(chrono::Utc::now()),
        };

        KvEntry::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        debug!("Stored value under {}", key);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<()> {
        let result = KvEntry::delete_by_id(key.to_string()).exec(&self.db).await?;
        debug!("Removed {} row(s) for {}", result.rows_affected, key);
        Ok(())
    }
}
