//! Key-value entry entity - Durable mirror of the store's collections.
//!
//! Each row holds one JSON blob (employees, current session, sales records)
//! under a fixed key. Writes replace the whole value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kv_entries")]
pub struct Model {
    /// Storage key (e.g. `"pos_employees"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Serialized value
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this entry was last written
    pub updated_at: DateTimeUtc,
}

/// `KvEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
