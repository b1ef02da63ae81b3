//! Shared test utilities.
//!
//! Helpers for setting up in-memory stores and databases and creating test
//! employees and sales with sensible defaults.

use crate::{
    config::StorageKeys,
    core::{
        employee::{Employee, NewEmployee},
        permissions::{Role, derive_default_permissions},
        sales::SaleData,
        store::EmployeeStore,
    },
    errors::{Error, Result},
    storage::{KeyValueStorage, MemoryStorage},
};
use sea_orm::DatabaseConnection;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Password given to every employee made by [`create_test_employee`]
pub const TEST_PASSWORD: &str = "secret";

/// Routes tracing output to the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Opens an empty store over fresh memory storage with the default keys.
pub async fn setup_store() -> Result<EmployeeStore<MemoryStorage>> {
    init_test_tracing();
    EmployeeStore::open(MemoryStorage::new(), StorageKeys::default()).await
}

/// Creates an employee through the store.
///
/// # Defaults
/// * `name`: `"<username> (test)"`
/// * `password`: [`TEST_PASSWORD`]
pub async fn create_test_employee<S: KeyValueStorage>(
    store: &mut EmployeeStore<S>,
    username: &str,
    role: Role,
) -> Result<Employee> {
    store
        .create_employee(NewEmployee {
            name: format!("{username} (test)"),
            username: username.to_string(),
            password: TEST_PASSWORD.to_string(),
            role: Some(role),
            ..Default::default()
        })
        .await
}

/// Memory storage whose writes to one chosen key can be made to fail.
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    failing_key: Mutex<Option<String>>,
}

impl FailingStorage {
    /// Makes every later `set` or `remove` of `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        if let Ok(mut failing) = self.failing_key.lock() {
            *failing = Some(key.to_string());
        }
    }

    fn check(&self, key: &str) -> Result<()> {
        let failing = self.failing_key.lock().map_err(|_| Error::Storage {
            message: "Failed to acquire failing-key lock".to_string(),
        })?;
        if failing.as_deref() == Some(key) {
            return Err(Error::Storage {
                message: format!("Write to {key} refused"),
            });
        }
        Ok(())
    }
}

impl KeyValueStorage for FailingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check(key)?;
        self.inner.remove(key).await
    }
}

/// Opens an empty store over [`FailingStorage`] with the default keys.
pub async fn setup_failing_store() -> Result<EmployeeStore<FailingStorage>> {
    init_test_tracing();
    EmployeeStore::open(FailingStorage::default(), StorageKeys::default()).await
}

/// Builds an employee record directly, bypassing the store.
#[must_use]
pub fn test_employee(id: &str, name: &str) -> Employee {
    Employee {
        id: id.to_string(),
        employee_number: "1001".to_string(),
        name: name.to_string(),
        username: name.to_lowercase(),
        password: TEST_PASSWORD.to_string(),
        role: Role::Cashier,
        phone: String::new(),
        address: String::new(),
        notes: String::new(),
        is_active: true,
        creation_date: chrono::Utc::now(),
        permissions: derive_default_permissions(Role::Cashier),
    }
}

/// A cash sale with one item and no tax or discount.
#[must_use]
pub fn test_sale(receipt_number: &str, total: f64) -> SaleData {
    SaleData {
        receipt_number: receipt_number.to_string(),
        item_count: 1,
        total,
        subtotal: total,
        tax: 0.0,
        discount: 0.0,
        payment_method: "cash".to_string(),
    }
}
