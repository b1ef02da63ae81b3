//! The employee and sales store.
//!
//! Holds the employee roster, the current session and the sales history in
//! memory and mirrors each collection to a [`KeyValueStorage`] as a JSON blob
//! right after every mutation. Construct it once at startup with
//! [`EmployeeStore::open`] and pass it to whatever needs it.
//!
//! Rejections (duplicate username, unknown id, no session) return an error
//! before anything is mutated. A failed storage write rolls the in-memory
//! change back, so memory never runs ahead of what was persisted. Failed logins are not errors: `authenticate`
//! returns `Ok(None)` whatever the reason.

use crate::{
    config::{SeedEmployee, StorageKeys},
    core::{
        employee::{Employee, EmployeeUpdate, NewEmployee, next_employee_number},
        permissions::derive_default_permissions,
        report::{EmployeePerformance, aggregate_performance},
        sales::{SaleData, SalesFilter, SalesRecord, filter_sales},
    },
    errors::{Error, Result},
    storage::KeyValueStorage,
};
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, warn};

/// Employee roster, session and sales history over a key-value backend.
#[derive(Debug)]
pub struct EmployeeStore<S> {
    storage: S,
    keys: StorageKeys,
    employees: Vec<Employee>,
    current: Option<Employee>,
    sales: Vec<SalesRecord>,
}

impl<S: KeyValueStorage> EmployeeStore<S> {
    /// Loads the three collections from `storage`. Missing keys start empty.
    ///
    /// # Errors
    /// Fails if the backend fails or a stored blob is not valid JSON for its
    /// collection.
    #[instrument(skip(storage))]
    pub async fn open(storage: S, keys: StorageKeys) -> Result<Self> {
        let employees = load_json::<_, Vec<Employee>>(&storage, &keys.employees_key)
            .await?
            .unwrap_or_default();
        let current = load_json::<_, Option<Employee>>(&storage, &keys.session_key)
            .await?
            .flatten();
        let sales = load_json::<_, Vec<SalesRecord>>(&storage, &keys.sales_key)
            .await?
            .unwrap_or_default();

        info!(
            "Store opened: {} employees, {} sales records, session: {}",
            employees.len(),
            sales.len(),
            current.as_ref().map_or("none", |e| e.username.as_str())
        );

        Ok(Self {
            storage,
            keys,
            employees,
            current,
            sales,
        })
    }

    /// Creates the given accounts if, and only if, there are no employees yet.
    /// Returns how many were created.
    pub async fn seed_if_empty(&mut self, seeds: &[SeedEmployee]) -> Result<usize> {
        if !self.employees.is_empty() {
            debug!("Roster not empty, skipping seed");
            return Ok(0);
        }
        for seed in seeds {
            self.create_employee(NewEmployee::from(seed)).await?;
        }
        info!("Seeded {} employee account(s)", seeds.len());
        Ok(seeds.len())
    }

    /// Adds an employee with a fresh id and number, active, with permissions
    /// derived from its role (cashier when unset).
    ///
    /// # Errors
    /// `Validation` for a blank username or when employee numbers are
    /// exhausted, `DuplicateUsername` if the username is taken. Nothing is
    /// stored in any of these cases.
    #[instrument(skip(self, new), fields(username = %new.username))]
    pub async fn create_employee(&mut self, new: NewEmployee) -> Result<Employee> {
        if new.username.trim().is_empty() {
            return Err(Error::Validation {
                message: "Username cannot be empty".to_string(),
            });
        }
        if self.username_taken(&new.username, None) {
            warn!("Rejected duplicate username {}", new.username);
            return Err(Error::DuplicateUsername {
                username: new.username,
            });
        }

        let role = new.role.unwrap_or_default();
        let employee = Employee {
            id: uuid::Uuid::new_v4().to_string(),
            employee_number: next_employee_number(&self.employees)?,
            name: new.name,
            username: new.username,
            password: new.password,
            role,
            phone: new.phone,
            address: new.address,
            notes: new.notes,
            is_active: true,
            creation_date: now(),
            permissions: derive_default_permissions(role),
        };

        self.employees.push(employee.clone());
        if let Err(e) = self.persist_employees().await {
            self.employees.pop();
            return Err(e);
        }
        info!(
            "Created employee {} ({}) as {}",
            employee.employee_number, employee.username, employee.role
        );
        Ok(employee)
    }

    /// Applies a partial update and re-derives permissions from the role.
    ///
    /// If the employee holds the session, the session copy is refreshed; if the
    /// update deactivates them, the session is cleared.
    ///
    /// # Errors
    /// `EmployeeNotFound` for an unknown id, `Validation` for a blank new
    /// username, `DuplicateUsername` if a changed username collides.
    #[instrument(skip(self, update))]
    pub async fn update_employee(&mut self, id: &str, update: EmployeeUpdate) -> Result<Employee> {
        let idx = self.index_of(id)?;

        if let Some(username) = &update.username {
            if username.trim().is_empty() {
                return Err(Error::Validation {
                    message: "Username cannot be empty".to_string(),
                });
            }
            if *username != self.employees[idx].username && self.username_taken(username, Some(id))
            {
                warn!("Rejected rename of {} to taken username {}", id, username);
                return Err(Error::DuplicateUsername {
                    username: username.clone(),
                });
            }
        }

        let previous = self.employees[idx].clone();
        self.employees[idx].apply_update(update);
        let updated = self.employees[idx].clone();
        if let Err(e) = self.persist_employees().await {
            self.employees[idx] = previous;
            return Err(e);
        }
        info!("Updated employee {} ({})", updated.employee_number, updated.username);

        self.sync_session_with(&updated).await?;
        Ok(updated)
    }

    /// Flips the active flag. Deactivating the logged-in employee logs them out.
    /// Returns the new flag.
    ///
    /// # Errors
    /// `EmployeeNotFound` for an unknown id.
    #[instrument(skip(self))]
    pub async fn toggle_employee_status(&mut self, id: &str) -> Result<bool> {
        let idx = self.index_of(id)?;
        let employee = &mut self.employees[idx];
        employee.is_active = !employee.is_active;
        let updated = employee.clone();
        if let Err(e) = self.persist_employees().await {
            self.employees[idx].is_active = !updated.is_active;
            return Err(e);
        }
        info!(
            "Employee {} is now {}",
            updated.username,
            if updated.is_active { "active" } else { "inactive" }
        );

        self.sync_session_with(&updated).await?;
        Ok(updated.is_active)
    }

    /// Logs in an active employee whose username and password match exactly.
    ///
    /// Returns `Ok(None)` for unknown users, wrong passwords and inactive
    /// accounts alike; the previous session is left untouched in that case.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<Option<Employee>> {
        let Some(employee) = self
            .employees
            .iter()
            .find(|e| e.accepts_login(username, password))
            .cloned()
        else {
            warn!("Failed login for {}", username);
            return Ok(None);
        };

        self.persist_session(Some(&employee)).await?;
        self.current = Some(employee.clone());
        info!("{} logged in", employee.username);
        Ok(Some(employee))
    }

    /// Ends the session, if any. Safe to call repeatedly.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<()> {
        self.persist_session(None).await?;
        if let Some(previous) = self.current.take() {
            info!("{} logged out", previous.username);
        }
        Ok(())
    }

    /// Records a sale under the logged-in employee.
    ///
    /// # Errors
    /// `NotLoggedIn` when there is no session.
    #[instrument(skip(self, sale), fields(receipt = %sale.receipt_number))]
    pub async fn record_sale(&mut self, sale: SaleData) -> Result<SalesRecord> {
        let Some(seller) = &self.current else {
            warn!("Rejected sale without a logged-in employee");
            return Err(Error::NotLoggedIn);
        };

        let record = SalesRecord::new(seller, sale, now());
        self.sales.push(record.clone());
        if let Err(e) = self.persist_sales().await {
            self.sales.pop();
            return Err(e);
        }
        info!(
            "Recorded sale {} for {} ({:.2})",
            record.sale.receipt_number, record.employee_name, record.sale.total
        );
        Ok(record)
    }

    /// Employees matching `search_term` in roster order; everyone when empty.
    #[must_use]
    pub fn query_employees(&self, search_term: &str) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|e| e.matches_search(search_term))
            .collect()
    }

    /// Sales matching `filter`, in recording order.
    #[must_use]
    pub fn get_sales(&self, filter: &SalesFilter<'_>) -> Vec<SalesRecord> {
        filter_sales(&self.sales, filter)
    }

    /// Per-employee sales totals for the date range, in order of each
    /// employee's first sale.
    #[must_use]
    pub fn performance_report(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Vec<EmployeePerformance> {
        let sales = self.get_sales(&SalesFilter {
            employee_id: None,
            start_date,
            end_date,
        });
        aggregate_performance(&sales, &self.employees)
    }

    /// Whether the logged-in employee has `permission`. False when logged out.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|e| e.has_permission(permission))
    }

    /// All employees in roster order.
    #[must_use]
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Employee by id.
    #[must_use]
    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// The session holder, as of login or their last update.
    #[must_use]
    pub const fn current_employee(&self) -> Option<&Employee> {
        self.current.as_ref()
    }

    /// Whether someone is logged in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    /// Every sales record in recording order.
    #[must_use]
    pub fn sales(&self) -> &[SalesRecord] {
        &self.sales
    }

    /// The backend this store writes to.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.employees
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| Error::EmployeeNotFound { id: id.to_string() })
    }

    fn username_taken(&self, username: &str, except_id: Option<&str>) -> bool {
        self.employees
            .iter()
            .any(|e| e.username == username && Some(e.id.as_str()) != except_id)
    }

    /// Consumes the store, handing back its backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Refreshes or clears the session after `employee` changed.
    ///
    /// Runs after the roster write has succeeded; the in-memory session follows
    /// the committed roster even if the session write itself fails.
    async fn sync_session_with(&mut self, employee: &Employee) -> Result<()> {
        if self.current.as_ref().is_none_or(|c| c.id != employee.id) {
            return Ok(());
        }
        if employee.is_active {
            self.current = Some(employee.clone());
        } else {
            info!("{} deactivated, ending their session", employee.username);
            self.current = None;
        }
        self.persist_session(self.current.as_ref()).await
    }

    async fn persist_employees(&self) -> Result<()> {
        store_json(&self.storage, &self.keys.employees_key, &self.employees).await
    }

    async fn persist_session(&self, session: Option<&Employee>) -> Result<()> {
        match session {
            Some(employee) => store_json(&self.storage, &self.keys.session_key, employee).await,
            None => {
                debug!("Clearing session key {}", self.keys.session_key);
                self.storage.remove(&self.keys.session_key).await
            }
        }
    }

    async fn persist_sales(&self) -> Result<()> {
        store_json(&self.storage, &self.keys.sales_key, &self.sales).await
    }
}

/// Current time at millisecond precision, the resolution records are kept at.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

async fn load_json<S, T>(storage: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStorage,
    T: DeserializeOwned,
{
    match storage.get(key).await? {
        Some(raw) => {
            debug!("Loaded {} ({} bytes)", key, raw.len());
            Ok(Some(serde_json::from_str(&raw)?))
        }
        None => Ok(None),
    }
}

async fn store_json<S, T>(storage: &S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStorage,
    T: Serialize + ?Sized + Sync,
{
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw).await
}
