//! Employee records and the pure rules around them.
//!
//! Numbering, search matching and partial updates live here so the store can
//! stay a thin layer of validation and persistence on top.

use crate::core::permissions::{Permissions, Role, derive_default_permissions};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

/// Employee numbers start above this value
pub const EMPLOYEE_NUMBER_FLOOR: u64 = 1000;

/// A stored employee account.
///
/// Serialized with camelCase field names; this is the persisted format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Opaque unique id, immutable
    pub id: String,
    /// Sequential display number, unique and never reused
    pub employee_number: String,
    /// Display name
    pub name: String,
    /// Login name, unique across all employees
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Role the permissions are derived from
    #[serde(default)]
    pub role: Role,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Postal address
    #[serde(default)]
    pub address: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Inactive employees cannot log in
    pub is_active: bool,
    /// Set once at creation
    pub creation_date: DateTime<Utc>,
    /// Always `derive_default_permissions(role)`
    #[serde(default)]
    pub permissions: Permissions,
}

impl Employee {
    /// Case-insensitive substring match on name or username, plain substring
    /// match on employee number or phone. An empty term matches everything.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.username.to_lowercase().contains(&needle)
            || self.employee_number.contains(term)
            || self.phone.contains(term)
    }

    /// Checks credentials against this account. Inactive accounts never match.
    #[must_use]
    pub fn accepts_login(&self, username: &str, password: &str) -> bool {
        self.is_active && self.username == username && self.password == password
    }

    /// Whether the employee's permission set grants `name`.
    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.allows(name)
    }

    /// Applies a partial update, then re-derives permissions from the role
    /// whether or not the role changed.
    pub fn apply_update(&mut self, update: EmployeeUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(username) = update.username {
            self.username = username;
        }
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            self.password = password;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.permissions = derive_default_permissions(self.role);
    }
}

/// Input for creating an employee.
#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    /// Display name
    pub name: String,
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Defaults to [`Role::Cashier`]
    pub role: Option<Role>,
    /// Contact phone
    pub phone: String,
    /// Postal address
    pub address: String,
    /// Free-form notes
    pub notes: String,
}

/// Partial update; `None` keeps the stored value.
///
/// An empty `password` is treated like `None`.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    /// New display name
    pub name: Option<String>,
    /// New login name
    pub username: Option<String>,
    /// New password, ignored when empty
    pub password: Option<String>,
    /// New role
    pub role: Option<Role>,
    /// New phone
    pub phone: Option<String>,
    /// New address
    pub address: Option<String>,
    /// New notes
    pub notes: Option<String>,
    /// New active flag
    pub is_active: Option<bool>,
}

/// Next employee number: one more than the largest numeric employee number
/// on record, never below `EMPLOYEE_NUMBER_FLOOR + 1`. Non-numeric numbers
/// are ignored.
///
/// # Errors
/// `Validation` when a stored number does not fit in a `u64` or the next
/// number would overflow; no fresh number can then exceed every existing one.
pub fn next_employee_number(employees: &[Employee]) -> Result<String> {
    let mut max = EMPLOYEE_NUMBER_FLOOR;
    for employee in employees {
        match employee.employee_number.trim().parse::<u64>() {
            Ok(n) => max = max.max(n),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => {
                return Err(numbers_exhausted(&employee.employee_number));
            }
            Err(_) => {}
        }
    }
    max.checked_add(1)
        .map(|n| n.to_string())
        .ok_or_else(|| numbers_exhausted(&max.to_string()))
}

fn numbers_exhausted(largest: &str) -> Error {
    Error::Validation {
        message: format!("No employee number left above {largest}"),
    }
}
