//! Roles and the permission flags derived from them.
//!
//! Permissions are never edited directly: every create or update of an
//! employee rebuilds the full flag set from its role with
//! [`derive_default_permissions`], so the two cannot drift apart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Employee role. Unknown role strings read back from storage become
/// [`Role::Unspecified`], which grants nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can ring up sales
    #[default]
    Cashier,
    /// Floor supervisor
    Supervisor,
    /// Store manager
    Manager,
    /// Full access
    Admin,
    /// No recognised role
    #[serde(other)]
    Unspecified,
}

impl Role {
    /// Lowercase name as stored
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cashier => "cashier",
            Self::Supervisor => "supervisor",
            Self::Manager => "manager",
            Self::Admin => "admin",
            Self::Unspecified => "unspecified",
        }
    }

    /// Permissions this role grants
    #[must_use]
    pub const fn grants(self) -> &'static [Permission] {
        use Permission::{
            ApplyDiscount, CancelOrder, ManageEmployees, ManageInventory, ManageProducts,
            Reports, Sell, Settings,
        };
        match self {
            Self::Admin => &[
                Sell,
                ApplyDiscount,
                CancelOrder,
                ManageProducts,
                ManageInventory,
                Reports,
                ManageEmployees,
                Settings,
            ],
            Self::Manager => &[
                Sell,
                ApplyDiscount,
                CancelOrder,
                ManageProducts,
                ManageInventory,
                Reports,
                ManageEmployees,
            ],
            Self::Supervisor => &[Sell, ApplyDiscount, CancelOrder, ManageInventory, Reports],
            Self::Cashier => &[Sell],
            Self::Unspecified => &[],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "cashier" => Self::Cashier,
            "supervisor" => Self::Supervisor,
            "manager" => Self::Manager,
            "admin" => Self::Admin,
            _ => Self::Unspecified,
        })
    }
}

/// A named capability gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    /// Ring up sales
    Sell,
    /// Apply discounts to an order
    ApplyDiscount,
    /// Cancel an order
    CancelOrder,
    /// Create and edit products
    ManageProducts,
    /// Adjust stock
    ManageInventory,
    /// View sales reports
    Reports,
    /// Manage employee accounts
    ManageEmployees,
    /// Change application settings
    Settings,
}

impl Permission {
    /// Every permission, in display order
    pub const ALL: [Self; 8] = [
        Self::Sell,
        Self::ApplyDiscount,
        Self::CancelOrder,
        Self::ManageProducts,
        Self::ManageInventory,
        Self::Reports,
        Self::ManageEmployees,
        Self::Settings,
    ];

    /// Stored flag name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::ApplyDiscount => "apply_discount",
            Self::CancelOrder => "cancel_order",
            Self::ManageProducts => "manage_products",
            Self::ManageInventory => "manage_inventory",
            Self::Reports => "reports",
            Self::ManageEmployees => "manage_employees",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping of permission name to granted flag, persisted as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeMap<String, bool>);

impl Permissions {
    /// True only when `name` is present and set to `true`.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    /// Iterates over `(name, granted)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, granted)| (name.as_str(), *granted))
    }

    /// Names of the granted permissions.
    #[must_use]
    pub fn granted(&self) -> Vec<&str> {
        self.iter()
            .filter_map(|(name, granted)| granted.then_some(name))
            .collect()
    }
}

/// Builds the complete flag set for `role`: all eight permissions present,
/// `true` exactly for those the role grants.
#[must_use]
pub fn derive_default_permissions(role: Role) -> Permissions {
    let granted = role.grants();
    Permissions(
        Permission::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), granted.contains(p)))
            .collect(),
    )
}
