//! Core business logic - framework-agnostic employee, permission, sales and
//! reporting operations. Nothing in here renders anything; callers format the
//! returned data themselves.

pub mod checkout;
pub mod employee;
pub mod notify;
pub mod permissions;
pub mod report;
pub mod sales;
pub mod store;

pub use checkout::{Checkout, CheckoutHooks, SaleStart};
pub use employee::{Employee, EmployeeUpdate, NewEmployee};
pub use notify::{Notifier, Severity, TracingNotifier};
pub use permissions::{Permission, Permissions, Role, derive_default_permissions};
pub use report::{EmployeePerformance, ReportSummary};
pub use sales::{SaleData, SalesFilter, SalesRecord};
pub use store::EmployeeStore;
