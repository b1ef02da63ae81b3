//! Sales performance reporting.
//!
//! Aggregates sales records per employee and returns structured rows that a
//! presentation layer (table, chart, export) can render. Sales whose employee
//! no longer exists are kept under a placeholder row rather than dropped.

use crate::core::{employee::Employee, permissions::Role, sales::SalesRecord};
use serde::Serialize;

/// Name shown for sales whose employee record is missing
pub const UNKNOWN_EMPLOYEE_NAME: &str = "unknown employee";

/// Aggregated sales for one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePerformance {
    /// Employee id the sales were recorded under
    pub employee_id: String,
    /// Current employee name, or the placeholder
    pub employee_name: String,
    /// Employee number, `None` for the placeholder
    pub employee_number: Option<String>,
    /// Current role, [`Role::Unspecified`] for the placeholder
    pub role: Role,
    /// Sum of sale totals
    pub total_sales: f64,
    /// Number of receipts
    pub receipt_count: usize,
    /// `total_sales / receipt_count`, 0 when there are no receipts
    pub average_receipt: f64,
}

impl EmployeePerformance {
    fn empty_for(employee_id: &str, employees: &[Employee]) -> Self {
        let (employee_name, employee_number, role) =
            match employees.iter().find(|e| e.id == employee_id) {
                Some(e) => (e.name.clone(), Some(e.employee_number.clone()), e.role),
                None => (UNKNOWN_EMPLOYEE_NAME.to_string(), None, Role::Unspecified),
            };
        Self {
            employee_id: employee_id.to_string(),
            employee_name,
            employee_number,
            role,
            total_sales: 0.0,
            receipt_count: 0,
            average_receipt: 0.0,
        }
    }
}

/// Totals across every row of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Number of employees with at least one sale
    pub employee_count: usize,
    /// Sum of all sale totals
    pub total_sales: f64,
    /// Number of receipts
    pub receipt_count: usize,
    /// Average over all receipts, 0 when there are none
    pub average_receipt: f64,
}

/// Groups `sales` by employee id, in order of first appearance.
///
/// Employee details come from `employees`; ids with no matching employee get
/// a placeholder named [`UNKNOWN_EMPLOYEE_NAME`] with role
/// [`Role::Unspecified`].
#[must_use]
pub fn aggregate_performance(
    sales: &[SalesRecord],
    employees: &[Employee],
) -> Vec<EmployeePerformance> {
    let mut rows: Vec<EmployeePerformance> = Vec::new();

    for record in sales {
        let idx = match rows.iter().position(|r| r.employee_id == record.employee_id) {
            Some(idx) => idx,
            None => {
                rows.push(EmployeePerformance::empty_for(&record.employee_id, employees));
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        row.total_sales += record.sale.total;
        row.receipt_count += 1;
    }

    for row in &mut rows {
        row.average_receipt = average(row.total_sales, row.receipt_count);
    }
    rows
}

/// Copy of `report` ordered by ascending total sales, as a bar chart draws it.
#[must_use]
pub fn sorted_by_total_sales(report: &[EmployeePerformance]) -> Vec<EmployeePerformance> {
    let mut sorted = report.to_vec();
    sorted.sort_by(|a, b| a.total_sales.total_cmp(&b.total_sales));
    sorted
}

/// Grand totals for a report.
#[must_use]
pub fn summarize(report: &[EmployeePerformance]) -> ReportSummary {
    let total_sales: f64 = report.iter().map(|r| r.total_sales).sum();
    let receipt_count: usize = report.iter().map(|r| r.receipt_count).sum();
    ReportSummary {
        employee_count: report.len(),
        total_sales,
        receipt_count,
        average_receipt: average(total_sales, receipt_count),
    }
}

/// Formats an amount with two decimals, e.g. `"$1234.50"`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    // Receipt counts stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let count = count as f64;
    total / count
}
