//! Sales records and date-range filtering.
//!
//! A record snapshots the selling employee's id and name at the time of the
//! sale, so it stays readable after the employee is renamed. Records are
//! never edited after creation.

use crate::core::employee::Employee;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Employee filter value that disables employee filtering
pub const ALL_EMPLOYEES: &str = "all";

/// Sale payload handed over by the checkout flow. Passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleData {
    /// Receipt number printed on the ticket
    #[serde(default)]
    pub receipt_number: String,
    /// Number of items on the receipt
    #[serde(default)]
    pub item_count: u32,
    /// Amount charged
    #[serde(default)]
    pub total: f64,
    /// Amount before tax and discount
    #[serde(default)]
    pub subtotal: f64,
    /// Tax portion
    #[serde(default)]
    pub tax: f64,
    /// Discount applied
    #[serde(default)]
    pub discount: f64,
    /// How the customer paid
    #[serde(default)]
    pub payment_method: String,
}

/// A completed sale attributed to an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    /// Unique record id
    pub id: String,
    /// Id of the employee who made the sale
    pub employee_id: String,
    /// Employee name at the time of the sale
    pub employee_name: String,
    /// When the sale was recorded
    pub timestamp: DateTime<Utc>,
    /// The sale itself
    #[serde(flatten)]
    pub sale: SaleData,
}

impl SalesRecord {
    /// Stamps `sale` with the seller and time.
    #[must_use]
    pub fn new(seller: &Employee, sale: SaleData, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id: seller.id.clone(),
            employee_name: seller.name.clone(),
            timestamp,
            sale,
        }
    }
}

/// Which sales to select. Every field is optional and independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalesFilter<'a> {
    /// Only this employee's sales; `None` or `"all"` selects everyone
    pub employee_id: Option<&'a str>,
    /// First day included (from 00:00:00.000 UTC)
    pub start_date: Option<NaiveDate>,
    /// Last day included (through 23:59:59.999 UTC)
    pub end_date: Option<NaiveDate>,
}

impl SalesFilter<'_> {
    /// Whether `record` passes every set criterion.
    #[must_use]
    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(id) = self.employee_id.filter(|id| *id != ALL_EMPLOYEES) {
            if record.employee_id != id {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if record.timestamp < start_of_day(start) {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.timestamp > end_of_day(end) {
                return false;
            }
        }
        true
    }
}

/// Midnight at the start of `date`, UTC.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The last millisecond of `date`, UTC.
#[must_use]
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + TimeDelta::days(1) - TimeDelta::milliseconds(1)
}

/// Records matching `filter`, in their original order.
#[must_use]
pub fn filter_sales(records: &[SalesRecord], filter: &SalesFilter<'_>) -> Vec<SalesRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::TimeZone;

    fn record(employee_id: &str, timestamp: DateTime<Utc>) -> SalesRecord {
        SalesRecord {
            id: format!("{employee_id}-{}", timestamp.timestamp_millis()),
            employee_id: employee_id.to_string(),
            employee_name: employee_id.to_uppercase(),
            timestamp,
            sale: SaleData {
                total: 10.0,
                ..Default::default()
            },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_of_day_is_last_millisecond() {
        let end = end_of_day(date(2024, 3, 10));
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 10, 23, 59, 59)
            .unwrap()
            + TimeDelta::milliseconds(999);
        assert_eq!(end, expected);
    }

    #[test]
    fn test_end_date_boundary() {
        let last_ms = end_of_day(date(2024, 3, 10));
        let next_midnight = start_of_day(date(2024, 3, 11));
        let records = vec![record("a", last_ms), record("a", next_midnight)];

        let filter = SalesFilter {
            end_date: Some(date(2024, 3, 10)),
            ..Default::default()
        };
        let selected = filter_sales(&records, &filter);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].timestamp, last_ms);
    }

    #[test]
    fn test_start_date_includes_midnight() {
        let midnight = start_of_day(date(2024, 3, 10));
        let before = midnight - TimeDelta::milliseconds(1);
        let records = vec![record("a", before), record("a", midnight)];

        let filter = SalesFilter {
            start_date: Some(date(2024, 3, 10)),
            ..Default::default()
        };
        let selected = filter_sales(&records, &filter);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].timestamp, midnight);
    }

    #[test]
    fn test_employee_filter_and_all() {
        let t = start_of_day(date(2024, 1, 1));
        let records = vec![record("a", t), record("b", t), record("a", t)];

        let only_a = SalesFilter {
            employee_id: Some("a"),
            ..Default::default()
        };
        assert_eq!(filter_sales(&records, &only_a).len(), 2);

        let all = SalesFilter {
            employee_id: Some(ALL_EMPLOYEES),
            ..Default::default()
        };
        assert_eq!(filter_sales(&records, &all).len(), 3);
        assert_eq!(filter_sales(&records, &SalesFilter::default()).len(), 3);
    }

    #[test]
    fn test_filters_combine_and_keep_order() {
        let d1 = start_of_day(date(2024, 5, 1)) + TimeDelta::hours(9);
        let d2 = start_of_day(date(2024, 5, 2)) + TimeDelta::hours(9);
        let d3 = start_of_day(date(2024, 5, 3)) + TimeDelta::hours(9);
        let records = vec![
            record("a", d3),
            record("b", d2),
            record("a", d1),
            record("a", d2),
        ];

        let filter = SalesFilter {
            employee_id: Some("a"),
            start_date: Some(date(2024, 5, 2)),
            end_date: Some(date(2024, 5, 3)),
        };
        let selected = filter_sales(&records, &filter);
        let stamps: Vec<_> = selected.iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![d3, d2]);
    }

    #[test]
    fn test_record_serializes_flat_camel_case() {
        let mut r = record("a", start_of_day(date(2024, 1, 1)));
        r.sale.receipt_number = "R-1".to_string();
        r.sale.payment_method = "cash".to_string();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["employeeId"], "a");
        assert_eq!(json["receiptNumber"], "R-1");
        assert_eq!(json["paymentMethod"], "cash");

        let back: SalesRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
