//! Report period model.
//!
//! This module contains the [`ReportPeriod`] type used to restrict attendance
//! queries and reports to a date window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An optional, inclusive date window.
///
/// Either bound may be left open. The default period is unbounded and
/// contains every date.
///
/// # Example
///
/// ```
/// use workflowx::models::ReportPeriod;
/// use chrono::NaiveDate;
///
/// let period = ReportPeriod {
///     start_date: Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
///     end_date: Some(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())); // start date
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap())); // end date
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap())); // after
/// assert!(ReportPeriod::default().contains_date(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First date included, or open if `None`.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last date included, or open if `None`.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ReportPeriod {
    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }

    /// Checks if a whole date range lies within this period.
    ///
    /// Used for leave requests: a request is in the period when it starts on
    /// or after the period start and ends on or before the period end.
    pub fn contains_range(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date.is_none_or(|period_start| start >= period_start)
            && self.end_date.is_none_or(|period_end| end <= period_end)
    }
}
