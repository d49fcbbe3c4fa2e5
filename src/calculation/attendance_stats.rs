//! Attendance percentage calculation.
//!
//! This module turns a set of [`AttendanceRecord`]s into an attendance
//! percentage and a per-status breakdown. It never queries storage: callers
//! pass in records already filtered by employee, department and period.

use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus};

/// Decimal places attendance percentages are rounded to.
pub const ATTENDANCE_PERCENTAGE_DP: u32 = 1;

/// Computes `round(present / total * 100, 1)`.
///
/// A `total` of zero yields `0.0`. Ties round to even. The result always
/// carries exactly one decimal place, so it renders as `50.0` rather than
/// `50`.
///
/// # Examples
///
/// ```
/// use workflowx::calculation::percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(percentage(2, 4).to_string(), "50.0");
/// assert_eq!(percentage(1, 3).to_string(), "33.3");
/// assert_eq!(percentage(0, 0), Decimal::ZERO);
/// ```
pub fn percentage(present: usize, total: usize) -> Decimal {
    let mut result = if total == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(present) * Decimal::ONE_HUNDRED / Decimal::from(total))
            .round_dp_with_strategy(ATTENDANCE_PERCENTAGE_DP, RoundingStrategy::MidpointNearestEven)
    };
    result.rescale(ATTENDANCE_PERCENTAGE_DP);
    result
}

/// Attendance percentage over a record set.
///
/// Only [`AttendanceStatus::Present`] counts toward the numerator; `Absent`
/// and `Late` count toward the total only.
///
/// # Examples
///
/// ```
/// use workflowx::calculation::attendance_percentage;
/// use workflowx::models::{AttendanceRecord, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
/// let records = vec![
///     AttendanceRecord::new(1, day(3), AttendanceStatus::Present),
///     AttendanceRecord::new(1, day(4), AttendanceStatus::Present),
///     AttendanceRecord::new(1, day(5), AttendanceStatus::Absent),
///     AttendanceRecord::new(1, day(6), AttendanceStatus::Late),
/// ];
/// assert_eq!(attendance_percentage(&records).to_string(), "50.0");
/// ```
pub fn attendance_percentage(records: &[AttendanceRecord]) -> Decimal {
    summarize_attendance(records).attendance_percentage
}

/// Counts per status plus the derived percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Number of records considered.
    pub total_days: usize,
    /// Records with status Present.
    pub present_days: usize,
    /// Records with status Absent.
    pub absent_days: usize,
    /// Records with status Late.
    pub late_days: usize,
    /// `round(present_days / total_days * 100, 1)`, or `0.0` with no records.
    pub attendance_percentage: Decimal,
}

impl Default for AttendanceSummary {
    fn default() -> Self {
        Self {
            total_days: 0,
            present_days: 0,
            absent_days: 0,
            late_days: 0,
            attendance_percentage: percentage(0, 0),
        }
    }
}

/// Builds an [`AttendanceSummary`] from any iterator of records.
pub fn summarize_attendance<'a, I>(records: I) -> AttendanceSummary
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut summary = AttendanceSummary::default();
    for record in records {
        summary.total_days += 1;
        match record.status {
            AttendanceStatus::Present => summary.present_days += 1,
            AttendanceStatus::Absent => summary.absent_days += 1,
            AttendanceStatus::Late => summary.late_days += 1,
        }
    }
    summary.attendance_percentage = percentage(summary.present_days, summary.total_days);
    summary
}

/// Department attendance: the same formula over the union of every member's
/// records.
///
/// Records are counted individually, so an employee with more recorded days
/// weighs more than one with fewer. Records of non-members are ignored.
pub fn department_attendance(
    records: &[AttendanceRecord],
    member_ids: &HashSet<u64>,
) -> AttendanceSummary {
    summarize_attendance(
        records
            .iter()
            .filter(|record| member_ids.contains(&record.employee_id)),
    )
}
