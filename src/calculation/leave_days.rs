//! Leave day counting.
//!
//! Leave ranges are inclusive of both endpoints: a Monday-to-Friday request
//! is five days, and a single-day request (start == end) is one.

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};
use crate::models::{LeaveRequest, LeaveStatus};

/// Returns the inclusive number of days between `start` and `end`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidRange`] when `end` is before `start`. The
/// dates are never swapped or clamped.
///
/// # Examples
///
/// ```
/// use workflowx::calculation::leave_days;
/// use chrono::NaiveDate;
///
/// let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let friday = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
///
/// assert_eq!(leave_days(monday, friday).unwrap(), 5);
/// assert_eq!(leave_days(monday, monday).unwrap(), 1);
/// assert!(leave_days(friday, monday).is_err());
/// ```
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> EngineResult<i64> {
    if end < start {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok((end - start).num_days() + 1)
}

/// Sums the day counts of approved requests. Pending and rejected requests
/// contribute nothing.
pub fn total_approved_leave_days<'a, I>(requests: I) -> EngineResult<i64>
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    requests
        .into_iter()
        .filter(|request| request.status == LeaveStatus::Approved)
        .map(LeaveRequest::days)
        .sum()
}
