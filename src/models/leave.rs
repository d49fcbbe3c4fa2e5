//! Leave requests and their approval state machine.
//!
//! A request starts as [`LeaveStatus::Pending`] and moves exactly once, to
//! either [`LeaveStatus::Approved`] or [`LeaveStatus::Rejected`]. Both are
//! terminal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calculation::leave_days;
use crate::error::{EngineError, EngineResult};

/// Approval status of a leave request.
///
/// Serialised by its capitalised name, the same text
/// [`Display`](std::fmt::Display) writes and error messages show. The
/// `?status=` filter takes the same spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    /// Awaiting a decision. The initial state.
    Pending,
    /// Approved. Terminal.
    Approved,
    /// Rejected. Terminal.
    Rejected,
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "Pending"),
            LeaveStatus::Approved => write!(f, "Approved"),
            LeaveStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A reviewer's decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveDecision {
    /// Move the request to [`LeaveStatus::Approved`].
    Approve,
    /// Move the request to [`LeaveStatus::Rejected`].
    Reject,
}

impl LeaveDecision {
    /// The status this decision leads to.
    pub fn target(self) -> LeaveStatus {
        match self {
            LeaveDecision::Approve => LeaveStatus::Approved,
            LeaveDecision::Reject => LeaveStatus::Rejected,
        }
    }
}

impl LeaveStatus {
    /// Returns true for states no transition leaves.
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// Computes the status that results from applying `decision`.
    ///
    /// Only [`LeaveStatus::Pending`] accepts a decision; every other state
    /// fails with [`EngineError::InvalidTransition`].
    ///
    /// # Examples
    ///
    /// ```
    /// use workflowx::models::{LeaveDecision, LeaveStatus};
    ///
    /// let approved = LeaveStatus::Pending.apply(LeaveDecision::Approve).unwrap();
    /// assert_eq!(approved, LeaveStatus::Approved);
    ///
    /// assert!(approved.apply(LeaveDecision::Reject).is_err());
    /// ```
    pub fn apply(self, decision: LeaveDecision) -> EngineResult<LeaveStatus> {
        match self {
            LeaveStatus::Pending => Ok(decision.target()),
            LeaveStatus::Approved | LeaveStatus::Rejected => Err(EngineError::InvalidTransition {
                from: self,
                to: decision.target(),
            }),
        }
    }
}

/// A request for leave over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// The requesting employee.
    pub employee_id: u64,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Kind of leave, e.g. "Annual" or "Sick".
    pub leave_type: String,
    /// Optional free-form reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Current approval status.
    pub status: LeaveStatus,
    /// When the request was submitted.
    pub submitted_at: DateTime<Utc>,
}

impl LeaveRequest {
    /// Number of leave days, counting both endpoints.
    ///
    /// Fails with [`EngineError::InvalidRange`] if the stored range is
    /// inverted; requests created through the store never are.
    pub fn days(&self) -> EngineResult<i64> {
        leave_days(self.start_date, self.end_date)
    }

    /// Returns true while the request awaits a decision.
    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending
    }

    /// Applies a decision. On failure the request is left unchanged.
    pub fn decide(&mut self, decision: LeaveDecision) -> EngineResult<()> {
        self.status = self.status.apply(decision)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_pending_request() -> LeaveRequest {
        LeaveRequest {
            id: 1,
            employee_id: 10,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            leave_type: "Annual".to_string(),
            reason: None,
            status: LeaveStatus::Pending,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_to_approved() {
        assert_eq!(
            LeaveStatus::Pending.apply(LeaveDecision::Approve).unwrap(),
            LeaveStatus::Approved
        );
    }

    #[test]
    fn test_pending_to_rejected() {
        assert_eq!(
            LeaveStatus::Pending.apply(LeaveDecision::Reject).unwrap(),
            LeaveStatus::Rejected
        );
    }

    #[test]
    fn test_terminal_states_refuse_every_decision() {
        for from in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            for decision in [LeaveDecision::Approve, LeaveDecision::Reject] {
                match from.apply(decision) {
                    Err(EngineError::InvalidTransition { from: f, to }) => {
                        assert_eq!(f, from);
                        assert_eq!(to, decision.target());
                    }
                    other => panic!("Expected InvalidTransition, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_only_pending_is_not_terminal() {
        assert!(!LeaveStatus::Pending.is_terminal());
        assert!(LeaveStatus::Approved.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_approve_once_then_reapprove_fails() {
        let mut request = create_pending_request();
        request.decide(LeaveDecision::Approve).unwrap();
        assert_eq!(request.status, LeaveStatus::Approved);

        assert!(request.decide(LeaveDecision::Approve).is_err());
        assert!(request.decide(LeaveDecision::Reject).is_err());
        assert_eq!(request.status, LeaveStatus::Approved);
    }

    #[test]
    fn test_rejected_request_stays_rejected() {
        let mut request = create_pending_request();
        request.decide(LeaveDecision::Reject).unwrap();
        assert!(request.decide(LeaveDecision::Approve).is_err());
        assert_eq!(request.status, LeaveStatus::Rejected);
        assert!(!request.is_pending());
    }

    #[test]
    fn test_days_counts_both_endpoints() {
        let request = create_pending_request();
        assert_eq!(request.days().unwrap(), 5);
    }

    #[test]
    fn test_decision_serialization() {
        assert_eq!(
            serde_json::to_string(&LeaveDecision::Approve).unwrap(),
            "\"approve\""
        );
        assert_eq!(
            serde_json::to_string(&LeaveStatus::Pending).unwrap(),
            "\"Pending\""
        );
    }

    #[test]
    fn test_status_wire_name_matches_display() {
        for status in [LeaveStatus::Pending, LeaveStatus::Approved, LeaveStatus::Rejected] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
            assert_eq!(serde_json::from_str::<LeaveStatus>(&json).unwrap(), status);
        }
        assert!(serde_json::from_str::<LeaveStatus>("\"pending\"").is_err());
    }
}
