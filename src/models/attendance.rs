//! Attendance records.
//!
//! The store keeps at most one [`AttendanceRecord`] per employee and date;
//! everything that consumes these records may rely on that.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The recorded status for one employee on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Attended. The only status counted as present.
    Present,
    /// Did not attend.
    Absent,
    /// Attended late. Not counted as present.
    Late,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Absent => write!(f, "Absent"),
            AttendanceStatus::Late => write!(f, "Late"),
        }
    }
}

/// Attendance of one employee on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee this record belongs to.
    pub employee_id: u64,
    /// The calendar date.
    pub date: NaiveDate,
    /// What happened that day.
    pub status: AttendanceStatus,
    /// Free-form notes entered when marking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AttendanceRecord {
    /// Creates a record without notes.
    pub fn new(employee_id: u64, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id,
            date,
            status,
            notes: None,
        }
    }

    /// Returns true if this record counts toward attendance.
    pub fn is_present(&self) -> bool {
        self.status == AttendanceStatus::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_only_present_is_present() {
        assert!(AttendanceRecord::new(1, date(2025, 3, 3), AttendanceStatus::Present).is_present());
        assert!(!AttendanceRecord::new(1, date(2025, 3, 3), AttendanceStatus::Absent).is_present());
        assert!(!AttendanceRecord::new(1, date(2025, 3, 3), AttendanceStatus::Late).is_present());
    }

    #[test]
    fn test_status_uses_capitalised_names() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Late).unwrap(),
            "\"Late\""
        );
        let status: AttendanceStatus = serde_json::from_str("\"Absent\"").unwrap();
        assert_eq!(status, AttendanceStatus::Absent);
    }

    #[test]
    fn test_deserialize_record_without_notes() {
        let json = r#"{"employee_id": 4, "date": "2025-03-04", "status": "Present"}"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.employee_id, 4);
        assert_eq!(record.date, date(2025, 3, 4));
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_notes_skipped_when_absent() {
        let record = AttendanceRecord::new(1, date(2025, 3, 3), AttendanceStatus::Present);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("notes"));
    }
}
