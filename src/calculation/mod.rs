//! Calculation logic for WorkFlowX.
//!
//! This module contains the pure calculations behind the HTTP surface:
//! attendance percentages for an employee or a whole department, inclusive
//! leave day counts, and the attendance, leave and payroll reports built on
//! top of them.

mod attendance_stats;
mod leave_days;
mod reports;

pub use attendance_stats::{
    ATTENDANCE_PERCENTAGE_DP, AttendanceSummary, attendance_percentage, department_attendance,
    percentage, summarize_attendance,
};
pub use leave_days::{leave_days, total_approved_leave_days};
pub use reports::{
    AttendanceReportRow, LeaveReportRow, PayrollRow, PayrollSummary, attendance_report,
    leave_report, payroll_report,
};
