//! Core data models for the WorkFlowX engine.
//!
//! This module contains all the domain records used throughout the engine.
//! They are plain snapshots; the store owns their lifecycle.

mod attendance;
mod employee;
mod import_row;
mod leave;
mod organisation;
mod report_period;
mod user;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use employee::{Employee, EmployeeStatus, NewEmployee};
pub use import_row::EmployeeImportRow;
pub use leave::{LeaveDecision, LeaveRequest, LeaveStatus};
pub use organisation::{Department, JobRole, names_match};
pub use report_period::ReportPeriod;
pub use user::{User, UserRole};
