//! Employee profiles and file exports.
//!
//! Exports are rendered in memory and returned as strings; the HTTP layer
//! attaches the content type and file name.

use serde::Serialize;

use crate::calculation::{attendance_percentage, total_approved_leave_days};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LeaveStatus, ReportPeriod};
use crate::store::InMemoryStore;

/// Header of the employees CSV export.
pub const EMPLOYEES_CSV_HEADER: [&str; 9] = [
    "ID",
    "Name",
    "Email",
    "Phone",
    "Department",
    "Role",
    "Salary",
    "Date Joined",
    "Status",
];

/// Header of the leave summary CSV export.
pub const LEAVE_SUMMARY_CSV_HEADER: [&str; 5] = [
    "Employee ID",
    "Name",
    "Total Leave Days",
    "Pending Requests",
    "Approved Requests",
];

/// An employee with resolved names and derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeProfile {
    /// The stored employee.
    #[serde(flatten)]
    pub employee: Employee,
    /// Name of the employee's department, if it still resolves.
    pub department_name: Option<String>,
    /// Title of the employee's role, if it still resolves.
    pub role_title: Option<String>,
    /// Attendance over every recorded day.
    pub attendance_percentage: rust_decimal::Decimal,
    /// Inclusive days across approved leave requests.
    pub total_leave_days: i64,
}

/// Builds the profile of one employee.
pub fn employee_profile(store: &InMemoryStore, employee: &Employee) -> EngineResult<EmployeeProfile> {
    let records = store.attendance_for_employee(employee.id, &ReportPeriod::default())?;
    let requests = store.leave_requests_for_employee(employee.id);

    Ok(EmployeeProfile {
        employee: employee.clone(),
        department_name: store.department(employee.department_id).ok().map(|d| d.name.clone()),
        role_title: store.role(employee.role_id).ok().map(|r| r.title.clone()),
        attendance_percentage: attendance_percentage(&records),
        total_leave_days: total_approved_leave_days(requests.iter().copied())?,
    })
}

/// Profiles of every employee (or only active ones), in id order.
pub fn employee_profiles(
    store: &InMemoryStore,
    include_inactive: bool,
) -> EngineResult<Vec<EmployeeProfile>> {
    store
        .employees()
        .filter(|e| include_inactive || e.is_active())
        .map(|e| employee_profile(store, e))
        .collect()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> EngineResult<String> {
    let bytes = writer.into_inner().map_err(|e| EngineError::Export {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| EngineError::Export {
        message: e.to_string(),
    })
}

/// Every employee, active and inactive, as CSV.
pub fn employees_csv(store: &InMemoryStore) -> EngineResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EMPLOYEES_CSV_HEADER)?;

    for employee in store.employees() {
        let department = store
            .department(employee.department_id)
            .map(|d| d.name.clone())
            .unwrap_or_default();
        let role = store
            .role(employee.role_id)
            .map(|r| r.title.clone())
            .unwrap_or_default();
        writer.write_record([
            employee.id.to_string(),
            employee.name.clone(),
            employee.email.clone(),
            employee.phone.clone().unwrap_or_default(),
            department,
            role,
            employee.salary.to_string(),
            employee.date_joined.format("%Y-%m-%d").to_string(),
            employee.status.to_string(),
        ])?;
    }

    finish(writer)
}

/// Every employee, active and inactive, as pretty-printed JSON profiles.
pub fn employees_json(store: &InMemoryStore) -> EngineResult<String> {
    let profiles = employee_profiles(store, true)?;
    serde_json::to_string_pretty(&profiles).map_err(|e| EngineError::Export {
        message: e.to_string(),
    })
}

/// Approved leave days and request counts per active employee, as CSV.
pub fn leave_summary_csv(store: &InMemoryStore) -> EngineResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(LEAVE_SUMMARY_CSV_HEADER)?;

    for employee in store.active_employees() {
        let requests = store.leave_requests_for_employee(employee.id);
        let count = |status: LeaveStatus| requests.iter().filter(|r| r.status == status).count();
        writer.write_record([
            employee.id.to_string(),
            employee.name.clone(),
            total_approved_leave_days(requests.iter().copied())?.to_string(),
            count(LeaveStatus::Pending).to_string(),
            count(LeaveStatus::Approved).to_string(),
        ])?;
    }

    finish(writer)
}
