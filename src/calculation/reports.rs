//! Attendance, leave and payroll reports.
//!
//! Report builders are pure: the caller chooses which employees appear (all
//! active employees, or one department) and hands over the raw records. Each
//! builder keeps the employee order it was given.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, Employee, LeaveRequest, LeaveStatus, ReportPeriod};

use super::attendance_stats::{AttendanceSummary, summarize_attendance};
use super::leave_days::total_approved_leave_days;

/// Months salaries are spread over in the payroll report.
const MONTHS_PER_YEAR: u32 = 12;

/// One employee's line in the attendance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReportRow {
    /// The employee.
    pub employee_id: u64,
    /// Employee name at report time.
    pub name: String,
    /// Counts and percentage over the report period.
    #[serde(flatten)]
    pub summary: AttendanceSummary,
}

/// Builds the attendance report for `employees` over `period`.
///
/// Records outside the period or belonging to other employees are ignored.
/// Employees without records get a zero summary.
pub fn attendance_report(
    employees: &[Employee],
    records: &[AttendanceRecord],
    period: &ReportPeriod,
) -> Vec<AttendanceReportRow> {
    let mut by_employee: HashMap<u64, Vec<&AttendanceRecord>> = HashMap::new();
    for record in records.iter().filter(|r| period.contains_date(r.date)) {
        by_employee.entry(record.employee_id).or_default().push(record);
    }

    employees
        .iter()
        .map(|employee| {
            let summary = by_employee
                .get(&employee.id)
                .map(|own| summarize_attendance(own.iter().copied()))
                .unwrap_or_default();
            AttendanceReportRow {
                employee_id: employee.id,
                name: employee.name.clone(),
                summary,
            }
        })
        .collect()
}

/// One employee's line in the leave report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveReportRow {
    /// The employee.
    pub employee_id: u64,
    /// Employee name at report time.
    pub name: String,
    /// Requests in the period, any status.
    pub total_requests: usize,
    /// Approved requests in the period.
    pub approved_requests: usize,
    /// Pending requests in the period.
    pub pending_requests: usize,
    /// Rejected requests in the period.
    pub rejected_requests: usize,
    /// Inclusive day count summed over approved requests.
    pub total_leave_days: i64,
}

/// Builds the leave report for `employees` over `period`.
///
/// A request belongs to the period when it lies entirely inside it.
pub fn leave_report(
    employees: &[Employee],
    requests: &[LeaveRequest],
    period: &ReportPeriod,
) -> EngineResult<Vec<LeaveReportRow>> {
    let mut by_employee: HashMap<u64, Vec<&LeaveRequest>> = HashMap::new();
    for request in requests
        .iter()
        .filter(|r| period.contains_range(r.start_date, r.end_date))
    {
        by_employee.entry(request.employee_id).or_default().push(request);
    }

    employees
        .iter()
        .map(|employee| {
            let own = by_employee.get(&employee.id).map(Vec::as_slice).unwrap_or(&[]);
            let count = |status: LeaveStatus| own.iter().filter(|r| r.status == status).count();
            Ok(LeaveReportRow {
                employee_id: employee.id,
                name: employee.name.clone(),
                total_requests: own.len(),
                approved_requests: count(LeaveStatus::Approved),
                pending_requests: count(LeaveStatus::Pending),
                rejected_requests: count(LeaveStatus::Rejected),
                total_leave_days: total_approved_leave_days(own.iter().copied())?,
            })
        })
        .collect()
}

/// One employee's line in the payroll report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRow {
    /// The employee.
    pub employee_id: u64,
    /// Employee name at report time.
    pub name: String,
    /// The employee's department.
    pub department_id: u64,
    /// Annual salary as stored.
    pub annual_salary: Decimal,
    /// Annual salary / 12, rounded to cents.
    pub monthly_salary: Decimal,
}

/// Payroll report with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Per-employee lines.
    pub employees: Vec<PayrollRow>,
    /// Sum of annual salaries.
    pub total_annual_payroll: Decimal,
    /// Total annual payroll / 12, rounded to cents.
    pub total_monthly_payroll: Decimal,
}

fn monthly(annual: Decimal) -> Decimal {
    let mut monthly = (annual / Decimal::from(MONTHS_PER_YEAR)).round_dp(2);
    monthly.rescale(2);
    monthly
}

/// Builds the payroll report for `employees`.
pub fn payroll_report(employees: &[Employee]) -> PayrollSummary {
    let rows: Vec<PayrollRow> = employees
        .iter()
        .map(|employee| PayrollRow {
            employee_id: employee.id,
            name: employee.name.clone(),
            department_id: employee.department_id,
            annual_salary: employee.salary,
            monthly_salary: monthly(employee.salary),
        })
        .collect();

    let total_annual_payroll: Decimal = rows.iter().map(|row| row.annual_salary).sum();

    PayrollSummary {
        employees: rows,
        total_annual_payroll,
        total_monthly_payroll: monthly(total_annual_payroll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, NewEmployee};
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn employee(id: u64, name: &str, salary: &str) -> Employee {
        Employee::from_new(
            id,
            NewEmployee {
                name: name.to_string(),
                email: format!("{}@company.com", name.to_lowercase()),
                phone: None,
                department_id: 1,
                role_id: 1,
                salary: dec(salary),
                date_joined: date(2023, 1, 9),
            },
        )
    }

    fn leave(id: u64, employee_id: u64, start: NaiveDate, end: NaiveDate, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id,
            start_date: start,
            end_date: end,
            leave_type: "Annual".to_string(),
            reason: None,
            status,
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn test_attendance_report_filters_by_period() {
        let employees = vec![employee(1, "Ada", "1"), employee(2, "Alan", "1")];
        let records = vec![
            AttendanceRecord::new(1, date(2025, 2, 28), AttendanceStatus::Absent),
            AttendanceRecord::new(1, date(2025, 3, 3), AttendanceStatus::Present),
            AttendanceRecord::new(1, date(2025, 3, 4), AttendanceStatus::Late),
            AttendanceRecord::new(3, date(2025, 3, 4), AttendanceStatus::Present),
        ];
        let period = ReportPeriod {
            start_date: Some(date(2025, 3, 1)),
            end_date: None,
        };

        let report = attendance_report(&employees, &records, &period);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].employee_id, 1);
        assert_eq!(report[0].summary.total_days, 2);
        assert_eq!(report[0].summary.attendance_percentage, dec("50.0"));
        assert_eq!(report[1].employee_id, 2);
        assert_eq!(report[1].summary.total_days, 0);
        assert_eq!(report[1].summary.attendance_percentage, dec("0.0"));
    }

    #[test]
    fn test_attendance_row_flattens_summary() {
        let employees = vec![employee(1, "Ada", "1")];
        let report = attendance_report(&employees, &[], &ReportPeriod::default());
        let json = serde_json::to_value(&report[0]).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["present_days"], 0);
        assert_eq!(json["attendance_percentage"], "0.0");
    }

    #[test]
    fn test_leave_report_counts_statuses_and_approved_days() {
        let employees = vec![employee(1, "Ada", "1")];
        let requests = vec![
            leave(1, 1, date(2025, 3, 3), date(2025, 3, 7), LeaveStatus::Approved),
            leave(2, 1, date(2025, 3, 10), date(2025, 3, 10), LeaveStatus::Approved),
            leave(3, 1, date(2025, 3, 12), date(2025, 3, 14), LeaveStatus::Pending),
            leave(4, 1, date(2025, 3, 17), date(2025, 3, 18), LeaveStatus::Rejected),
            leave(5, 2, date(2025, 3, 3), date(2025, 3, 7), LeaveStatus::Approved),
        ];

        let report = leave_report(&employees, &requests, &ReportPeriod::default()).unwrap();
        assert_eq!(report.len(), 1);
        let row = &report[0];
        assert_eq!(row.total_requests, 4);
        assert_eq!(row.approved_requests, 2);
        assert_eq!(row.pending_requests, 1);
        assert_eq!(row.rejected_requests, 1);
        assert_eq!(row.total_leave_days, 6);
    }

    #[test]
    fn test_leave_report_excludes_requests_straddling_period() {
        let employees = vec![employee(1, "Ada", "1")];
        let requests = vec![
            leave(1, 1, date(2025, 2, 27), date(2025, 3, 3), LeaveStatus::Approved),
            leave(2, 1, date(2025, 3, 3), date(2025, 3, 4), LeaveStatus::Approved),
        ];
        let period = ReportPeriod {
            start_date: Some(date(2025, 3, 1)),
            end_date: Some(date(2025, 3, 31)),
        };

        let report = leave_report(&employees, &requests, &period).unwrap();
        assert_eq!(report[0].total_requests, 1);
        assert_eq!(report[0].total_leave_days, 2);
    }

    #[test]
    fn test_payroll_report_monthly_and_totals() {
        let employees = vec![employee(1, "Ada", "75000"), employee(2, "Alan", "50000.50")];
        let report = payroll_report(&employees);

        assert_eq!(report.employees[0].monthly_salary, dec("6250.00"));
        assert_eq!(report.employees[1].monthly_salary, dec("4166.71"));
        assert_eq!(report.total_annual_payroll, dec("125000.50"));
        assert_eq!(report.total_monthly_payroll, dec("10416.71"));
    }

    #[test]
    fn test_payroll_report_empty() {
        let report = payroll_report(&[]);
        assert!(report.employees.is_empty());
        assert_eq!(report.total_annual_payroll, Decimal::ZERO);
        assert_eq!(report.total_monthly_payroll, Decimal::ZERO);
    }
}
