//! Request types for the WorkFlowX API.
//!
//! This module defines the JSON bodies and query strings accepted by the
//! handlers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::leave_days;
use crate::error::{EngineError, EngineResult};
use crate::import::FieldRules;
use crate::models::{
    AttendanceStatus, EmployeeStatus, LeaveStatus, NewEmployee, ReportPeriod, UserRole,
};

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    pub username: String,
    /// Plain-text password, checked against the stored bcrypt hash.
    pub password: String,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Account name, unique across users.
    pub username: String,
    /// Plain-text password. Only its bcrypt hash is stored.
    pub password: String,
    /// Authorization level. Defaults to employee.
    #[serde(default = "employee_role")]
    pub role: UserRole,
}

fn employee_role() -> UserRole {
    UserRole::Employee
}

impl CreateUserRequest {
    /// Sanitises the username and checks neither field is blank.
    pub fn validate(self, rules: &FieldRules) -> EngineResult<Self> {
        let username = rules.sanitize(&self.username);
        let mut errors = Vec::new();
        if username.is_empty() {
            errors.push("username: required field is missing or empty".to_string());
        }
        if self.password.trim().is_empty() {
            errors.push("password: required field is missing or empty".to_string());
        }
        if !errors.is_empty() {
            return Err(EngineError::ValidationFailed { errors });
        }
        Ok(Self { username, ..self })
    }
}

/// Query string of `GET /api/employees`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeListQuery {
    /// Case-insensitive fragment of a name or email. Blank lists every
    /// active employee.
    #[serde(default)]
    pub search: Option<String>,
}

impl EmployeeListQuery {
    /// The trimmed search term, if one was given.
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Body of `POST /employees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Department id.
    pub department_id: u64,
    /// Job role id.
    pub role_id: u64,
    /// Annual salary.
    pub salary: Decimal,
    /// Joining date in the configured format.
    pub date_joined: String,
}

impl CreateEmployeeRequest {
    /// Runs the same field rules as the bulk import.
    ///
    /// Every failed check is reported in one
    /// [`EngineError::ValidationFailed`].
    pub fn validate(self, rules: &FieldRules, today: NaiveDate) -> EngineResult<NewEmployee> {
        let mut errors = Vec::new();
        let name = rules.check_name(&self.name).map_err(|e| errors.push(e.to_string())).ok();
        let email = rules.check_email(&self.email).map_err(|e| errors.push(e.to_string())).ok();
        let phone = rules
            .check_phone(self.phone.as_deref().unwrap_or_default())
            .map_err(|e| errors.push(e.to_string()))
            .ok();
        let salary = rules
            .check_salary(&self.salary.to_string())
            .map_err(|e| errors.push(e.to_string()))
            .ok();
        let date_joined = rules
            .check_date_joined(&self.date_joined, today)
            .map_err(|e| errors.push(e.to_string()))
            .ok();

        match (name, email, phone, salary, date_joined) {
            (Some(name), Some(email), Some(phone), Some(salary), Some(date_joined)) => {
                Ok(NewEmployee {
                    name,
                    email,
                    phone,
                    department_id: self.department_id,
                    role_id: self.role_id,
                    salary,
                    date_joined,
                })
            }
            _ => Err(EngineError::ValidationFailed { errors }),
        }
    }
}

/// Body of `PUT /employees/:id`.
///
/// Carries the full record. Without `status` the employee keeps their
/// current one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Department id.
    pub department_id: u64,
    /// Job role id.
    pub role_id: u64,
    /// Annual salary.
    pub salary: Decimal,
    /// Joining date in the configured format.
    pub date_joined: String,
    /// Active or inactive.
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
}

impl UpdateEmployeeRequest {
    /// Runs the same field rules as [`CreateEmployeeRequest::validate`].
    pub fn validate(
        self,
        rules: &FieldRules,
        today: NaiveDate,
    ) -> EngineResult<(NewEmployee, Option<EmployeeStatus>)> {
        let status = self.status;
        let fields = CreateEmployeeRequest {
            name: self.name,
            email: self.email,
            phone: self.phone,
            department_id: self.department_id,
            role_id: self.role_id,
            salary: self.salary,
            date_joined: self.date_joined,
        };
        Ok((fields.validate(rules, today)?, status))
    }
}

fn sanitized_description(rules: &FieldRules, description: Option<String>) -> Option<String> {
    description
        .map(|d| rules.sanitize(&d))
        .filter(|d| !d.is_empty())
}

/// Body of `POST /departments` and `PUT /departments/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartmentRequest {
    /// Department name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateDepartmentRequest {
    /// Name and description with markup fragments stripped.
    pub fn sanitized(self, rules: &FieldRules) -> (String, Option<String>) {
        (
            rules.sanitize(&self.name),
            sanitized_description(rules, self.description),
        )
    }
}

/// Body of `POST /roles` and `PUT /roles/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoleRequest {
    /// Role title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateRoleRequest {
    /// Title and description with markup fragments stripped.
    pub fn sanitized(self, rules: &FieldRules) -> (String, Option<String>) {
        (
            rules.sanitize(&self.title),
            sanitized_description(rules, self.description),
        )
    }
}

/// Body of `POST /attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkAttendanceRequest {
    /// The employee being marked.
    pub employee_id: u64,
    /// The day being marked.
    pub date: NaiveDate,
    /// Present, Absent or Late.
    pub status: AttendanceStatus,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body of `POST /leave-requests`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitLeaveRequest {
    /// The employee taking leave.
    pub employee_id: u64,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    /// Kind of leave.
    pub leave_type: String,
    /// Optional reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Query string of `GET /leave-requests`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveListQuery {
    /// Only requests with this status.
    #[serde(default)]
    pub status: Option<LeaveStatus>,
}

/// Query string of the attendance views and reports.
///
/// Kept flat rather than flattening [`ReportPeriod`] because URL-encoded
/// deserialization cannot parse dates through `#[serde(flatten)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// First date included.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last date included.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Restrict to one department.
    #[serde(default)]
    pub department_id: Option<u64>,
}

impl ReportQuery {
    /// The requested period.
    ///
    /// Fails with [`EngineError::InvalidRange`] when both bounds are given
    /// and the end is before the start.
    pub fn period(&self) -> EngineResult<ReportPeriod> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            leave_days(start, end)?;
        }
        Ok(ReportPeriod {
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}
