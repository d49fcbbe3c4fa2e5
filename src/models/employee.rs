//! Employee model and related types.
//!
//! This module defines the [`Employee`] record, its [`EmployeeStatus`], and the
//! [`NewEmployee`] payload produced by validation before an id is assigned.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether an employee is currently employed.
///
/// Employees are never hard-deleted; deactivation flips them to
/// [`EmployeeStatus::Inactive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed.
    Active,
    /// Deactivated (soft-deleted).
    Inactive,
}

impl std::fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeStatus::Active => write!(f, "active"),
            EmployeeStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Validated employee data that has not been persisted yet.
///
/// Produced by the bulk import validator (and the single-employee form) and
/// handed to an [`EmployeeSink`](crate::import::EmployeeSink) for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Full name, trimmed and sanitized.
    pub name: String,
    /// Email address, lowercased.
    pub email: String,
    /// Phone number as submitted, if any.
    pub phone: Option<String>,
    /// Resolved department id.
    pub department_id: u64,
    /// Resolved job role id.
    pub role_id: u64,
    /// Annual salary.
    pub salary: Decimal,
    /// The date the employee joined.
    pub date_joined: NaiveDate,
}

/// A persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// Full name.
    pub name: String,
    /// Email address (unique, lowercase).
    pub email: String,
    /// Phone number, if known.
    pub phone: Option<String>,
    /// The department the employee belongs to.
    pub department_id: u64,
    /// The employee's job role.
    pub role_id: u64,
    /// Annual salary.
    pub salary: Decimal,
    /// The date the employee joined.
    pub date_joined: NaiveDate,
    /// Employment status.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Builds an active employee from validated data and a store-assigned id.
    pub fn from_new(id: u64, new: NewEmployee) -> Self {
        Employee {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            department_id: new.department_id,
            role_id: new.role_id,
            salary: new.salary,
            date_joined: new.date_joined,
            status: EmployeeStatus::Active,
        }
    }

    /// Returns true if the employee has not been deactivated.
    ///
    /// # Examples
    ///
    /// ```
    /// use workflowx::models::{Employee, EmployeeStatus, NewEmployee};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut employee = Employee::from_new(1, NewEmployee {
    ///     name: "Ada Lovelace".to_string(),
    ///     email: "ada@company.com".to_string(),
    ///     phone: None,
    ///     department_id: 1,
    ///     role_id: 1,
    ///     salary: Decimal::new(75000, 0),
    ///     date_joined: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    /// });
    /// assert!(employee.is_active());
    ///
    /// employee.status = EmployeeStatus::Inactive;
    /// assert!(!employee.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}
