//! Per-row import errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why one import row was rejected.
///
/// A rejected row carries every error found in it, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// A required field was empty after trimming.
    #[error("{field}: required field is missing or empty")]
    MissingField {
        /// The CSV column name.
        field: &'static str,
    },

    /// The email does not match the configured pattern.
    #[error("email: invalid format '{email}'")]
    InvalidEmail {
        /// The normalised email.
        email: String,
    },

    /// An employee with this email is already stored.
    #[error("email: '{email}' already exists")]
    EmailExists {
        /// The normalised email.
        email: String,
    },

    /// An earlier row in the same batch already uses this email.
    #[error("email: '{email}' duplicates row {first_row}")]
    DuplicateEmail {
        /// The normalised email.
        email: String,
        /// Row number of the first occurrence.
        first_row: usize,
    },

    /// The phone does not match the configured pattern.
    #[error("phone: invalid format '{phone}'")]
    InvalidPhone {
        /// The trimmed phone value.
        phone: String,
    },

    /// No department has this name.
    #[error("department: '{name}' not found")]
    DepartmentNotFound {
        /// The trimmed department name.
        name: String,
    },

    /// No job role has this title.
    #[error("role: '{title}' not found")]
    RoleNotFound {
        /// The trimmed role title.
        title: String,
    },

    /// The salary is not a decimal number.
    #[error("salary: '{value}' is not a valid number")]
    InvalidSalary {
        /// The trimmed salary text.
        value: String,
    },

    /// The salary is below zero.
    #[error("salary: must not be negative (got {value})")]
    NegativeSalary {
        /// The parsed salary.
        value: Decimal,
    },

    /// The salary is above the configured maximum.
    #[error("salary: {value} exceeds the maximum of {max}")]
    SalaryTooHigh {
        /// The parsed salary.
        value: Decimal,
        /// The configured upper bound.
        max: Decimal,
    },

    /// The joining date does not parse with the configured format.
    #[error("date_joined: '{value}' does not match format {format}")]
    InvalidDate {
        /// The trimmed date text.
        value: String,
        /// The expected chrono format.
        format: String,
    },

    /// The joining date is after today.
    #[error("date_joined: {date} is in the future")]
    FutureDate {
        /// The parsed date.
        date: NaiveDate,
    },
}
