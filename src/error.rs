//! Error types for the WorkFlowX engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur outside of per-row import
//! validation (which reports [`RowError`](crate::import::RowError) values
//! instead of failing).

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::LeaveStatus;

/// The main error type for the WorkFlowX engine.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use workflowx::error::EngineError;
///
/// let error = EngineError::InvalidRange {
///     start: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
///     end: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid date range: end date 2025-03-03 is before start date 2025-03-07"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A leave request ends before it starts.
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// A leave request was asked to move out of a state that does not allow it.
    #[error("Invalid leave transition: cannot move from {from} to {to}")]
    InvalidTransition {
        /// The current status of the request.
        from: LeaveStatus,
        /// The status the caller asked for.
        to: LeaveStatus,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee id that was looked up.
        id: u64,
    },

    /// No leave request exists with the given id.
    #[error("Leave request not found: {id}")]
    LeaveRequestNotFound {
        /// The leave request id that was looked up.
        id: u64,
    },

    /// No department matches the given name or id.
    #[error("Department not found: {name}")]
    DepartmentNotFound {
        /// The department name (or id rendered as text).
        name: String,
    },

    /// No job role matches the given title or id.
    #[error("Role not found: {title}")]
    RoleNotFound {
        /// The role title (or id rendered as text).
        title: String,
    },

    /// An employee with this email already exists.
    #[error("Email already in use: {email}")]
    DuplicateEmail {
        /// The conflicting email address.
        email: String,
    },

    /// A department with this name already exists.
    #[error("Department already exists: {name}")]
    DuplicateDepartment {
        /// The conflicting department name.
        name: String,
    },

    /// A job role with this title already exists.
    #[error("Role already exists: {title}")]
    DuplicateRole {
        /// The conflicting role title.
        title: String,
    },

    /// A department cannot be deleted while employees are assigned to it.
    #[error("Cannot delete department '{name}': {employees} employee(s) assigned")]
    DepartmentInUse {
        /// The department name.
        name: String,
        /// How many employees, active or not, still reference it.
        employees: usize,
    },

    /// A job role cannot be deleted while employees hold it.
    #[error("Cannot delete role '{title}': {employees} employee(s) assigned")]
    RoleInUse {
        /// The role title.
        title: String,
        /// How many employees, active or not, still reference it.
        employees: usize,
    },

    /// A user with this username already exists.
    #[error("Username already taken: {username}")]
    DuplicateUsername {
        /// The conflicting username.
        username: String,
    },

    /// Submitted data failed field validation.
    #[error("Validation failed: {}", errors.join("; "))]
    ValidationFailed {
        /// One message per failed check.
        errors: Vec<String>,
    },

    /// An uploaded CSV document could not be read.
    #[error("Invalid CSV: {reason}")]
    InvalidCsv {
        /// Why the document was rejected.
        reason: String,
    },

    /// Username or password did not match.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The request carried no valid session.
    #[error("Login required")]
    Unauthenticated,

    /// The session's role does not permit the operation.
    #[error("Admin access required")]
    Forbidden,

    /// An export document could not be written.
    #[error("Export failed: {message}")]
    Export {
        /// The underlying writer error.
        message: String,
    },

    /// Password hashing or verification failed.
    #[error("Password hashing failed: {message}")]
    PasswordHash {
        /// The underlying hashing error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<bcrypt::BcryptError> for EngineError {
    fn from(error: bcrypt::BcryptError) -> Self {
        EngineError::PasswordHash {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for EngineError {
    fn from(error: csv::Error) -> Self {
        EngineError::Export {
            message: error.to_string(),
        }
    }
}
