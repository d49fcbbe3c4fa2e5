//! Response types for the WorkFlowX API.
//!
//! This module defines the error response structures, the mapping from
//! [`EngineError`] to HTTP status codes, and the success bodies that are
//! not plain domain records.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::AttendanceSummary;
use crate::error::EngineError;
use crate::import::ImportReport;
use crate::models::{AttendanceRecord, LeaveRequest, UserRole};
use crate::store::AttendanceMark;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid query string error response.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

fn not_found(code: &str, error: &EngineError) -> ApiErrorResponse {
    ApiErrorResponse {
        status: StatusCode::NOT_FOUND,
        error: ApiError::new(code, error.to_string()),
    }
}

fn conflict(code: &str, error: &EngineError) -> ApiErrorResponse {
    ApiErrorResponse {
        status: StatusCode::CONFLICT,
        error: ApiError::new(code, error.to_string()),
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match &error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidRange { .. } => ApiErrorResponse::bad_request(ApiError::with_details(
                "INVALID_RANGE",
                error.to_string(),
                "The end date must be on or after the start date",
            )),
            EngineError::ValidationFailed { errors } => ApiErrorResponse::bad_request(
                ApiError::with_details("VALIDATION_ERROR", "Validation failed", errors.join("; ")),
            ),
            EngineError::InvalidCsv { reason } => ApiErrorResponse::bad_request(
                ApiError::with_details("INVALID_CSV", "The uploaded CSV could not be read", reason.clone()),
            ),
            EngineError::InvalidTransition { .. } => conflict("INVALID_TRANSITION", &error),
            EngineError::EmployeeNotFound { .. } => not_found("EMPLOYEE_NOT_FOUND", &error),
            EngineError::LeaveRequestNotFound { .. } => not_found("LEAVE_REQUEST_NOT_FOUND", &error),
            EngineError::DepartmentNotFound { .. } => not_found("DEPARTMENT_NOT_FOUND", &error),
            EngineError::RoleNotFound { .. } => not_found("ROLE_NOT_FOUND", &error),
            EngineError::DuplicateEmail { .. } => conflict("DUPLICATE_EMAIL", &error),
            EngineError::DuplicateDepartment { .. } => conflict("DUPLICATE_DEPARTMENT", &error),
            EngineError::DuplicateRole { .. } => conflict("DUPLICATE_ROLE", &error),
            EngineError::DuplicateUsername { .. } => conflict("DUPLICATE_USERNAME", &error),
            EngineError::DepartmentInUse { .. } => conflict("DEPARTMENT_IN_USE", &error),
            EngineError::RoleInUse { .. } => conflict("ROLE_IN_USE", &error),
            EngineError::InvalidCredentials => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("INVALID_CREDENTIALS", error.to_string()),
            },
            EngineError::Unauthenticated => ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new("UNAUTHENTICATED", error.to_string()),
            },
            EngineError::Forbidden => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new("FORBIDDEN", error.to_string()),
            },
            EngineError::Export { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("EXPORT_ERROR", "Export failed", message.clone()),
            },
            EngineError::PasswordHash { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "PASSWORD_HASH_ERROR",
                    "Password hashing failed",
                    message.clone(),
                ),
            },
        }
    }
}

/// Body returned by `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for later requests.
    pub token: String,
    /// The logged-in account.
    pub username: String,
    /// Authorization level of the account.
    pub role: UserRole,
}

/// Body returned by `POST /users`. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreatedResponse {
    /// Store-assigned id.
    pub id: u64,
    /// The new account's username.
    pub username: String,
    /// Authorization level of the account.
    pub role: UserRole,
}

/// Body returned by `POST /attendance`.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceMarkResponse {
    /// Whether the record was created or replaced.
    pub result: AttendanceMark,
    /// The stored record.
    pub record: AttendanceRecord,
}

/// Body returned by `GET /employees/:id/attendance`.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeAttendanceResponse {
    /// The employee.
    pub employee_id: u64,
    /// Totals over `records`.
    pub summary: AttendanceSummary,
    /// Records in date order.
    pub records: Vec<AttendanceRecord>,
}

/// Body returned by `GET /departments/:id/attendance`.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentAttendanceResponse {
    /// The department.
    pub department_id: u64,
    /// Department name.
    pub department_name: String,
    /// Totals over the department's active members.
    pub summary: AttendanceSummary,
}

/// Body returned by `POST /leave-requests`.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveSubmittedResponse {
    /// The stored request.
    #[serde(flatten)]
    pub request: LeaveRequest,
    /// Inclusive day count of the request.
    pub days: i64,
}

/// Body returned by `POST /employees/import`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    /// Rows inserted.
    pub success_count: usize,
    /// Rows rejected or failed on insert.
    pub error_count: usize,
    /// Per-row detail.
    #[serde(flatten)]
    pub report: ImportReport,
}

impl From<ImportReport> for ImportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            success_count: report.success_count(),
            error_count: report.error_count(),
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveStatus;
    use chrono::NaiveDate;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                EngineError::InvalidRange {
                    start: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
                    end: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                },
                StatusCode::BAD_REQUEST,
                "INVALID_RANGE",
            ),
            (
                EngineError::InvalidTransition {
                    from: LeaveStatus::Approved,
                    to: LeaveStatus::Rejected,
                },
                StatusCode::CONFLICT,
                "INVALID_TRANSITION",
            ),
            (
                EngineError::EmployeeNotFound { id: 9 },
                StatusCode::NOT_FOUND,
                "EMPLOYEE_NOT_FOUND",
            ),
            (
                EngineError::DuplicateEmail {
                    email: "a@b.co".to_string(),
                },
                StatusCode::CONFLICT,
                "DUPLICATE_EMAIL",
            ),
            (
                EngineError::RoleInUse {
                    title: "Accountant".to_string(),
                    employees: 1,
                },
                StatusCode::CONFLICT,
                "ROLE_IN_USE",
            ),
            (EngineError::Unauthenticated, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            (EngineError::Forbidden, StatusCode::FORBIDDEN, "FORBIDDEN"),
            (
                EngineError::PasswordHash {
                    message: "bad".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "PASSWORD_HASH_ERROR",
            ),
        ];

        for (engine_error, status, code) in cases {
            let api_error: ApiErrorResponse = engine_error.into();
            assert_eq!(api_error.status, status);
            assert_eq!(api_error.error.code, code);
        }
    }

    #[test]
    fn test_validation_failed_lists_every_error() {
        let api_error: ApiErrorResponse = EngineError::ValidationFailed {
            errors: vec!["name: bad".to_string(), "email: bad".to_string()],
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.details.as_deref(), Some("name: bad; email: bad"));
    }
}
