//! HTTP request handlers for the WorkFlowX API.
//!
//! This module contains the handler functions for all API endpoints.
//! Every handler checks its guard before it looks at the request body, so an
//! anonymous caller gets 401 even when the body is malformed.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{Session, bearer_token, require_admin, require_login};
use crate::calculation::{attendance_report, leave_report, payroll_report, summarize_attendance};
use crate::error::{EngineError, EngineResult};
use crate::export::{
    employee_profile, employee_profiles, employees_csv, employees_json, leave_summary_csv,
};
use crate::import::{BulkImportValidator, commit_import, import_template_csv, parse_import_csv};
use crate::models::{Employee, LeaveDecision, LeaveRequest, ReportPeriod};
use crate::store::{AttendanceMark, InMemoryStore};

use super::request::{
    CreateDepartmentRequest, CreateEmployeeRequest, CreateRoleRequest, CreateUserRequest,
    EmployeeListQuery, LeaveListQuery, LoginRequest, MarkAttendanceRequest, ReportQuery,
    SubmitLeaveRequest, UpdateEmployeeRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceMarkResponse, DepartmentAttendanceResponse,
    EmployeeAttendanceResponse, ImportResponse, LeaveSubmittedResponse, LoginResponse,
    UserCreatedResponse,
};
use super::state::AppState;

type HandlerResult = Result<Response, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/users", post(create_user_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/employees", get(list_employees_handler))
        .route("/employees", post(create_employee_handler))
        .route(
            "/employees/:id",
            put(update_employee_handler).delete(deactivate_employee_handler),
        )
        .route("/employees/:id/attendance", get(employee_attendance_handler))
        .route("/employees/import", post(import_handler))
        .route("/employees/import/template", get(import_template_handler))
        .route(
            "/departments",
            get(list_departments_handler).post(create_department_handler),
        )
        .route(
            "/departments/:id",
            put(update_department_handler).delete(delete_department_handler),
        )
        .route("/departments/:id/attendance", get(department_attendance_handler))
        .route("/roles", get(list_roles_handler).post(create_role_handler))
        .route(
            "/roles/:id",
            put(update_role_handler).delete(delete_role_handler),
        )
        .route("/attendance", post(mark_attendance_handler))
        .route(
            "/leave-requests",
            get(list_leave_handler).post(submit_leave_handler),
        )
        .route("/leave-requests/:id/approve", post(approve_leave_handler))
        .route("/leave-requests/:id/reject", post(reject_leave_handler))
        .route("/export/employees.csv", get(export_employees_csv_handler))
        .route("/export/employees.json", get(export_employees_json_handler))
        .route("/export/leave-summary.csv", get(export_leave_summary_handler))
        .route("/reports/attendance", get(attendance_report_handler))
        .route("/reports/leave", get(leave_report_handler))
        .route("/reports/payroll", get(payroll_report_handler))
        .with_state(state)
}

// Response helpers

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn attachment(content_type: &str, filename: String, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

fn failure(correlation_id: Uuid, err: EngineError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    err.into()
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn query_rejection(correlation_id: Uuid, rejection: QueryRejection) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %rejection, "Query string error");
    ApiErrorResponse::bad_request(ApiError::invalid_query(rejection.body_text()))
}

fn path_rejection(correlation_id: Uuid, rejection: PathRejection) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %rejection, "Path parameter error");
    ApiErrorResponse::bad_request(ApiError::new("INVALID_PATH", rejection.body_text()))
}

// Guards

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

async fn logged_in(state: &AppState, headers: &HeaderMap) -> EngineResult<Session> {
    let sessions = state.sessions().read().await;
    require_login(&sessions, authorization(headers))
}

async fn admin_only(state: &AppState, headers: &HeaderMap) -> EngineResult<Session> {
    let sessions = state.sessions().read().await;
    require_admin(&sessions, authorization(headers))
}

fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

// Sessions

/// Handler for POST /login.
async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;

    let start_time = Instant::now();
    let session = state
        .login(&request.username, &request.password)
        .await
        .map_err(|e| failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        user_id = session.user_id,
        username = %session.username,
        duration_us = start_time.elapsed().as_micros(),
        "Login succeeded"
    );
    Ok(json_response(
        StatusCode::OK,
        LoginResponse {
            token: session.token,
            username: session.username,
            role: session.role,
        },
    ))
}

/// Handler for POST /logout.
async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let session = logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;

    let token = bearer_token(authorization(&headers)).map_err(|e| failure(correlation_id, e))?;
    state.sessions().write().await.logout(token);

    info!(correlation_id = %correlation_id, user_id = session.user_id, "Logged out");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for POST /users.
async fn create_user_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let session = admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;
    let request = request
        .validate(state.config().field_rules())
        .map_err(|e| failure(correlation_id, e))?;

    let id = state
        .create_user(&request.username, &request.password, request.role)
        .await
        .map_err(|e| failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        user_id = id,
        created_by = %session.username,
        "User created"
    );
    Ok(json_response(
        StatusCode::CREATED,
        UserCreatedResponse {
            id,
            username: request.username,
            role: request.role,
        },
    ))
}

// Dashboard and employees

/// Handler for GET /api/stats.
async fn stats_handler(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;

    let stats = state.store().read().await.dashboard_stats(today());
    Ok(json_response(StatusCode::OK, stats))
}

/// Handler for GET /api/employees.
///
/// Lists active employees with their department, role, attendance and leave
/// figures. With `?search=` it lists every employee, active or not, whose
/// name or email contains the term.
async fn list_employees_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<EmployeeListQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Query(query) = query.map_err(|r| query_rejection(correlation_id, r))?;

    let store = state.store().read().await;
    let employees = match query.term() {
        Some(term) => store
            .search_employees(term)
            .map(|e| employee_profile(&store, e))
            .collect::<EngineResult<Vec<_>>>(),
        None => employee_profiles(&store, false),
    }
    .map_err(|e| failure(correlation_id, e))?;
    Ok(json_response(
        StatusCode::OK,
        json!({ "count": employees.len(), "employees": employees }),
    ))
}

/// Handler for POST /employees.
async fn create_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;

    let new_employee = request
        .validate(state.config().field_rules(), today())
        .map_err(|e| failure(correlation_id, e))?;

    let mut store = state.store().write().await;
    let id = store
        .insert_employee(new_employee)
        .map_err(|e| failure(correlation_id, e))?;
    let employee = store.employee(id).map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, employee_id = id, "Employee created");
    Ok(json_response(StatusCode::CREATED, employee))
}

/// Handler for PUT /employees/:id.
async fn update_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;

    let (update, status) = request
        .validate(state.config().field_rules(), today())
        .map_err(|e| failure(correlation_id, e))?;

    let mut store = state.store().write().await;
    let status = match status {
        Some(status) => status,
        None => store.employee(id).map_err(|e| failure(correlation_id, e))?.status,
    };
    let employee = store
        .update_employee(id, update, status)
        .map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, employee_id = id, status = %status, "Employee updated");
    Ok(json_response(StatusCode::OK, employee))
}

/// Handler for DELETE /employees/:id.
///
/// Employees are never removed; they are marked inactive.
async fn deactivate_employee_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;

    let mut store = state.store().write().await;
    let employee = store
        .deactivate_employee(id)
        .map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, employee_id = id, "Employee deactivated");
    Ok(json_response(StatusCode::OK, employee))
}

// Departments and roles

/// Handler for GET /departments.
async fn list_departments_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;

    let store = state.store().read().await;
    let departments: Vec<_> = store.departments().collect();
    Ok(json_response(StatusCode::OK, departments))
}

/// Handler for POST /departments.
async fn create_department_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateDepartmentRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;

    let (name, description) = request.sanitized(state.config().field_rules());

    let department = state
        .store()
        .write()
        .await
        .create_department(&name, description)
        .map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, department_id = department.id, "Department created");
    Ok(json_response(StatusCode::CREATED, department))
}

/// Handler for PUT /departments/:id.
async fn update_department_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<CreateDepartmentRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;
    let (name, description) = request.sanitized(state.config().field_rules());

    let mut store = state.store().write().await;
    let department = store
        .update_department(id, &name, description)
        .map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, department_id = id, "Department updated");
    Ok(json_response(StatusCode::OK, department))
}

/// Handler for DELETE /departments/:id.
///
/// Refused with 409 while any employee, active or not, is assigned.
async fn delete_department_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;

    let department = state
        .store()
        .write()
        .await
        .delete_department(id)
        .map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, department_id = id, name = %department.name, "Department deleted");
    Ok(json_response(StatusCode::OK, department))
}

/// Handler for GET /roles.
async fn list_roles_handler(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;

    let store = state.store().read().await;
    let roles: Vec<_> = store.roles().collect();
    Ok(json_response(StatusCode::OK, roles))
}

/// Handler for POST /roles.
async fn create_role_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;

    let (title, description) = request.sanitized(state.config().field_rules());

    let role = state
        .store()
        .write()
        .await
        .create_role(&title, description)
        .map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, role_id = role.id, "Role created");
    Ok(json_response(StatusCode::CREATED, role))
}

/// Handler for PUT /roles/:id.
async fn update_role_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<CreateRoleRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;
    let (title, description) = request.sanitized(state.config().field_rules());

    let mut store = state.store().write().await;
    let role = store
        .update_role(id, &title, description)
        .map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, role_id = id, "Role updated");
    Ok(json_response(StatusCode::OK, role))
}

/// Handler for DELETE /roles/:id.
///
/// Refused with 409 while any employee, active or not, holds the role.
async fn delete_role_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;

    let role = state
        .store()
        .write()
        .await
        .delete_role(id)
        .map_err(|e| failure(correlation_id, e))?;

    info!(correlation_id = %correlation_id, role_id = id, title = %role.title, "Role deleted");
    Ok(json_response(StatusCode::OK, role))
}

// Attendance

/// Handler for POST /attendance.
///
/// Answers 201 when a record was created and 200 when an existing record
/// for the same employee and day was replaced.
async fn mark_attendance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;

    let mut store = state.store().write().await;
    let result = store
        .mark_attendance(request.employee_id, request.date, request.status, request.notes)
        .map_err(|e| failure(correlation_id, e))?;
    let day = ReportPeriod {
        start_date: Some(request.date),
        end_date: Some(request.date),
    };
    let record = store
        .attendance_for_employee(request.employee_id, &day)
        .map_err(|e| failure(correlation_id, e))?
        .into_iter()
        .next()
        .ok_or_else(|| {
            failure(
                correlation_id,
                EngineError::EmployeeNotFound {
                    id: request.employee_id,
                },
            )
        })?;

    info!(
        correlation_id = %correlation_id,
        employee_id = request.employee_id,
        date = %request.date,
        status = %request.status,
        result = ?result,
        "Attendance marked"
    );
    let status = match result {
        AttendanceMark::Created => StatusCode::CREATED,
        AttendanceMark::Updated => StatusCode::OK,
    };
    Ok(json_response(status, AttendanceMarkResponse { result, record }))
}

/// Handler for GET /employees/:id/attendance.
async fn employee_attendance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;
    let Query(query) = query.map_err(|r| query_rejection(correlation_id, r))?;
    let period = query.period().map_err(|e| failure(correlation_id, e))?;

    let store = state.store().read().await;
    let records = store
        .attendance_for_employee(id, &period)
        .map_err(|e| failure(correlation_id, e))?;
    let summary = summarize_attendance(&records);

    Ok(json_response(
        StatusCode::OK,
        EmployeeAttendanceResponse {
            employee_id: id,
            summary,
            records,
        },
    ))
}

/// Handler for GET /departments/:id/attendance.
async fn department_attendance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;
    let Query(query) = query.map_err(|r| query_rejection(correlation_id, r))?;
    let period = query.period().map_err(|e| failure(correlation_id, e))?;

    let store = state.store().read().await;
    let summary = store
        .department_attendance(id, &period)
        .map_err(|e| failure(correlation_id, e))?;
    let department_name = store
        .department(id)
        .map_err(|e| failure(correlation_id, e))?
        .name
        .clone();

    Ok(json_response(
        StatusCode::OK,
        DepartmentAttendanceResponse {
            department_id: id,
            department_name,
            summary,
        },
    ))
}

// Leave

/// Handler for GET /leave-requests.
async fn list_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<LeaveListQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Query(query) = query.map_err(|r| query_rejection(correlation_id, r))?;

    let store = state.store().read().await;
    let requests = store.leave_requests(query.status);
    Ok(json_response(StatusCode::OK, requests))
}

/// Handler for POST /leave-requests.
async fn submit_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SubmitLeaveRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let session = logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Json(request) = payload.map_err(|r| json_rejection(correlation_id, r))?;

    let leave = state
        .store()
        .write()
        .await
        .create_leave_request(
            request.employee_id,
            request.start_date,
            request.end_date,
            &request.leave_type,
            request.reason,
            Utc::now(),
        )
        .map_err(|e| failure(correlation_id, e))?;
    let days = leave.days().map_err(|e| failure(correlation_id, e))?;

    info!(
        correlation_id = %correlation_id,
        leave_request_id = leave.id,
        employee_id = leave.employee_id,
        submitted_by = %session.username,
        days = days,
        "Leave request submitted"
    );
    Ok(json_response(
        StatusCode::CREATED,
        LeaveSubmittedResponse {
            request: leave,
            days,
        },
    ))
}

async fn decide_leave(
    state: AppState,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
    decision: LeaveDecision,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let session = admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Path(id) = id.map_err(|r| path_rejection(correlation_id, r))?;

    let mut store = state.store().write().await;
    let request: LeaveRequest = store
        .decide_leave(id, decision)
        .map_err(|e| failure(correlation_id, e))?
        .clone();

    info!(
        correlation_id = %correlation_id,
        leave_request_id = id,
        status = %request.status,
        decided_by = %session.username,
        "Leave request decided"
    );
    Ok(json_response(StatusCode::OK, request))
}

/// Handler for POST /leave-requests/:id/approve.
async fn approve_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
) -> HandlerResult {
    decide_leave(state, headers, id, LeaveDecision::Approve).await
}

/// Handler for POST /leave-requests/:id/reject.
async fn reject_leave_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: Result<Path<u64>, PathRejection>,
) -> HandlerResult {
    decide_leave(state, headers, id, LeaveDecision::Reject).await
}

// Bulk import

/// Handler for POST /employees/import.
///
/// The body is the CSV document itself. Validation and commit both run
/// under the store's write lock, so no other writer can claim an email
/// between the two steps. The response is 200 with the per-row report
/// whenever the header row is readable.
async fn import_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let session = admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        bytes = body.len(),
        imported_by = %session.username,
        "Processing employee import"
    );

    let text = String::from_utf8(body.to_vec()).map_err(|e| {
        failure(
            correlation_id,
            EngineError::InvalidCsv {
                reason: format!("document is not valid UTF-8: {}", e),
            },
        )
    })?;
    let rows = parse_import_csv(&text).map_err(|e| failure(correlation_id, e))?;

    let start_time = Instant::now();
    let report = {
        let mut store = state.store().write().await;
        let validator = BulkImportValidator::new(state.config().field_rules(), today());
        let outcomes = validator.validate_batch(&rows, &*store);
        commit_import(outcomes, &mut *store)
    };
    let duration = start_time.elapsed();

    info!(
        correlation_id = %correlation_id,
        total_rows = report.total_rows,
        imported = report.success_count(),
        rejected = report.error_count(),
        duration_us = duration.as_micros(),
        "Employee import completed"
    );
    Ok(json_response(StatusCode::OK, ImportResponse::from(report)))
}

/// Handler for GET /employees/import/template.
async fn import_template_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;

    let template = import_template_csv().map_err(|e| failure(correlation_id, e))?;
    Ok(attachment(
        "text/csv",
        "employee_import_template.csv".to_string(),
        template,
    ))
}

// Exports

async fn export(
    state: AppState,
    headers: HeaderMap,
    render: fn(&InMemoryStore) -> EngineResult<String>,
    content_type: &str,
    filename: String,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let session = admin_only(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;

    let start_time = Instant::now();
    let body = {
        let store = state.store().read().await;
        render(&store).map_err(|e| failure(correlation_id, e))?
    };

    info!(
        correlation_id = %correlation_id,
        filename = %filename,
        bytes = body.len(),
        exported_by = %session.username,
        duration_us = start_time.elapsed().as_micros(),
        "Export generated"
    );
    Ok(attachment(content_type, filename, body))
}

/// Handler for GET /export/employees.csv.
async fn export_employees_csv_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult {
    let filename = format!("employees_{}.csv", today().format("%Y%m%d"));
    export(state, headers, employees_csv, "text/csv", filename).await
}

/// Handler for GET /export/employees.json.
async fn export_employees_json_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult {
    let filename = format!("employees_{}.json", today().format("%Y%m%d"));
    export(state, headers, employees_json, "application/json", filename).await
}

/// Handler for GET /export/leave-summary.csv.
async fn export_leave_summary_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult {
    let filename = format!("leave_summary_{}.csv", today().format("%Y%m%d"));
    export(state, headers, leave_summary_csv, "text/csv", filename).await
}

// Reports

fn report_employees(store: &InMemoryStore, department_id: Option<u64>) -> Vec<Employee> {
    store
        .active_employees()
        .filter(|e| department_id.is_none_or(|d| e.department_id == d))
        .cloned()
        .collect()
}

/// Handler for GET /reports/attendance.
async fn attendance_report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Query(query) = query.map_err(|r| query_rejection(correlation_id, r))?;
    let period = query.period().map_err(|e| failure(correlation_id, e))?;

    let store = state.store().read().await;
    let employees = report_employees(&store, query.department_id);
    let rows = attendance_report(&employees, &store.attendance_records(&period), &period);
    Ok(json_response(StatusCode::OK, rows))
}

/// Handler for GET /reports/leave.
async fn leave_report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Query(query) = query.map_err(|r| query_rejection(correlation_id, r))?;
    let period = query.period().map_err(|e| failure(correlation_id, e))?;

    let store = state.store().read().await;
    let employees = report_employees(&store, query.department_id);
    let requests: Vec<LeaveRequest> = store.leave_requests(None).into_iter().cloned().collect();
    let rows = leave_report(&employees, &requests, &period).map_err(|e| failure(correlation_id, e))?;
    Ok(json_response(StatusCode::OK, rows))
}

/// Handler for GET /reports/payroll.
async fn payroll_report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    logged_in(&state, &headers)
        .await
        .map_err(|e| failure(correlation_id, e))?;
    let Query(query) = query.map_err(|r| query_rejection(correlation_id, r))?;

    let store = state.store().read().await;
    let summary = payroll_report(&report_employees(&store, query.department_id));
    Ok(json_response(StatusCode::OK, summary))
}
