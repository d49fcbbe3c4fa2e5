//! HTTP API module for WorkFlowX.
//!
//! This module provides the REST API endpoints for employees, departments,
//! roles, attendance, leave, bulk import, exports and reports. Callers log
//! in with `POST /login` and send the returned token as
//! `Authorization: Bearer <token>`.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CreateDepartmentRequest, CreateEmployeeRequest, CreateRoleRequest, CreateUserRequest,
    EmployeeListQuery, LeaveListQuery, LoginRequest, MarkAttendanceRequest, ReportQuery,
    SubmitLeaveRequest, UpdateEmployeeRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, AttendanceMarkResponse, DepartmentAttendanceResponse,
    EmployeeAttendanceResponse, ImportResponse, LeaveSubmittedResponse, LoginResponse,
    UserCreatedResponse,
};
pub use state::AppState;
