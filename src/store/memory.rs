//! In-memory store.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::calculation::{AttendanceSummary, department_attendance, leave_days};
use crate::config::WorkflowConfig;
use crate::error::{EngineError, EngineResult};
use crate::import::{EmployeeSink, ImportDirectory};
use crate::models::{
    AttendanceRecord, AttendanceStatus, Department, Employee, EmployeeStatus, JobRole,
    LeaveDecision, LeaveRequest, LeaveStatus, NewEmployee, ReportPeriod, User, UserRole,
};

/// Whether marking attendance created a record or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMark {
    /// No record existed for the (employee, date).
    Created,
    /// The existing record for the (employee, date) was replaced.
    Updated,
}

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Employees with status Active.
    pub total_employees: usize,
    /// Departments.
    pub total_departments: usize,
    /// Job roles.
    pub total_roles: usize,
    /// Leave requests awaiting a decision.
    pub pending_leaves: usize,
    /// Attendance records dated today.
    pub today_attendance: usize,
}

/// Sequential id generator.
#[derive(Debug, Clone, Default)]
struct IdSequence(u64);

impl IdSequence {
    fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

/// Holds every entity in memory.
///
/// Ids are assigned sequentially from 1 per entity kind. Attendance is keyed
/// by (employee, date) so there is at most one record per employee per day.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    users: BTreeMap<u64, User>,
    departments: BTreeMap<u64, Department>,
    roles: BTreeMap<u64, JobRole>,
    employees: BTreeMap<u64, Employee>,
    attendance: BTreeMap<(u64, NaiveDate), AttendanceRecord>,
    leave_requests: BTreeMap<u64, LeaveRequest>,
    user_ids: IdSequence,
    department_ids: IdSequence,
    role_ids: IdSequence,
    employee_ids: IdSequence,
    leave_ids: IdSequence,
}

fn required(value: &str, field: &str) -> EngineResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::ValidationFailed {
            errors: vec![format!("{field}: required field is missing or empty")],
        });
    }
    Ok(trimmed.to_string())
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the configured departments and roles.
    pub fn from_config(config: &WorkflowConfig) -> EngineResult<Self> {
        let mut store = Self::new();
        for seed in config.departments() {
            store.create_department(&seed.name, seed.description.clone())?;
        }
        for seed in config.roles() {
            store.create_role(&seed.title, seed.description.clone())?;
        }
        debug!(
            departments = store.departments.len(),
            roles = store.roles.len(),
            "Seeded store from configuration"
        );
        Ok(store)
    }

    // Users

    /// Adds a login account with an already hashed password.
    pub fn add_user(
        &mut self,
        username: &str,
        password_hash: String,
        role: UserRole,
    ) -> EngineResult<&User> {
        let username = required(username, "username")?;
        if self.user_by_username(&username).is_some() {
            return Err(EngineError::DuplicateUsername { username });
        }
        let id = self.user_ids.next();
        let user = self.users.entry(id).or_insert(User {
            id,
            username,
            password_hash,
            role,
        });
        Ok(&*user)
    }

    /// Looks up an account by exact username.
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    // Departments and roles

    /// All departments in id order.
    pub fn departments(&self) -> impl Iterator<Item = &Department> {
        self.departments.values()
    }

    /// Looks up a department by id.
    pub fn department(&self, id: u64) -> EngineResult<&Department> {
        self.departments
            .get(&id)
            .ok_or_else(|| EngineError::DepartmentNotFound {
                name: id.to_string(),
            })
    }

    /// Creates a department. Names are unique ignoring case.
    pub fn create_department(
        &mut self,
        name: &str,
        description: Option<String>,
    ) -> EngineResult<Department> {
        let name = required(name, "name")?;
        if self.departments.values().any(|d| d.matches(&name)) {
            return Err(EngineError::DuplicateDepartment { name });
        }
        let department = Department {
            id: self.department_ids.next(),
            name,
            description,
        };
        self.departments.insert(department.id, department.clone());
        Ok(department)
    }

    /// Renames a department and replaces its description.
    pub fn update_department(
        &mut self,
        id: u64,
        name: &str,
        description: Option<String>,
    ) -> EngineResult<&Department> {
        self.department(id)?;
        let name = required(name, "name")?;
        if self.departments.values().any(|d| d.id != id && d.matches(&name)) {
            return Err(EngineError::DuplicateDepartment { name });
        }
        let department = self
            .departments
            .get_mut(&id)
            .ok_or_else(|| EngineError::DepartmentNotFound {
                name: id.to_string(),
            })?;
        department.name = name;
        department.description = description;
        Ok(&*department)
    }

    /// Deletes a department nobody is assigned to.
    ///
    /// Inactive employees still count, since their records keep pointing at
    /// the department.
    pub fn delete_department(&mut self, id: u64) -> EngineResult<Department> {
        let name = self.department(id)?.name.clone();
        let employees = self.employees.values().filter(|e| e.department_id == id).count();
        if employees > 0 {
            return Err(EngineError::DepartmentInUse { name, employees });
        }
        self.departments
            .remove(&id)
            .ok_or(EngineError::DepartmentNotFound { name })
    }

    /// All job roles in id order.
    pub fn roles(&self) -> impl Iterator<Item = &JobRole> {
        self.roles.values()
    }

    /// Looks up a job role by id.
    pub fn role(&self, id: u64) -> EngineResult<&JobRole> {
        self.roles.get(&id).ok_or_else(|| EngineError::RoleNotFound {
            title: id.to_string(),
        })
    }

    /// Creates a job role. Titles are unique ignoring case.
    pub fn create_role(
        &mut self,
        title: &str,
        description: Option<String>,
    ) -> EngineResult<JobRole> {
        let title = required(title, "title")?;
        if self.roles.values().any(|r| r.matches(&title)) {
            return Err(EngineError::DuplicateRole { title });
        }
        let role = JobRole {
            id: self.role_ids.next(),
            title,
            description,
        };
        self.roles.insert(role.id, role.clone());
        Ok(role)
    }

    /// Renames a job role and replaces its description.
    pub fn update_role(
        &mut self,
        id: u64,
        title: &str,
        description: Option<String>,
    ) -> EngineResult<&JobRole> {
        self.role(id)?;
        let title = required(title, "title")?;
        if self.roles.values().any(|r| r.id != id && r.matches(&title)) {
            return Err(EngineError::DuplicateRole { title });
        }
        let role = self.roles.get_mut(&id).ok_or_else(|| EngineError::RoleNotFound {
            title: id.to_string(),
        })?;
        role.title = title;
        role.description = description;
        Ok(&*role)
    }

    /// Deletes a job role nobody holds, active or not.
    pub fn delete_role(&mut self, id: u64) -> EngineResult<JobRole> {
        let title = self.role(id)?.title.clone();
        let employees = self.employees.values().filter(|e| e.role_id == id).count();
        if employees > 0 {
            return Err(EngineError::RoleInUse { title, employees });
        }
        self.roles.remove(&id).ok_or(EngineError::RoleNotFound { title })
    }

    // Employees

    /// Every employee, active or not, in id order.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    /// Active employees in id order.
    pub fn active_employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values().filter(|e| e.is_active())
    }

    /// Active employees of one department, in id order.
    pub fn active_employees_in(&self, department_id: u64) -> impl Iterator<Item = &Employee> {
        self.active_employees()
            .filter(move |e| e.department_id == department_id)
    }

    /// Looks up an employee by id.
    pub fn employee(&self, id: u64) -> EngineResult<&Employee> {
        self.employees
            .get(&id)
            .ok_or(EngineError::EmployeeNotFound { id })
    }

    /// Inserts a validated employee and returns its id.
    ///
    /// Emails are unique across active and inactive employees, compared in
    /// lowercase. The department and role must exist.
    pub fn insert_employee(&mut self, new: NewEmployee) -> EngineResult<u64> {
        let email = new.email.trim().to_lowercase();
        if self.email_exists(&email) {
            return Err(EngineError::DuplicateEmail { email });
        }
        self.department(new.department_id)?;
        self.role(new.role_id)?;

        let id = self.employee_ids.next();
        let employee = Employee::from_new(id, NewEmployee { email, ..new });
        self.employees.insert(id, employee);
        Ok(id)
    }

    /// Employees, active or not, whose name or email contains `term`,
    /// ignoring case.
    pub fn search_employees(&self, term: &str) -> impl Iterator<Item = &Employee> {
        let term = term.trim().to_lowercase();
        self.employees.values().filter(move |e| {
            e.name.to_lowercase().contains(&term) || e.email.contains(&term)
        })
    }

    /// Replaces an employee's details and status.
    ///
    /// The same checks as [`InMemoryStore::insert_employee`] apply, except
    /// that the employee's own email does not count as taken.
    pub fn update_employee(
        &mut self,
        id: u64,
        update: NewEmployee,
        status: EmployeeStatus,
    ) -> EngineResult<&Employee> {
        self.employee(id)?;
        let email = update.email.trim().to_lowercase();
        if self.employees.values().any(|e| e.id != id && e.email == email) {
            return Err(EngineError::DuplicateEmail { email });
        }
        self.department(update.department_id)?;
        self.role(update.role_id)?;

        let employee = self
            .employees
            .get_mut(&id)
            .ok_or(EngineError::EmployeeNotFound { id })?;
        *employee = Employee {
            status,
            ..Employee::from_new(id, NewEmployee { email, ..update })
        };
        Ok(&*employee)
    }

    /// Marks an employee inactive. Records are kept.
    pub fn deactivate_employee(&mut self, id: u64) -> EngineResult<&Employee> {
        let employee = self
            .employees
            .get_mut(&id)
            .ok_or(EngineError::EmployeeNotFound { id })?;
        employee.status = EmployeeStatus::Inactive;
        Ok(&*employee)
    }

    // Attendance

    /// Records attendance, replacing any record for the same employee and date.
    pub fn mark_attendance(
        &mut self,
        employee_id: u64,
        date: NaiveDate,
        status: AttendanceStatus,
        notes: Option<String>,
    ) -> EngineResult<AttendanceMark> {
        self.employee(employee_id)?;
        let record = AttendanceRecord {
            employee_id,
            date,
            status,
            notes,
        };
        Ok(match self.attendance.insert((employee_id, date), record) {
            Some(_) => AttendanceMark::Updated,
            None => AttendanceMark::Created,
        })
    }

    /// Every attendance record within `period`, ordered by employee then date.
    pub fn attendance_records(&self, period: &ReportPeriod) -> Vec<AttendanceRecord> {
        self.attendance
            .values()
            .filter(|r| period.contains_date(r.date))
            .cloned()
            .collect()
    }

    /// One employee's attendance within `period`, ordered by date.
    pub fn attendance_for_employee(
        &self,
        employee_id: u64,
        period: &ReportPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        self.employee(employee_id)?;
        Ok(self
            .attendance
            .range((employee_id, NaiveDate::MIN)..=(employee_id, NaiveDate::MAX))
            .map(|(_, record)| record)
            .filter(|r| period.contains_date(r.date))
            .cloned()
            .collect())
    }

    /// Attendance summary over the active members of a department.
    pub fn department_attendance(
        &self,
        department_id: u64,
        period: &ReportPeriod,
    ) -> EngineResult<AttendanceSummary> {
        self.department(department_id)?;
        let members: HashSet<u64> = self
            .active_employees_in(department_id)
            .map(|e| e.id)
            .collect();
        Ok(department_attendance(&self.attendance_records(period), &members))
    }

    // Leave

    /// Submits a pending leave request.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidRange`] when `end_date` is before `start_date`,
    /// [`EngineError::EmployeeNotFound`] for an unknown employee.
    pub fn create_leave_request(
        &mut self,
        employee_id: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        leave_type: &str,
        reason: Option<String>,
        submitted_at: DateTime<Utc>,
    ) -> EngineResult<LeaveRequest> {
        self.employee(employee_id)?;
        leave_days(start_date, end_date)?;
        let leave_type = required(leave_type, "leave_type")?;

        let request = LeaveRequest {
            id: self.leave_ids.next(),
            employee_id,
            start_date,
            end_date,
            leave_type,
            reason,
            status: LeaveStatus::Pending,
            submitted_at,
        };
        self.leave_requests.insert(request.id, request.clone());
        Ok(request)
    }

    /// Leave requests in id order, optionally only those with `status`.
    pub fn leave_requests(&self, status: Option<LeaveStatus>) -> Vec<&LeaveRequest> {
        self.leave_requests
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .collect()
    }

    /// One employee's leave requests in id order.
    pub fn leave_requests_for_employee(&self, employee_id: u64) -> Vec<&LeaveRequest> {
        self.leave_requests
            .values()
            .filter(|r| r.employee_id == employee_id)
            .collect()
    }

    /// Applies an approve/reject decision to a request.
    ///
    /// A failed transition leaves the request unchanged.
    pub fn decide_leave(&mut self, id: u64, decision: LeaveDecision) -> EngineResult<&LeaveRequest> {
        let request = self
            .leave_requests
            .get_mut(&id)
            .ok_or(EngineError::LeaveRequestNotFound { id })?;
        request.decide(decision)?;
        Ok(&*request)
    }

    // Dashboard

    /// Headline counts for `today`.
    pub fn dashboard_stats(&self, today: NaiveDate) -> DashboardStats {
        DashboardStats {
            total_employees: self.active_employees().count(),
            total_departments: self.departments.len(),
            total_roles: self.roles.len(),
            pending_leaves: self.leave_requests.values().filter(|r| r.is_pending()).count(),
            today_attendance: self.attendance.values().filter(|r| r.date == today).count(),
        }
    }
}

impl ImportDirectory for InMemoryStore {
    fn email_exists(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.employees.values().any(|e| e.email == email)
    }

    fn department_by_name(&self, name: &str) -> Option<&Department> {
        self.departments.values().find(|d| d.matches(name))
    }

    fn role_by_title(&self, title: &str) -> Option<&JobRole> {
        self.roles.values().find(|r| r.matches(title))
    }
}

impl EmployeeSink for InMemoryStore {
    fn insert_employee(&mut self, employee: NewEmployee) -> EngineResult<u64> {
        InMemoryStore::insert_employee(self, employee)
    }
}
