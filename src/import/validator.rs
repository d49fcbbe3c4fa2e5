//! Bulk import validation.
//!
//! [`BulkImportValidator`] turns raw [`EmployeeImportRow`]s into an ordered
//! list of [`ImportOutcome`]s. Every check runs on every row, so a rejected
//! row reports all of its problems at once. The validator reads existing
//! emails, departments and roles through [`ImportDirectory`] and never
//! writes anything.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Department, EmployeeImportRow, JobRole, NewEmployee};

use super::field_rules::FieldRules;
use super::row_error::RowError;

/// Read-side view of stored data consulted during validation.
pub trait ImportDirectory {
    /// Whether an employee with this (normalised) email is stored.
    fn email_exists(&self, email: &str) -> bool;

    /// Case-insensitive lookup of a department by trimmed name.
    fn department_by_name(&self, name: &str) -> Option<&Department>;

    /// Case-insensitive lookup of a job role by trimmed title.
    fn role_by_title(&self, title: &str) -> Option<&JobRole>;
}

/// Result of validating one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// Every check passed; `employee` is ready to insert.
    Accepted {
        /// 1-based data row position.
        row_number: usize,
        /// The cleaned, resolved employee.
        employee: NewEmployee,
    },
    /// At least one check failed.
    Rejected {
        /// 1-based data row position.
        row_number: usize,
        /// Every failed check, in field order.
        #[serde(serialize_with = "serialize_errors")]
        errors: Vec<RowError>,
    },
}

fn serialize_errors<S: serde::Serializer>(errors: &[RowError], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(ToString::to_string))
}

impl ImportOutcome {
    /// The row this outcome belongs to.
    pub fn row_number(&self) -> usize {
        match self {
            ImportOutcome::Accepted { row_number, .. } | ImportOutcome::Rejected { row_number, .. } => {
                *row_number
            }
        }
    }

    /// Whether the row passed validation.
    pub fn is_accepted(&self) -> bool {
        matches!(self, ImportOutcome::Accepted { .. })
    }
}

/// Validates import batches against field rules and a directory.
///
/// `today` is injected so "not in the future" is deterministic.
///
/// # Example
///
/// ```
/// use workflowx::config::ValidationConfig;
/// use workflowx::import::{BulkImportValidator, FieldRules, ImportSnapshot};
/// use workflowx::models::{Department, EmployeeImportRow, JobRole};
/// use chrono::NaiveDate;
///
/// let rules = FieldRules::from_config(&ValidationConfig::default()).unwrap();
/// let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let directory = ImportSnapshot::new(
///     vec![Department { id: 1, name: "Finance".into(), description: None }],
///     vec![JobRole { id: 1, title: "Financial Analyst".into(), description: None }],
///     Vec::<String>::new(),
/// );
///
/// let row = EmployeeImportRow {
///     row_number: 1,
///     name: "Ada".into(),
///     email: "ada@company.com".into(),
///     department_name: "finance".into(),
///     role_name: "Financial Analyst".into(),
///     salary: "90000".into(),
///     date_joined: "2024-02-01".into(),
///     ..Default::default()
/// };
///
/// let outcomes = BulkImportValidator::new(&rules, today).validate_batch(&[row], &directory);
/// assert!(outcomes[0].is_accepted());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BulkImportValidator<'a> {
    rules: &'a FieldRules,
    today: NaiveDate,
}

impl<'a> BulkImportValidator<'a> {
    /// Creates a validator using `rules`, treating `today` as the current date.
    pub fn new(rules: &'a FieldRules, today: NaiveDate) -> Self {
        Self { rules, today }
    }

    /// Validates `rows` in order, returning one outcome per row.
    ///
    /// The first row to use an email claims it for the batch, whether or not
    /// that row is itself accepted. Later rows with the same email are
    /// rejected with [`RowError::DuplicateEmail`] citing the first row.
    pub fn validate_batch<D>(&self, rows: &[EmployeeImportRow], directory: &D) -> Vec<ImportOutcome>
    where
        D: ImportDirectory + ?Sized,
    {
        let mut seen_emails: HashMap<String, usize> = HashMap::new();
        rows.iter()
            .map(|row| self.validate_row(row, directory, &mut seen_emails))
            .collect()
    }

    /// Validates one row, recording its email in `seen_emails`.
    pub fn validate_row<D>(
        &self,
        row: &EmployeeImportRow,
        directory: &D,
        seen_emails: &mut HashMap<String, usize>,
    ) -> ImportOutcome
    where
        D: ImportDirectory + ?Sized,
    {
        let mut errors = Vec::new();

        let name = self.rules.check_name(&row.name).map_err(|e| errors.push(e)).ok();

        let email = match self.rules.check_email(&row.email) {
            Ok(email) => {
                if let Some(&first_row) = seen_emails.get(&email) {
                    errors.push(RowError::DuplicateEmail {
                        email: email.clone(),
                        first_row,
                    });
                } else {
                    seen_emails.insert(email.clone(), row.row_number);
                    if directory.email_exists(&email) {
                        errors.push(RowError::EmailExists {
                            email: email.clone(),
                        });
                    }
                }
                Some(email)
            }
            Err(e) => {
                errors.push(e);
                None
            }
        };

        let phone = self.rules.check_phone(&row.phone).map_err(|e| errors.push(e)).ok();

        let department_id = resolve(&row.department_name, "department", &mut errors, |name| {
            directory
                .department_by_name(name)
                .map(|d| d.id)
                .ok_or_else(|| RowError::DepartmentNotFound {
                    name: name.to_string(),
                })
        });

        let role_id = resolve(&row.role_name, "role", &mut errors, |title| {
            directory
                .role_by_title(title)
                .map(|r| r.id)
                .ok_or_else(|| RowError::RoleNotFound {
                    title: title.to_string(),
                })
        });

        let salary = self.rules.check_salary(&row.salary).map_err(|e| errors.push(e)).ok();
        let date_joined = self
            .rules
            .check_date_joined(&row.date_joined, self.today)
            .map_err(|e| errors.push(e))
            .ok();

        match (name, email, phone, department_id, role_id, salary, date_joined) {
            (
                Some(name),
                Some(email),
                Some(phone),
                Some(department_id),
                Some(role_id),
                Some(salary),
                Some(date_joined),
            ) if errors.is_empty() => ImportOutcome::Accepted {
                row_number: row.row_number,
                employee: NewEmployee {
                    name,
                    email,
                    phone,
                    department_id,
                    role_id,
                    salary,
                    date_joined,
                },
            },
            _ => ImportOutcome::Rejected {
                row_number: row.row_number,
                errors,
            },
        }
    }
}

/// Trims `raw`, reports it missing when empty, otherwise runs `lookup`.
fn resolve<F>(raw: &str, field: &'static str, errors: &mut Vec<RowError>, lookup: F) -> Option<u64>
where
    F: FnOnce(&str) -> Result<u64, RowError>,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(RowError::MissingField { field });
        return None;
    }
    lookup(trimmed).map_err(|e| errors.push(e)).ok()
}

/// An owned [`ImportDirectory`] built from plain lists.
///
/// Handy for validating without a store, and for tests.
#[derive(Debug, Clone, Default)]
pub struct ImportSnapshot {
    departments: Vec<Department>,
    roles: Vec<JobRole>,
    emails: Vec<String>,
}

impl ImportSnapshot {
    /// Creates a snapshot. Emails are normalised to trimmed lowercase.
    pub fn new<I, S>(departments: Vec<Department>, roles: Vec<JobRole>, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            departments,
            roles,
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .collect(),
        }
    }
}

impl ImportDirectory for ImportSnapshot {
    fn email_exists(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e == email)
    }

    fn department_by_name(&self, name: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.matches(name))
    }

    fn role_by_title(&self, title: &str) -> Option<&JobRole> {
        self.roles.iter().find(|r| r.matches(title))
    }
}
