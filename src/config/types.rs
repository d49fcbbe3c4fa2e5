//! Configuration types for WorkFlowX.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Default email pattern for imported and created employees.
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Default phone pattern: optional `+`, up to two optionally parenthesised
/// digit groups, then a final digit group, separated by `-`, space or `.`.
pub const DEFAULT_PHONE_PATTERN: &str =
    r"^[\+]?[(]?[0-9]{1,4}[)]?[-\s\.]?[(]?[0-9]{1,4}[)]?[-\s\.]?[0-9]{1,9}$";

/// Default `date_joined` format.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default bcrypt cost for stored password hashes.
pub const DEFAULT_PASSWORD_HASH_COST: u32 = 12;

/// Metadata about the organisation this instance serves.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganisationMetadata {
    /// Display name of the organisation.
    pub name: String,
    /// Configuration version string.
    pub version: String,
    /// Authentication settings.
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Authentication settings from organisation.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// bcrypt cost used when hashing new passwords.
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            password_hash_cost: DEFAULT_PASSWORD_HASH_COST,
        }
    }
}

fn default_password_hash_cost() -> u32 {
    DEFAULT_PASSWORD_HASH_COST
}

/// A department created when the store starts.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentSeed {
    /// Department name, unique case-insensitively.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// departments.yaml file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentsConfig {
    /// Seed departments in id order.
    pub departments: Vec<DepartmentSeed>,
}

/// A job role created when the store starts.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleSeed {
    /// Role title, unique case-insensitively.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// roles.yaml file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    /// Seed roles in id order.
    pub roles: Vec<RoleSeed>,
}

/// Field validation rules from validation.yaml.
///
/// Every field is optional in the file; anything left out falls back to the
/// defaults above.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Regex an email must match (after trimming and lowercasing).
    pub email_pattern: String,
    /// Regex a non-empty phone must match.
    pub phone_pattern: String,
    /// Whether an empty phone is a rejection.
    pub phone_required: bool,
    /// chrono format string for `date_joined`.
    pub date_format: String,
    /// Inclusive upper bound on salary, or no bound when absent.
    pub max_salary: Option<Decimal>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            email_pattern: DEFAULT_EMAIL_PATTERN.to_string(),
            phone_pattern: DEFAULT_PHONE_PATTERN.to_string(),
            phone_required: false,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            max_salary: Some(Decimal::from(10_000_000)),
        }
    }
}

/// The complete configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    organisation: OrganisationMetadata,
    departments: Vec<DepartmentSeed>,
    roles: Vec<RoleSeed>,
    validation: ValidationConfig,
}

impl WorkflowConfig {
    /// Creates a new WorkflowConfig from its component parts.
    pub fn new(
        organisation: OrganisationMetadata,
        departments: Vec<DepartmentSeed>,
        roles: Vec<RoleSeed>,
        validation: ValidationConfig,
    ) -> Self {
        Self {
            organisation,
            departments,
            roles,
            validation,
        }
    }

    /// Returns the organisation metadata.
    pub fn organisation(&self) -> &OrganisationMetadata {
        &self.organisation
    }

    /// Returns the seed departments.
    pub fn departments(&self) -> &[DepartmentSeed] {
        &self.departments
    }

    /// Returns the seed roles.
    pub fn roles(&self) -> &[RoleSeed] {
        &self.roles
    }

    /// Returns the validation rules.
    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_validation_uses_defaults() {
        let config: ValidationConfig = serde_yaml::from_str("phone_required: true\n").unwrap();
        assert!(config.phone_required);
        assert_eq!(config.email_pattern, DEFAULT_EMAIL_PATTERN);
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.max_salary, Some(Decimal::from(10_000_000)));
    }

    #[test]
    fn test_organisation_without_security_uses_default_cost() {
        let org: OrganisationMetadata =
            serde_yaml::from_str("name: Acme\nversion: \"1\"\n").unwrap();
        assert_eq!(org.security.password_hash_cost, DEFAULT_PASSWORD_HASH_COST);
    }

    #[test]
    fn test_max_salary_can_be_removed() {
        let config: ValidationConfig = serde_yaml::from_str("max_salary: null\n").unwrap();
        assert_eq!(config.max_salary, None);
    }
}
