//! Departments and job roles.

use serde::{Deserialize, Serialize};

/// An organisational department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// Department name, unique ignoring case.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A job role (title) employees can hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRole {
    /// Unique identifier assigned by the store.
    pub id: u64,
    /// Role title, unique ignoring case.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Case-insensitive exact comparison used for department and role lookups.
///
/// Both sides are trimmed; no other normalisation is applied.
///
/// # Examples
///
/// ```
/// use workflowx::models::names_match;
///
/// assert!(names_match("Human Resources", "  human resources "));
/// assert!(!names_match("Human Resources", "Human"));
/// ```
pub fn names_match(stored: &str, candidate: &str) -> bool {
    stored.trim().to_lowercase() == candidate.trim().to_lowercase()
}

impl Department {
    /// Returns true if `name` refers to this department.
    pub fn matches(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

impl JobRole {
    /// Returns true if `title` refers to this role.
    pub fn matches(&self, title: &str) -> bool {
        names_match(&self.title, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_matches_ignoring_case() {
        let department = Department {
            id: 1,
            name: "Finance".to_string(),
            description: None,
        };
        assert!(department.matches("finance"));
        assert!(department.matches("FINANCE "));
        assert!(!department.matches("Fin"));
        assert!(!department.matches("Finances"));
    }

    #[test]
    fn test_role_matches_ignoring_case() {
        let role = JobRole {
            id: 2,
            title: "Software Engineer".to_string(),
            description: Some("Builds software".to_string()),
        };
        assert!(role.matches("software engineer"));
        assert!(!role.matches("Senior Software Engineer"));
    }

    #[test]
    fn test_unicode_case_folding() {
        assert!(names_match("Études", "ÉTUDES"));
    }
}
