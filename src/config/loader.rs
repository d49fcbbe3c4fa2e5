//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading WorkFlowX
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::import::FieldRules;

use super::types::{
    DepartmentsConfig, OrganisationMetadata, RolesConfig, ValidationConfig, WorkflowConfig,
};

/// Loads and provides access to WorkFlowX configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// compiles the validation patterns once, so a bad pattern fails at startup
/// rather than on the first import.
///
/// # Directory Structure
///
/// ```text
/// config/workflowx/
/// ├── organisation.yaml   # Name, version, password hash cost
/// ├── departments.yaml    # Seed departments
/// ├── roles.yaml          # Seed job roles
/// └── validation.yaml     # Field patterns and limits
/// ```
///
/// # Example
///
/// ```no_run
/// use workflowx::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/workflowx").unwrap();
/// println!("Organisation: {}", loader.organisation().name);
/// println!("Seed departments: {}", loader.config().departments().len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: WorkflowConfig,
    field_rules: FieldRules,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A validation pattern does not compile
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let organisation = Self::load_yaml::<OrganisationMetadata>(&path.join("organisation.yaml"))?;
        let departments = Self::load_yaml::<DepartmentsConfig>(&path.join("departments.yaml"))?;
        let roles = Self::load_yaml::<RolesConfig>(&path.join("roles.yaml"))?;
        let validation = Self::load_yaml::<ValidationConfig>(&path.join("validation.yaml"))?;

        Self::from_config(WorkflowConfig::new(
            organisation,
            departments.departments,
            roles.roles,
            validation,
        ))
    }

    /// Builds a loader from an already assembled configuration.
    ///
    /// Used by tests and benchmarks that do not want to touch the filesystem.
    pub fn from_config(config: WorkflowConfig) -> EngineResult<Self> {
        let field_rules = FieldRules::from_config(config.validation())?;
        Ok(Self {
            config,
            field_rules,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Returns the organisation metadata.
    pub fn organisation(&self) -> &OrganisationMetadata {
        self.config.organisation()
    }

    /// Returns the compiled field validation rules.
    pub fn field_rules(&self) -> &FieldRules {
        &self.field_rules
    }

    /// Returns the bcrypt cost for new password hashes.
    pub fn password_hash_cost(&self) -> u32 {
        self.config.organisation().security.password_hash_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DepartmentSeed, RoleSeed, SecurityConfig};

    fn config_path() -> &'static str {
        "./config/workflowx"
    }

    fn organisation() -> OrganisationMetadata {
        OrganisationMetadata {
            name: "Test Org".to_string(),
            version: "test".to_string(),
            security: SecurityConfig::default(),
        }
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.organisation().name, "WorkFlowX");
        assert_eq!(loader.password_hash_cost(), 12);
    }

    #[test]
    fn test_seed_departments_and_roles_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let departments: Vec<&str> = loader
            .config()
            .departments()
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(
            departments,
            vec![
                "Technology & Infrastructure",
                "Human Resources",
                "Sales",
                "Marketing",
                "Finance"
            ]
        );
        assert!(
            loader
                .config()
                .roles()
                .iter()
                .any(|r| r.title == "Software Engineer")
        );
    }

    #[test]
    fn test_validation_rules_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let validation = loader.config().validation();
        assert!(!validation.phone_required);
        assert_eq!(validation.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("organisation.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_uncompilable_pattern_is_parse_error() {
        let validation = ValidationConfig {
            email_pattern: "([a-z".to_string(),
            ..ValidationConfig::default()
        };
        let config = WorkflowConfig::new(organisation(), Vec::new(), Vec::new(), validation);

        match ConfigLoader::from_config(config) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "validation.email_pattern");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_keeps_seeds() {
        let config = WorkflowConfig::new(
            organisation(),
            vec![DepartmentSeed {
                name: "Sales".to_string(),
                description: None,
            }],
            vec![RoleSeed {
                title: "Account Executive".to_string(),
                description: None,
            }],
            ValidationConfig::default(),
        );
        let loader = ConfigLoader::from_config(config).unwrap();
        assert_eq!(loader.config().departments().len(), 1);
        assert_eq!(loader.config().roles()[0].title, "Account Executive");
    }
}
