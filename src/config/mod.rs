//! Configuration loading and management for WorkFlowX.
//!
//! This module provides functionality to load the organisation settings,
//! seed departments and roles, and field validation rules from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use workflowx::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/workflowx").unwrap();
//! println!("Loaded organisation: {}", config.organisation().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_DATE_FORMAT, DEFAULT_EMAIL_PATTERN, DEFAULT_PASSWORD_HASH_COST, DEFAULT_PHONE_PATTERN,
    DepartmentSeed, DepartmentsConfig, OrganisationMetadata, RoleSeed, RolesConfig,
    SecurityConfig, ValidationConfig, WorkflowConfig,
};
