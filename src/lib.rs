//! WorkFlowX employee management engine.
//!
//! This crate tracks employees, departments and job roles, records daily
//! attendance, runs leave requests through an approval workflow and imports
//! employees in bulk from CSV with per-row validation. The pure calculations
//! (attendance percentage, inclusive leave days, report aggregation) live in
//! [`calculation`]; [`store`] holds the entities; [`api`] serves them over
//! HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod store;
