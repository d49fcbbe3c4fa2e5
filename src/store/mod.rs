//! Entity storage.
//!
//! [`InMemoryStore`] owns the lifecycle of every entity: it assigns ids,
//! enforces uniqueness and upserts attendance. It is also the
//! [`ImportDirectory`](crate::import::ImportDirectory) and
//! [`EmployeeSink`](crate::import::EmployeeSink) the bulk import runs
//! against.

mod memory;

pub use memory::{AttendanceMark, DashboardStats, InMemoryStore};
