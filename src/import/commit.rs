//! Row-by-row import commit.
//!
//! Each accepted row is inserted on its own. A failed insert rejects that row
//! only: rows committed before it stay committed and later rows still run.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::EngineResult;
use crate::models::NewEmployee;

use super::validator::ImportOutcome;

/// Write-side collaborator the committer inserts employees into.
pub trait EmployeeSink {
    /// Inserts one employee and returns its new id.
    ///
    /// Implementations enforce email uniqueness at insert time, so a row that
    /// passed validation can still fail here if the email was taken since.
    fn insert_employee(&mut self, employee: NewEmployee) -> EngineResult<u64>;
}

/// An imported row and the id it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedRow {
    /// 1-based data row position.
    pub row_number: usize,
    /// Id assigned by the sink.
    pub employee_id: u64,
}

/// A row that was not imported, with its messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based data row position.
    pub row_number: usize,
    /// Validation or insert failures.
    pub errors: Vec<String>,
}

/// Summary of a committed import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows in the batch.
    pub total_rows: usize,
    /// Rows inserted, in row order.
    pub imported: Vec<ImportedRow>,
    /// Rows not inserted, in row order.
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    /// Number of rows inserted.
    pub fn success_count(&self) -> usize {
        self.imported.len()
    }

    /// Number of rows not inserted.
    pub fn error_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Inserts every accepted outcome into `sink`, one row at a time.
pub fn commit_import<S>(outcomes: Vec<ImportOutcome>, sink: &mut S) -> ImportReport
where
    S: EmployeeSink + ?Sized,
{
    let mut report = ImportReport {
        total_rows: outcomes.len(),
        ..ImportReport::default()
    };

    for outcome in outcomes {
        match outcome {
            ImportOutcome::Accepted {
                row_number,
                employee,
            } => match sink.insert_employee(employee) {
                Ok(employee_id) => {
                    debug!(row_number, employee_id, "Imported row");
                    report.imported.push(ImportedRow {
                        row_number,
                        employee_id,
                    });
                }
                Err(e) => {
                    warn!(row_number, error = %e, "Insert failed for validated row");
                    report.rejected.push(RejectedRow {
                        row_number,
                        errors: vec![e.to_string()],
                    });
                }
            },
            ImportOutcome::Rejected { row_number, errors } => {
                report.rejected.push(RejectedRow {
                    row_number,
                    errors: errors.iter().map(ToString::to_string).collect(),
                });
            }
        }
    }

    report
}
