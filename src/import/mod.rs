//! Bulk employee import.
//!
//! An import runs in three steps:
//! 1. [`parse_import_csv`] reads the uploaded document into raw rows.
//! 2. [`BulkImportValidator`] checks every row against [`FieldRules`] and an
//!    [`ImportDirectory`], producing one [`ImportOutcome`] per row.
//! 3. [`commit_import`] inserts the accepted rows into an [`EmployeeSink`]
//!    one at a time and summarises the result in an [`ImportReport`].
//!
//! Only the last step writes anything.

mod commit;
mod csv_source;
mod field_rules;
mod row_error;
mod validator;

pub use commit::{EmployeeSink, ImportReport, ImportedRow, RejectedRow, commit_import};
pub use csv_source::{IMPORT_HEADERS, import_template_csv, parse_import_csv};
pub use field_rules::FieldRules;
pub use row_error::RowError;
pub use validator::{BulkImportValidator, ImportDirectory, ImportOutcome, ImportSnapshot};
