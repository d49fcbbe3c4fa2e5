//! CSV reading and the import template.

use std::collections::HashMap;

use csv::StringRecord;

use crate::error::{EngineError, EngineResult};
use crate::models::EmployeeImportRow;

/// Required CSV column headers (case-insensitive, normalised).
pub const IMPORT_HEADERS: [&str; 7] = [
    "name",
    "email",
    "phone",
    "department",
    "role",
    "salary",
    "date_joined",
];

/// Example row shipped in the downloadable template.
const TEMPLATE_ROW: [&str; 7] = [
    "John Doe",
    "john.doe@company.com",
    "555-1234",
    "Technology & Infrastructure",
    "Software Engineer",
    "75000",
    "2024-01-15",
];

/// Normalises a CSV header for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn header_index(headers: &StringRecord) -> EngineResult<HashMap<&'static str, usize>> {
    let normalized: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (normalize_header(header), idx))
        .collect();

    let mut index = HashMap::new();
    let mut missing = Vec::new();
    for required in IMPORT_HEADERS {
        match normalized.get(required) {
            Some(&idx) => {
                index.insert(required, idx);
            }
            None => missing.push(required),
        }
    }

    if !missing.is_empty() {
        return Err(EngineError::InvalidCsv {
            reason: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(index)
}

/// Reads an import document into raw rows.
///
/// The first line is the header. Extra columns are ignored and short rows
/// read missing cells as empty strings. Blank lines are skipped entirely and
/// do not take a row number.
///
/// # Errors
///
/// Returns [`EngineError::InvalidCsv`] when the header is unreadable or lacks
/// a required column, or when a record cannot be parsed.
///
/// # Example
///
/// ```
/// use workflowx::import::parse_import_csv;
///
/// let rows = parse_import_csv(
///     "Name,Email,Phone,Department,Role,Salary,Date Joined\n\
///      Ada,ada@company.com,,Finance,Financial Analyst,90000,2024-02-01\n",
/// )
/// .unwrap();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].row_number, 1);
/// assert_eq!(rows[0].department_name, "Finance");
/// ```
pub fn parse_import_csv(text: &str) -> EngineResult<Vec<EmployeeImportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| EngineError::InvalidCsv {
            reason: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();
    let index = header_index(&headers)?;

    let mut rows = Vec::new();
    for (position, result) in reader.records().enumerate() {
        let row_number = position + 1;
        let record = result.map_err(|e| EngineError::InvalidCsv {
            reason: format!("Failed to read row {row_number}: {e}"),
        })?;

        let field = |name: &str| -> String {
            index
                .get(name)
                .and_then(|&idx| record.get(idx))
                .unwrap_or_default()
                .to_string()
        };

        rows.push(EmployeeImportRow {
            row_number,
            name: field("name"),
            email: field("email"),
            phone: field("phone"),
            department_name: field("department"),
            role_name: field("role"),
            salary: field("salary"),
            date_joined: field("date_joined"),
        });
    }

    Ok(rows)
}

/// The downloadable import template: header plus one example row.
pub fn import_template_csv() -> EngineResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(IMPORT_HEADERS)?;
    writer.write_record(TEMPLATE_ROW)?;
    let bytes = writer.into_inner().map_err(|e| EngineError::Export {
        message: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| EngineError::Export {
        message: e.to_string(),
    })
}
