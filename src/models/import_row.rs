//! Raw rows submitted for bulk employee import.

use serde::{Deserialize, Serialize};

/// One candidate employee exactly as submitted, before validation.
///
/// Every field is the raw cell text. Rows are never persisted; the validator
/// turns each into either a [`NewEmployee`](super::NewEmployee) or a list of
/// errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeImportRow {
    /// 1-based position of the row among the submitted data rows.
    pub row_number: usize,
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Department name, resolved case-insensitively.
    pub department_name: String,
    /// Job role title, resolved case-insensitively.
    pub role_name: String,
    /// Annual salary.
    pub salary: String,
    /// Joining date.
    pub date_joined: String,
}
