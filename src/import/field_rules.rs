//! Field-level validation rules.
//!
//! [`FieldRules`] holds the compiled patterns from `validation.yaml`. Each
//! `check_*` method validates one raw field and returns either the cleaned
//! value or the [`RowError`] describing what is wrong with it. The checks do
//! not consult storage; uniqueness and name resolution live in the
//! validator.

use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::config::ValidationConfig;
use crate::error::{EngineError, EngineResult};

use super::row_error::RowError;

/// Markup fragments stripped from free-text fields.
const MARKUP_PATTERN: &str = r"(?i)<script|</script|javascript:|onerror=|onclick=";

/// Compiled validation rules.
#[derive(Debug, Clone)]
pub struct FieldRules {
    email: Regex,
    phone: Regex,
    markup: Regex,
    phone_required: bool,
    date_format: String,
    max_salary: Option<Decimal>,
}

fn compile(pattern: &str, key: &str) -> EngineResult<Regex> {
    Regex::new(pattern).map_err(|e| EngineError::ConfigParseError {
        path: format!("validation.{key}"),
        message: e.to_string(),
    })
}

impl FieldRules {
    /// Compiles the rules described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParseError`] naming the offending key
    /// when a pattern does not compile.
    pub fn from_config(config: &ValidationConfig) -> EngineResult<Self> {
        Ok(Self {
            email: compile(&config.email_pattern, "email_pattern")?,
            phone: compile(&config.phone_pattern, "phone_pattern")?,
            markup: compile(MARKUP_PATTERN, "markup_pattern")?,
            phone_required: config.phone_required,
            date_format: config.date_format.clone(),
            max_salary: config.max_salary,
        })
    }

    /// The chrono format `date_joined` must match.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Trims `input` and strips markup-injection fragments, repeating until
    /// none are left so nested fragments cannot reassemble.
    pub fn sanitize(&self, input: &str) -> String {
        let mut current = input.trim().to_string();
        while self.markup.is_match(&current) {
            current = self.markup.replace_all(&current, "").into_owned();
        }
        current.trim().to_string()
    }

    /// Sanitised, non-empty name.
    pub fn check_name(&self, raw: &str) -> Result<String, RowError> {
        let name = self.sanitize(raw);
        if name.is_empty() {
            return Err(RowError::MissingField { field: "name" });
        }
        Ok(name)
    }

    /// Trimmed, lowercased email that matches the email pattern.
    pub fn check_email(&self, raw: &str) -> Result<String, RowError> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            return Err(RowError::MissingField { field: "email" });
        }
        if !self.email.is_match(&email) {
            return Err(RowError::InvalidEmail { email });
        }
        Ok(email)
    }

    /// Trimmed phone, or `None` when empty and not required.
    pub fn check_phone(&self, raw: &str) -> Result<Option<String>, RowError> {
        let phone = raw.trim();
        if phone.is_empty() {
            return if self.phone_required {
                Err(RowError::MissingField { field: "phone" })
            } else {
                Ok(None)
            };
        }
        if !self.phone.is_match(phone) {
            return Err(RowError::InvalidPhone {
                phone: phone.to_string(),
            });
        }
        Ok(Some(phone.to_string()))
    }

    /// Non-negative decimal salary within the configured maximum.
    ///
    /// ```
    /// use workflowx::config::ValidationConfig;
    /// use workflowx::import::{FieldRules, RowError};
    /// use rust_decimal::Decimal;
    ///
    /// let rules = FieldRules::from_config(&ValidationConfig::default()).unwrap();
    /// assert_eq!(rules.check_salary("0"), Ok(Decimal::ZERO));
    /// assert!(matches!(rules.check_salary("-100"), Err(RowError::NegativeSalary { .. })));
    /// ```
    pub fn check_salary(&self, raw: &str) -> Result<Decimal, RowError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(RowError::MissingField { field: "salary" });
        }
        let value = Decimal::from_str(text).map_err(|_| RowError::InvalidSalary {
            value: text.to_string(),
        })?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RowError::NegativeSalary { value });
        }
        if let Some(max) = self.max_salary
            && value > max
        {
            return Err(RowError::SalaryTooHigh { value, max });
        }
        Ok(value)
    }

    /// Joining date in the configured format, not after `today`.
    pub fn check_date_joined(&self, raw: &str, today: NaiveDate) -> Result<NaiveDate, RowError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(RowError::MissingField {
                field: "date_joined",
            });
        }
        let date = NaiveDate::parse_from_str(text, &self.date_format).map_err(|_| {
            RowError::InvalidDate {
                value: text.to_string(),
                format: self.date_format.clone(),
            }
        })?;
        if date > today {
            return Err(RowError::FutureDate { date });
        }
        Ok(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> FieldRules {
        FieldRules::from_config(&ValidationConfig::default()).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_sanitize_strips_markup_in_any_case() {
        let rules = rules();
        assert_eq!(rules.sanitize("  Jane <script>Doe "), "Jane >Doe");
        assert_eq!(rules.sanitize("JAVASCRIPT:alert(1)"), "alert(1)");
        assert_eq!(rules.sanitize("x onClick=y"), "x y");
    }

    #[test]
    fn test_sanitize_removes_nested_fragments() {
        assert_eq!(rules().sanitize("<scr<scriptipt"), "");
    }

    #[test]
    fn test_name_that_is_only_markup_is_missing() {
        assert_eq!(
            rules().check_name("<script"),
            Err(RowError::MissingField { field: "name" })
        );
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        assert_eq!(
            rules().check_email("  Jane.Doe@Company.COM "),
            Ok("jane.doe@company.com".to_string())
        );
    }

    #[test]
    fn test_email_without_domain_is_invalid() {
        assert_eq!(
            rules().check_email("jane.doe@"),
            Err(RowError::InvalidEmail {
                email: "jane.doe@".to_string()
            })
        );
    }

    #[test]
    fn test_empty_email_is_missing_not_invalid() {
        assert_eq!(
            rules().check_email("   "),
            Err(RowError::MissingField { field: "email" })
        );
    }

    #[test]
    fn test_phone_formats() {
        let rules = rules();
        assert_eq!(rules.check_phone("555-1234"), Ok(Some("555-1234".to_string())));
        assert_eq!(
            rules.check_phone("+1 555 1234567"),
            Ok(Some("+1 555 1234567".to_string()))
        );
        assert_eq!(rules.check_phone("(02) 9999 1234"), Ok(Some("(02) 9999 1234".to_string())));
        assert_eq!(
            rules.check_phone("555-CALL"),
            Err(RowError::InvalidPhone {
                phone: "555-CALL".to_string()
            })
        );
    }

    #[test]
    fn test_empty_phone_optional_by_default() {
        assert_eq!(rules().check_phone(""), Ok(None));
    }

    #[test]
    fn test_empty_phone_rejected_when_required() {
        let config = ValidationConfig {
            phone_required: true,
            ..ValidationConfig::default()
        };
        let rules = FieldRules::from_config(&config).unwrap();
        assert_eq!(
            rules.check_phone(" "),
            Err(RowError::MissingField { field: "phone" })
        );
    }

    #[test]
    fn test_salary_zero_is_accepted() {
        assert_eq!(rules().check_salary("0"), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_salary_negative_is_rejected() {
        assert_eq!(
            rules().check_salary("-100"),
            Err(RowError::NegativeSalary { value: dec("-100") })
        );
    }

    #[test]
    fn test_salary_not_a_number() {
        assert_eq!(
            rules().check_salary("75k"),
            Err(RowError::InvalidSalary {
                value: "75k".to_string()
            })
        );
    }

    #[test]
    fn test_salary_above_maximum() {
        assert_eq!(
            rules().check_salary("10000000.01"),
            Err(RowError::SalaryTooHigh {
                value: dec("10000000.01"),
                max: dec("10000000"),
            })
        );
        assert_eq!(rules().check_salary("10000000"), Ok(dec("10000000")));
    }

    #[test]
    fn test_date_joined_today_is_accepted() {
        assert_eq!(rules().check_date_joined("2025-03-10", today()), Ok(today()));
    }

    #[test]
    fn test_date_joined_tomorrow_is_future() {
        let tomorrow = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert_eq!(
            rules().check_date_joined("2025-03-11", today()),
            Err(RowError::FutureDate { date: tomorrow })
        );
    }

    #[test]
    fn test_date_joined_wrong_format() {
        assert_eq!(
            rules().check_date_joined("10/03/2025", today()),
            Err(RowError::InvalidDate {
                value: "10/03/2025".to_string(),
                format: "%Y-%m-%d".to_string(),
            })
        );
    }

    #[test]
    fn test_bad_phone_pattern_names_key() {
        let config = ValidationConfig {
            phone_pattern: "[".to_string(),
            ..ValidationConfig::default()
        };
        match FieldRules::from_config(&config) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "validation.phone_pattern")
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
