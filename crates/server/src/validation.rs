//! Field-level validation.
//!
//! Validators return a structured list of [`FieldError`]s instead of
//! aborting on the first failure, so forms can annotate every violated
//! field at once.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// 5-digit or 5+4-digit US ZIP code.
pub static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip regex"));

/// Exactly four digits (SSN last four).
pub static SSN_LAST_FOUR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("valid ssn regex"));

/// A single violated field with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Push a "can't be blank" error when `value` is empty or whitespace.
/// Returns true when the value is present.
pub fn require(errors: &mut Vec<FieldError>, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "can't be blank"));
        false
    } else {
        true
    }
}

/// First error message for a field, for template rendering.
#[must_use]
pub fn error_for<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a str> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| e.message.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_patterns() {
        assert!(ZIP_RE.is_match("92831"));
        assert!(ZIP_RE.is_match("92831-1234"));
        assert!(!ZIP_RE.is_match("9283"));
        assert!(!ZIP_RE.is_match("92831-12"));
        assert!(!ZIP_RE.is_match("abcde"));
    }

    #[test]
    fn test_ssn_last_four_pattern() {
        assert!(SSN_LAST_FOUR_RE.is_match("1234"));
        assert!(!SSN_LAST_FOUR_RE.is_match("123"));
        assert!(!SSN_LAST_FOUR_RE.is_match("12345"));
        assert!(!SSN_LAST_FOUR_RE.is_match("12a4"));
    }

    #[test]
    fn test_require() {
        let mut errors = Vec::new();
        assert!(require(&mut errors, "city", "Fullerton"));
        assert!(!require(&mut errors, "state", "   "));
        assert_eq!(errors.len(), 1);
        assert_eq!(error_for(&errors, "state"), Some("can't be blank"));
        assert_eq!(error_for(&errors, "city"), None);
    }
}
