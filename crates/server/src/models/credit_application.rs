//! Credit applications and their canonical validation path.
//!
//! There is exactly one validator: [`NewCreditApplication::validate`]. It
//! parses the raw form input into a [`ValidCreditApplication`] or returns
//! every violated field, so the form can render field-level feedback in a
//! single pass.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use coffee_run_core::{CreditApplicationId, Email};

use crate::validation::{FieldError, SSN_LAST_FOUR_RE, ZIP_RE, require};

/// Raw apply-for-credit form input, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCreditApplication {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub re_enter_email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub gross_income: String,
    #[serde(default)]
    pub ssn_last_four: String,
    /// Checkbox; absent in the form body means unchecked.
    #[serde(default)]
    pub apply_for_credit: bool,
}

/// A fully validated application, ready to qualify and persist.
#[derive(Debug, Clone)]
pub struct ValidCreditApplication {
    pub email: Email,
    pub re_enter_email: Email,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub gross_income: Decimal,
    pub ssn_last_four: String,
}

/// A persisted application with its qualification outcome.
#[derive(Debug, Clone)]
pub struct CreditApplication {
    pub id: CreditApplicationId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub gross_income: Decimal,
    pub ssn_last_four: String,
    pub qualified: bool,
    pub credit_limit: Decimal,
    pub created_at: DateTime<Utc>,
}

impl NewCreditApplication {
    /// Validate the submission.
    ///
    /// # Errors
    ///
    /// Returns one [`FieldError`] per violated field; nothing may be
    /// persisted when any error is present.
    pub fn validate(&self) -> Result<ValidCreditApplication, Vec<FieldError>> {
        let mut errors = Vec::new();

        let email = self.email.trim();
        let re_enter_email = self.re_enter_email.trim();

        let parsed_email = match Email::parse(email) {
            Ok(parsed) => Some(parsed),
            Err(coffee_run_core::EmailError::Empty) => {
                errors.push(FieldError::new("email", "can't be blank"));
                None
            }
            Err(_) => {
                errors.push(FieldError::new("email", "is invalid"));
                None
            }
        };

        if re_enter_email.is_empty() {
            errors.push(FieldError::new("re_enter_email", "can't be blank"));
        } else if !email.is_empty() && email != re_enter_email {
            errors.push(FieldError::new(
                "re_enter_email",
                "must match the email address",
            ));
        }

        if require(&mut errors, "first_name", &self.first_name)
            && self.first_name.trim().chars().count() < 2
        {
            errors.push(FieldError::new(
                "first_name",
                "is too short (minimum is 2 characters)",
            ));
        }
        if require(&mut errors, "last_name", &self.last_name)
            && self.last_name.trim().chars().count() < 2
        {
            errors.push(FieldError::new(
                "last_name",
                "is too short (minimum is 2 characters)",
            ));
        }

        require(&mut errors, "city", &self.city);

        if require(&mut errors, "state", &self.state) && self.state.trim().chars().count() != 2 {
            errors.push(FieldError::new(
                "state",
                "is the wrong length (should be 2 characters)",
            ));
        }

        if require(&mut errors, "zip", &self.zip) && !ZIP_RE.is_match(self.zip.trim()) {
            errors.push(FieldError::new("zip", "is invalid"));
        }

        let gross_income = if require(&mut errors, "gross_income", &self.gross_income) {
            match self.gross_income.trim().parse::<Decimal>() {
                Ok(income) if income > Decimal::ZERO => Some(income),
                Ok(_) => {
                    errors.push(FieldError::new("gross_income", "must be greater than 0"));
                    None
                }
                Err(_) => {
                    errors.push(FieldError::new("gross_income", "is not a number"));
                    None
                }
            }
        } else {
            None
        };

        if require(&mut errors, "ssn_last_four", &self.ssn_last_four)
            && !SSN_LAST_FOUR_RE.is_match(self.ssn_last_four.trim())
        {
            errors.push(FieldError::new("ssn_last_four", "is invalid"));
        }

        if !self.apply_for_credit {
            errors.push(FieldError::new(
                "apply_for_credit",
                "must be checked to proceed",
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        // The presence/format checks above guarantee these unwraps never run;
        // re-parse instead of unwrapping to keep the non-test code panic-free.
        let (Some(email), Ok(re_enter_email), Some(gross_income)) =
            (parsed_email, Email::parse(re_enter_email), gross_income)
        else {
            return Err(vec![FieldError::new("base", "is invalid")]);
        };

        Ok(ValidCreditApplication {
            email,
            re_enter_email,
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            zip: self.zip.trim().to_owned(),
            gross_income,
            ssn_last_four: self.ssn_last_four.trim().to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> NewCreditApplication {
        NewCreditApplication {
            email: "applicant@example.com".to_owned(),
            re_enter_email: "applicant@example.com".to_owned(),
            first_name: "Tina".to_owned(),
            last_name: "Titan".to_owned(),
            city: "Fullerton".to_owned(),
            state: "CA".to_owned(),
            zip: "92831".to_owned(),
            gross_income: "45000".to_owned(),
            ssn_last_four: "1234".to_owned(),
            apply_for_credit: true,
        }
    }

    #[test]
    fn test_valid_form_parses() {
        let valid = valid_form().validate().unwrap();
        assert_eq!(valid.email.as_str(), "applicant@example.com");
        assert_eq!(valid.gross_income, Decimal::new(45000, 0));
        assert_eq!(valid.state, "CA");
    }

    #[test]
    fn test_mismatched_emails_flag_re_enter_email() {
        let mut form = valid_form();
        form.re_enter_email = "other@example.com".to_owned();
        let errors = form.validate().unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "re_enter_email"
                    && e.message == "must match the email address")
        );
    }

    #[test]
    fn test_every_blank_field_is_annotated() {
        let form = NewCreditApplication::default();
        let errors = form.validate().unwrap_err();
        for field in [
            "email",
            "re_enter_email",
            "first_name",
            "last_name",
            "city",
            "state",
            "zip",
            "gross_income",
            "ssn_last_four",
            "apply_for_credit",
        ] {
            assert!(errors.iter().any(|e| e.field == field), "missing {field}");
        }
    }

    #[test]
    fn test_unchecked_acceptance_rejected() {
        let mut form = valid_form();
        form.apply_for_credit = false;
        let errors = form.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "apply_for_credit"));
    }

    #[test]
    fn test_zip_format_enforced() {
        let mut form = valid_form();
        form.zip = "9283".to_owned();
        assert!(
            form.validate()
                .unwrap_err()
                .iter()
                .any(|e| e.field == "zip")
        );

        form.zip = "92831-1234".to_owned();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_state_length_enforced() {
        let mut form = valid_form();
        form.state = "CAL".to_owned();
        assert!(
            form.validate()
                .unwrap_err()
                .iter()
                .any(|e| e.field == "state")
        );
    }

    #[test]
    fn test_income_must_be_positive_number() {
        let mut form = valid_form();
        form.gross_income = "0".to_owned();
        assert!(
            form.validate()
                .unwrap_err()
                .iter()
                .any(|e| e.field == "gross_income")
        );

        form.gross_income = "lots".to_owned();
        assert!(
            form.validate()
                .unwrap_err()
                .iter()
                .any(|e| e.field == "gross_income")
        );
    }

    #[test]
    fn test_ssn_exactly_four_digits() {
        let mut form = valid_form();
        form.ssn_last_four = "12345".to_owned();
        assert!(
            form.validate()
                .unwrap_err()
                .iter()
                .any(|e| e.field == "ssn_last_four")
        );
    }

    #[test]
    fn test_short_names_rejected() {
        let mut form = valid_form();
        form.first_name = "T".to_owned();
        assert!(
            form.validate()
                .unwrap_err()
                .iter()
                .any(|e| e.field == "first_name")
        );
    }
}
