//! Credit application repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use coffee_run_core::{CreditApplicationId, Email};

use super::RepositoryError;
use crate::models::{CreditApplication, ValidCreditApplication};
use crate::services::qualify::Qualification;

/// Repository for credit application database operations.
pub struct CreditApplicationRepository<'a> {
    pool: &'a PgPool,
}

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: i32,
    email: String,
    first_name: String,
    last_name: String,
    city: String,
    state: String,
    zip: String,
    gross_income: Decimal,
    ssn_last_four: String,
    qualified: bool,
    credit_limit: Decimal,
    created_at: DateTime<Utc>,
}

impl ApplicationRow {
    fn into_application(self) -> Result<CreditApplication, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(CreditApplication {
            id: CreditApplicationId::new(self.id),
            email,
            first_name: self.first_name,
            last_name: self.last_name,
            city: self.city,
            state: self.state,
            zip: self.zip,
            gross_income: self.gross_income,
            ssn_last_four: self.ssn_last_four,
            qualified: self.qualified,
            credit_limit: self.credit_limit,
            created_at: self.created_at,
        })
    }
}

impl<'a> CreditApplicationRepository<'a> {
    /// Create a new credit application repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a validated application with its qualification outcome.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        application: &ValidCreditApplication,
        qualification: &Qualification,
    ) -> Result<CreditApplication, RepositoryError> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r"
            INSERT INTO credit_applications
                (email, re_enter_email, first_name, last_name, city, state, zip,
                 gross_income, ssn_last_four, qualified, credit_limit)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, email, first_name, last_name, city, state, zip,
                      gross_income, ssn_last_four, qualified, credit_limit, created_at
            ",
        )
        .bind(application.email.as_str())
        .bind(application.re_enter_email.as_str())
        .bind(&application.first_name)
        .bind(&application.last_name)
        .bind(&application.city)
        .bind(&application.state)
        .bind(&application.zip)
        .bind(application.gross_income)
        .bind(&application.ssn_last_four)
        .bind(qualification.qualified)
        .bind(qualification.credit_limit)
        .fetch_one(self.pool)
        .await?;

        row.into_application()
    }
}
