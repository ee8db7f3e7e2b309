//! Email notifications for the credit-application flow.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Two
//! messages go out per accepted application: an internal notice to the
//! configured admin address and a result email to the applicant.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::CreditApplication;

/// HTML template for the internal new-application notice.
#[derive(Template)]
#[template(path = "email/new_application.html")]
struct NewApplicationEmailHtml<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    city: &'a str,
    state: &'a str,
    qualified: bool,
    credit_limit: Decimal,
}

/// Plain text template for the internal new-application notice.
#[derive(Template)]
#[template(path = "email/new_application.txt")]
struct NewApplicationEmailText<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    city: &'a str,
    state: &'a str,
    qualified: bool,
    credit_limit: Decimal,
}

/// HTML template for the applicant result email.
#[derive(Template)]
#[template(path = "email/application_result.html")]
struct ApplicationResultEmailHtml<'a> {
    first_name: &'a str,
    qualified: bool,
    credit_limit: Decimal,
}

/// Plain text template for the applicant result email.
#[derive(Template)]
#[template(path = "email/application_result.txt")]
struct ApplicationResultEmailText<'a> {
    first_name: &'a str,
    qualified: bool,
    credit_limit: Decimal,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    admin_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            admin_address: config.admin_address.clone(),
        })
    }

    /// Notify the admin address that a new application arrived.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_new_application(
        &self,
        application: &CreditApplication,
    ) -> Result<(), EmailError> {
        let html = NewApplicationEmailHtml {
            first_name: &application.first_name,
            last_name: &application.last_name,
            email: application.email.as_str(),
            city: &application.city,
            state: &application.state,
            qualified: application.qualified,
            credit_limit: application.credit_limit,
        }
        .render()?;
        let text = NewApplicationEmailText {
            first_name: &application.first_name,
            last_name: &application.last_name,
            email: application.email.as_str(),
            city: &application.city,
            state: &application.state,
            qualified: application.qualified,
            credit_limit: application.credit_limit,
        }
        .render()?;

        let to = self.admin_address.clone();
        self.send_multipart_email(&to, "New Credit Application Received", &text, &html)
            .await
    }

    /// Send the qualification outcome to the applicant.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_application_result(
        &self,
        application: &CreditApplication,
    ) -> Result<(), EmailError> {
        let html = ApplicationResultEmailHtml {
            first_name: &application.first_name,
            qualified: application.qualified,
            credit_limit: application.credit_limit,
        }
        .render()?;
        let text = ApplicationResultEmailText {
            first_name: &application.first_name,
            qualified: application.qualified,
            credit_limit: application.credit_limit,
        }
        .render()?;

        let subject = if application.qualified {
            "Credit Application Approved!"
        } else {
            "Credit Application Update"
        };

        self.send_multipart_email(application.email.as_str(), subject, &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_owned(),
            smtp_port: 587,
            smtp_username: "mailer".to_owned(),
            smtp_password: SecretString::from("hunter2"),
            from_address: "noreply@titanscoffee.com".to_owned(),
            admin_address: "admin@titanscoffee.com".to_owned(),
        }
    }

    // Exercises the tokio1 + rustls SMTP transport builder; no mail is sent.
    #[tokio::test]
    async fn test_service_builds_from_config() {
        assert!(EmailService::new(&config()).is_ok());
    }
}
