use std::fs;

use ammonia::clean_text;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use regex::Regex;
use tokio::time::{sleep, Duration};

use crate::config::Config;

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY_MS: u64 = 1000;

type MailError = Box<dyn std::error::Error + Send + Sync>;

/// SMTP mailer. Built once from Config at startup; no ambient environment
/// reads at send time.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(credentials)
            .build();

        Ok(Mailer {
            transport,
            from_email: config.from_email.clone(),
        })
    }

    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        template_path: &str,
        placeholders: &[(String, String)],
    ) -> Result<(), MailError> {
        validate_email(to_email)?;

        // Read and process template
        let mut html_template = match fs::read_to_string(template_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read email template {}: {}", template_path, e);
                return Err(format!("Template not found: {}", template_path).into());
            }
        };

        for (key, value) in placeholders {
            // Placeholder values come from user-controlled fields; strip any
            // markup before interpolating into the HTML body.
            html_template = html_template.replace(key, &clean_text(value));
        }

        self.send_with_retries(to_email, subject, &html_template)
            .await
    }

    async fn send_with_retries(
        &self,
        to_email: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from_email.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        let mut last_error: Option<String> = None;

        for attempt in 1..=MAX_RETRIES {
            match self.transport.send(message.clone()).await {
                Ok(_) => {
                    tracing::info!("Email sent successfully to {}", to_email);
                    return Ok(());
                }
                Err(e) => {
                    last_error = Some(e.to_string());
                    if attempt < MAX_RETRIES {
                        let delay = RETRY_DELAY_MS * 2_u64.pow(attempt - 1);
                        tracing::warn!(
                            "Email send attempt {} failed for {}. Retrying in {}ms...",
                            attempt,
                            to_email,
                            delay
                        );
                        sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }

        let error_msg = last_error
            .map(|e| format!("Failed after {} retries: {}", MAX_RETRIES, e))
            .unwrap_or_else(|| "Unknown email sending error".to_string());

        tracing::error!("Email failed for {}: {}", to_email, error_msg);
        Err(error_msg.into())
    }
}

fn validate_email(email: &str) -> Result<(), MailError> {
    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .map_err(|_| "Invalid regex pattern".to_string())?;

    if email_regex.is_match(email) {
        Ok(())
    } else {
        Err(format!("Invalid email address: {}", email).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name+tag@domain.co.uk").is_ok());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("@example.com").is_err());
    }
}
