use super::sendmail::Mailer;

type MailError = Box<dyn std::error::Error + Send + Sync>;

/// Send the referral-bonus notification to one party of a conversion.
/// `referral_code` is set for the referrer so the mail can plug their own
/// code; `counterparty_name` names the other side of the referral.
pub async fn send_referral_bonus_email(
    mailer: &Mailer,
    to_email: &str,
    username: &str,
    credits_earned: i32,
    referral_code: Option<&str>,
    counterparty_name: Option<&str>,
) -> Result<(), MailError> {
    let subject = format!(
        "You've earned {} credits! - Neo Market Referral Bonus",
        credits_earned
    );
    let template_path = "src/mail/templates/Referral-bonus.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{credits}}".to_string(), credits_earned.to_string()),
        (
            "{{referral_code}}".to_string(),
            referral_code.unwrap_or("").to_string(),
        ),
        (
            "{{counterparty}}".to_string(),
            counterparty_name.unwrap_or("a friend").to_string(),
        ),
    ];

    mailer
        .send_email(to_email, &subject, template_path, &placeholders)
        .await
}

/// Notify both parties of a converted referral.
pub async fn send_referral_bonus_emails(
    mailer: &Mailer,
    referrer_email: &str,
    referrer_name: &str,
    referrer_code: &str,
    referred_email: &str,
    referred_name: &str,
    credits_earned: i32,
) -> Result<(), MailError> {
    let (referrer_result, referred_result) = futures::future::join(
        send_referral_bonus_email(
            mailer,
            referrer_email,
            referrer_name,
            credits_earned,
            Some(referrer_code),
            Some(referred_name),
        ),
        send_referral_bonus_email(
            mailer,
            referred_email,
            referred_name,
            credits_earned,
            None,
            Some(referrer_name),
        ),
    )
    .await;

    referrer_result?;
    referred_result
}

pub async fn send_signup_bonus_email(
    mailer: &Mailer,
    to_email: &str,
    username: &str,
    credits_earned: i32,
    referral_code: &str,
) -> Result<(), MailError> {
    let subject = format!(
        "You've earned {} credits! - Neo Market Signup Bonus",
        credits_earned
    );
    let template_path = "src/mail/templates/Signup-bonus.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{credits}}".to_string(), credits_earned.to_string()),
        ("{{referral_code}}".to_string(), referral_code.to_string()),
    ];

    mailer
        .send_email(to_email, &subject, template_path, &placeholders)
        .await
}

pub async fn send_welcome_email(
    mailer: &Mailer,
    to_email: &str,
    username: &str,
    referral_code: &str,
) -> Result<(), MailError> {
    let subject = "Welcome to Neo Market";
    let template_path = "src/mail/templates/Welcome-email.html";
    let placeholders = vec![
        ("{{username}}".to_string(), username.to_string()),
        ("{{referral_code}}".to_string(), referral_code.to_string()),
    ];

    mailer
        .send_email(to_email, subject, template_path, &placeholders)
        .await
}
