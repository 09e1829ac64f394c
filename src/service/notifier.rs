// service/notifier.rs
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::mail::{mails, sendmail::Mailer};

/// Email side effects of the purchase workflow, as queue messages. Enqueued
/// only after the owning transaction has committed.
#[derive(Debug)]
pub enum Notification {
    ReferralBonus {
        referrer_email: String,
        referrer_name: String,
        referrer_code: String,
        referred_email: String,
        referred_name: String,
        credits_earned: i32,
    },
    SignupBonus {
        email: String,
        name: String,
        referral_code: String,
        credits_earned: i32,
    },
    Welcome {
        email: String,
        name: String,
        referral_code: String,
    },
}

/// Fire-and-forget dispatcher. Messages are handed to a worker task; delivery
/// failures are logged there and never reach the enqueuing caller.
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn new(mailer: Arc<Mailer>) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Notification>();

        tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                if let Err(err) = deliver(&mailer, &notification).await {
                    tracing::error!("Notification delivery failed: {}", err);
                }
            }
        });

        Notifier { sender }
    }

    pub fn enqueue(&self, notification: Notification) {
        if let Err(err) = self.sender.send(notification) {
            // Only possible once the worker has shut down.
            tracing::error!("Notification queue closed, dropping message: {}", err);
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").finish()
    }
}

async fn deliver(
    mailer: &Mailer,
    notification: &Notification,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match notification {
        Notification::ReferralBonus {
            referrer_email,
            referrer_name,
            referrer_code,
            referred_email,
            referred_name,
            credits_earned,
        } => {
            mails::send_referral_bonus_emails(
                mailer,
                referrer_email,
                referrer_name,
                referrer_code,
                referred_email,
                referred_name,
                *credits_earned,
            )
            .await
        }
        Notification::SignupBonus {
            email,
            name,
            referral_code,
            credits_earned,
        } => {
            mails::send_signup_bonus_email(mailer, email, name, *credits_earned, referral_code)
                .await
        }
        Notification::Welcome {
            email,
            name,
            referral_code,
        } => mails::send_welcome_email(mailer, email, name, referral_code).await,
    }
}
