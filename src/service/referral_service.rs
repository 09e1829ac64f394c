// service/referral_service.rs
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{
        dashboarddb::DashboardExt,
        db::DBClient,
        purchasedb::{PurchaseExt, Reward},
        referraldb::ReferralExt,
        userdb::UserExt,
    },
    dtos::referraldtos::{LeaderboardEntryDto, LeaderboardStatsDto},
    models::{
        purchasemodel::Purchase,
        referralmodel::{Referral, ReferralStats},
        usermodel::User,
    },
    service::{
        error::ServiceError,
        notifier::{Notification, Notifier},
        referral::generate_referral_link,
    },
    utils::validation,
};

#[derive(Debug)]
pub struct ProcessPurchaseResult {
    pub purchase: Purchase,
    pub credits_awarded: i32,
    pub is_first_purchase: bool,
}

#[derive(Debug)]
pub struct ReferralStatsResult {
    pub user: User,
    pub stats: ReferralStats,
    pub referral_link: String,
}

/// The referral/purchase workflow engine. Everything stateful runs inside
/// one database transaction; emails are enqueued only after it commits.
pub struct ReferralService {
    db_client: Arc<DBClient>,
    notifier: Arc<Notifier>,
    frontend_url: String,
    referral_bonus: i32,
    signup_bonus: i32,
    tx_timeout: Duration,
}

impl ReferralService {
    pub fn new(db_client: Arc<DBClient>, notifier: Arc<Notifier>, config: &Config) -> Self {
        Self {
            db_client,
            notifier,
            frontend_url: config.frontend_url.clone(),
            referral_bonus: config.referral_bonus,
            signup_bonus: config.signup_bonus,
            tx_timeout: Duration::from_secs(config.tx_timeout_secs),
        }
    }

    /// Record a purchase and award credits.
    ///
    /// On the user's first purchase, a pending inbound referral converts and
    /// both parties earn the referral bonus; with no pending referral the
    /// purchaser earns the signup bonus. Repeat purchases award nothing.
    pub async fn process_purchase(
        &self,
        user_id: Uuid,
        product_id: &str,
        amount: f64,
    ) -> Result<ProcessPurchaseResult, ServiceError> {
        validation::validate_product_id(product_id).map_err(ServiceError::Validation)?;
        validation::validate_amount(amount).map_err(ServiceError::Validation)?;

        let outcome = timeout(
            self.tx_timeout,
            self.db_client.create_purchase_with_rewards(
                user_id,
                product_id,
                amount,
                self.referral_bonus,
                self.signup_bonus,
            ),
        )
        .await
        .map_err(|_| ServiceError::TransactionTimeout(self.tx_timeout))?
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => ServiceError::UserNotFound(user_id),
            err => ServiceError::Database(err),
        })?;

        // The transaction has committed; notification failures from here on
        // are the notifier's problem, never the caller's.
        match &outcome.reward {
            Reward::ReferralConversion { referrer, referred } => {
                self.notifier.enqueue(Notification::ReferralBonus {
                    referrer_email: referrer.email.clone(),
                    referrer_name: referrer.name.clone(),
                    referrer_code: referrer.referral_code.clone(),
                    referred_email: referred.email.clone(),
                    referred_name: referred.name.clone(),
                    credits_earned: outcome.credits_awarded,
                });
            }
            Reward::SignupBonus { user } => {
                self.notifier.enqueue(Notification::SignupBonus {
                    email: user.email.clone(),
                    name: user.name.clone(),
                    referral_code: user.referral_code.clone(),
                    credits_earned: outcome.credits_awarded,
                });
            }
            Reward::None => {}
        }

        Ok(ProcessPurchaseResult {
            purchase: outcome.purchase,
            credits_awarded: outcome.credits_awarded,
            is_first_purchase: outcome.is_first_purchase,
        })
    }

    /// Record a referrer -> referred relationship at registration time.
    pub async fn create_referral(
        &self,
        referrer_id: Uuid,
        referred_id: Uuid,
        referral_code: &str,
    ) -> Result<Referral, ServiceError> {
        if referrer_id == referred_id {
            return Err(ServiceError::Validation(
                "You cannot refer yourself".to_string(),
            ));
        }

        let existing = self
            .db_client
            .get_referral_by_pair(referrer_id, referred_id)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ReferralAlreadyExists);
        }

        let referral = self
            .db_client
            .create_referral(referrer_id, referred_id, referral_code)
            .await?;

        // Advisory aggregate; a failed bump is logged, not surfaced.
        if let Err(err) = self.db_client.increment_referred_users(referrer_id).await {
            tracing::warn!(
                "Dashboard update failed after referral creation for referrer {}: {}",
                referrer_id,
                err
            );
        }

        Ok(referral)
    }

    pub async fn get_referral_stats(
        &self,
        user_id: Uuid,
    ) -> Result<ReferralStatsResult, ServiceError> {
        let user = self
            .db_client
            .get_user(Some(user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        let (total_referred, converted) = self.db_client.get_referral_totals(user_id).await?;
        let pending = total_referred - converted;
        let total_credits_earned = converted * self.referral_bonus as i64;
        let conversion_rate = if total_referred > 0 {
            (converted as f64 / total_referred as f64) * 100.0
        } else {
            0.0
        };

        let referral_link = generate_referral_link(&self.frontend_url, &user.referral_code);

        Ok(ReferralStatsResult {
            stats: ReferralStats {
                total_referred_users: total_referred,
                converted_users: converted,
                pending_users: pending,
                total_credits_earned,
                conversion_rate,
            },
            user,
            referral_link,
        })
    }

    pub async fn validate_referral_code(&self, referral_code: &str) -> Result<User, ServiceError> {
        validation::validate_referral_code(referral_code).map_err(ServiceError::Validation)?;

        self.db_client
            .get_user(None, None, Some(referral_code))
            .await?
            .ok_or(ServiceError::ReferralCodeNotFound)
    }

    pub async fn get_referral_leaderboard(
        &self,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntryDto>, ServiceError> {
        let limit = limit.clamp(1, 100);
        let top_referrers = self.db_client.get_leaderboard(limit).await?;

        Ok(top_referrers
            .into_iter()
            .enumerate()
            .map(|(index, dashboard)| {
                let conversion_rate = if dashboard.referred_users > 0 {
                    (dashboard.converted_users as f64 / dashboard.referred_users as f64) * 100.0
                } else {
                    0.0
                };

                LeaderboardEntryDto {
                    rank: index + 1,
                    name: dashboard.name,
                    referral_code: dashboard.referral_code,
                    stats: LeaderboardStatsDto {
                        total_referred_users: dashboard.referred_users,
                        converted_users: dashboard.converted_users,
                        total_credits_earned: dashboard.total_credits,
                        conversion_rate,
                    },
                }
            })
            .collect())
    }
}
