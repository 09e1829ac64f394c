// db/purchasedb.rs
use async_trait::async_trait;
use sqlx::{Acquire, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;

use crate::models::{
    purchasemodel::{Purchase, PurchaseStats, PurchaseWithReferrer, PurchaseWithUser},
    referralmodel::{Referral, ReferralStatus},
    usermodel::User,
};

/// What the purchase transaction decided, with the fresh user rows needed for
/// post-commit notifications.
#[derive(Debug)]
pub enum Reward {
    /// Repeat purchase: no state beyond the purchase row itself.
    None,
    /// First purchase converted a pending referral; both parties were credited.
    ReferralConversion { referrer: User, referred: User },
    /// First purchase with no pending referral; purchaser got the signup bonus.
    SignupBonus { user: User },
}

#[derive(Debug)]
pub struct PurchaseOutcome {
    pub purchase: Purchase,
    pub credits_awarded: i32,
    pub is_first_purchase: bool,
    pub reward: Reward,
}

#[derive(Debug, PartialEq)]
pub enum RewardDecision {
    ReferralConversion,
    SignupBonus,
    None,
}

/// The state-transition rule of the purchase workflow: only a first purchase
/// awards anything, and only a pending inbound referral converts. A referral
/// that already converted behaves like no referral at all.
pub fn decide_reward(
    is_first_purchase: bool,
    inbound_status: Option<ReferralStatus>,
) -> RewardDecision {
    if !is_first_purchase {
        return RewardDecision::None;
    }

    match inbound_status {
        Some(ReferralStatus::Pending) => RewardDecision::ReferralConversion,
        _ => RewardDecision::SignupBonus,
    }
}

#[async_trait]
pub trait PurchaseExt {
    /// The purchase/referral workflow, as one transaction: record the
    /// purchase, and on a first purchase either convert the pending inbound
    /// referral (crediting both parties) or award the signup bonus.
    ///
    /// The transaction opens with a row lock on the purchasing user, so
    /// concurrent purchases by the same user serialize here and cannot both
    /// observe an empty purchase history. Dashboard updates run under a
    /// savepoint: if they fail only the savepoint rolls back and the credit
    /// award still commits.
    async fn create_purchase_with_rewards(
        &self,
        user_id: Uuid,
        product_id: &str,
        amount: f64,
        referral_bonus: i32,
        signup_bonus: i32,
    ) -> Result<PurchaseOutcome, sqlx::Error>;

    async fn get_purchase_by_id(
        &self,
        purchase_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PurchaseWithReferrer>, sqlx::Error>;

    async fn get_purchase_history(
        &self,
        user_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<PurchaseWithReferrer>, sqlx::Error>;

    async fn get_purchase_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    async fn get_purchase_stats(&self, user_id: Uuid) -> Result<PurchaseStats, sqlx::Error>;

    async fn get_all_purchases(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<Vec<PurchaseWithUser>, sqlx::Error>;

    async fn get_total_purchase_count(&self) -> Result<i64, sqlx::Error>;
}

#[async_trait]
impl PurchaseExt for DBClient {
    async fn create_purchase_with_rewards(
        &self,
        user_id: Uuid,
        product_id: &str,
        amount: f64,
        referral_bonus: i32,
        signup_bonus: i32,
    ) -> Result<PurchaseOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Lock the purchasing user's row. Doubles as the existence check and
        // serializes concurrent first-purchase attempts for this user.
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password, role, referral_code,
                credits, is_email_verified, is_deleted,
                created_at, updated_at
            FROM users
            WHERE id = $1 AND is_deleted = FALSE
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if user.is_none() {
            return Err(sqlx::Error::RowNotFound);
        }

        let existing_purchases =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
        let is_first_purchase = existing_purchases == 0;

        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (user_id, product_id, amount, is_first_purchase)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id, user_id, product_id, amount, is_first_purchase,
                purchase_date, created_at
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(amount)
        .bind(is_first_purchase)
        .fetch_one(&mut *tx)
        .await?;

        if !is_first_purchase {
            tx.commit().await?;
            return Ok(PurchaseOutcome {
                purchase,
                credits_awarded: 0,
                is_first_purchase: false,
                reward: Reward::None,
            });
        }

        let referral = sqlx::query_as::<_, Referral>(
            r#"
            SELECT
                id, referrer_id, referred_id, referral_code, status,
                converted_at, purchase_id, created_at
            FROM referrals
            WHERE referred_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let decision = decide_reward(is_first_purchase, referral.as_ref().map(|r| r.status));

        match (decision, referral) {
            (RewardDecision::ReferralConversion, Some(referral)) => {
                // Pending -> converted is the only transition; converted is
                // terminal.
                sqlx::query(
                    r#"
                    UPDATE referrals
                    SET status = 'converted'::referral_status,
                        converted_at = NOW(),
                        purchase_id = $2
                    WHERE id = $1
                    "#,
                )
                .bind(referral.id)
                .bind(purchase.id)
                .execute(&mut *tx)
                .await?;

                let referrer =
                    increment_credits(&mut tx, referral.referrer_id, referral_bonus).await?;
                let referred = increment_credits(&mut tx, user_id, referral_bonus).await?;

                // Dashboards are advisory; a failure here must not take the
                // credit award down with it.
                if let Err(err) =
                    apply_conversion_dashboards(&mut tx, referral.referrer_id, user_id, referral_bonus)
                        .await
                {
                    tracing::warn!(
                        "Dashboard update failed after referral conversion for user {}: {}",
                        user_id,
                        err
                    );
                }

                tx.commit().await?;

                Ok(PurchaseOutcome {
                    purchase,
                    credits_awarded: referral_bonus,
                    is_first_purchase: true,
                    reward: Reward::ReferralConversion { referrer, referred },
                })
            }
            _ => {
                let user = increment_credits(&mut tx, user_id, signup_bonus).await?;

                if let Err(err) = apply_signup_dashboard(&mut tx, user_id, signup_bonus).await {
                    tracing::warn!(
                        "Dashboard update failed after signup bonus for user {}: {}",
                        user_id,
                        err
                    );
                }

                tx.commit().await?;

                Ok(PurchaseOutcome {
                    purchase,
                    credits_awarded: signup_bonus,
                    is_first_purchase: true,
                    reward: Reward::SignupBonus { user },
                })
            }
        }
    }

    async fn get_purchase_by_id(
        &self,
        purchase_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<PurchaseWithReferrer>, sqlx::Error> {
        sqlx::query_as::<_, PurchaseWithReferrer>(
            r#"
            SELECT
                p.id, p.user_id, p.product_id, p.amount, p.is_first_purchase,
                p.purchase_date,
                ref_user.id AS referrer_id,
                ref_user.name AS referrer_name,
                ref_user.email AS referrer_email
            FROM purchases p
            LEFT JOIN referrals r ON r.purchase_id = p.id
            LEFT JOIN users ref_user ON ref_user.id = r.referrer_id
            WHERE p.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(purchase_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_purchase_history(
        &self,
        user_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<PurchaseWithReferrer>, sqlx::Error> {
        let offset = (page - 1) as i64 * limit as i64;

        sqlx::query_as::<_, PurchaseWithReferrer>(
            r#"
            SELECT
                p.id, p.user_id, p.product_id, p.amount, p.is_first_purchase,
                p.purchase_date,
                ref_user.id AS referrer_id,
                ref_user.name AS referrer_name,
                ref_user.email AS referrer_email
            FROM purchases p
            LEFT JOIN referrals r ON r.purchase_id = p.id
            LEFT JOIN users ref_user ON ref_user.id = r.referrer_id
            WHERE p.user_id = $1
            ORDER BY p.purchase_date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_purchase_count(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_purchase_stats(&self, user_id: Uuid) -> Result<PurchaseStats, sqlx::Error> {
        sqlx::query_as::<_, PurchaseStats>(
            r#"
            SELECT
                COUNT(id) AS total_purchases,
                COALESCE(SUM(amount), 0) AS total_spent,
                COALESCE(AVG(amount), 0) AS average_purchase_amount,
                MIN(purchase_date) AS first_purchase_date,
                MAX(purchase_date) AS last_purchase_date
            FROM purchases
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_all_purchases(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<Vec<PurchaseWithUser>, sqlx::Error> {
        let offset = (page - 1) as i64 * limit as i64;

        sqlx::query_as::<_, PurchaseWithUser>(
            r#"
            SELECT
                p.id, p.user_id, p.product_id, p.amount, p.is_first_purchase,
                p.purchase_date,
                u.name AS user_name,
                u.email AS user_email
            FROM purchases p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.purchase_date DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_total_purchase_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.pool)
            .await
    }
}

async fn increment_credits(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    amount: i32,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET credits = credits + $2,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id, name, email, password, role, referral_code,
            credits, is_email_verified, is_deleted,
            created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .fetch_one(&mut **tx)
    .await
}

/// Savepoint-guarded: a failure rolls back only the dashboard statements.
async fn apply_conversion_dashboards(
    tx: &mut Transaction<'_, Postgres>,
    referrer_id: Uuid,
    referred_id: Uuid,
    bonus: i32,
) -> Result<(), sqlx::Error> {
    let mut sp = tx.begin().await?;

    sqlx::query(
        r#"
        UPDATE dashboards
        SET converted_users = converted_users + 1,
            total_credits = total_credits + $2,
            updated_at = NOW()
        WHERE user_id = $1
        "#,
    )
    .bind(referrer_id)
    .bind(bonus)
    .execute(&mut *sp)
    .await?;

    sqlx::query(
        r#"
        UPDATE dashboards
        SET total_credits = total_credits + $2,
            updated_at = NOW()
        WHERE user_id = $1
        "#,
    )
    .bind(referred_id)
    .bind(bonus)
    .execute(&mut *sp)
    .await?;

    sp.commit().await
}

async fn apply_signup_dashboard(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    bonus: i32,
) -> Result<(), sqlx::Error> {
    let mut sp = tx.begin().await?;

    sqlx::query(
        r#"
        UPDATE dashboards
        SET total_credits = total_credits + $2,
            updated_at = NOW()
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .bind(bonus)
    .execute(&mut *sp)
    .await?;

    sp.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_purchase_awards_nothing() {
        assert_eq!(decide_reward(false, None), RewardDecision::None);
        assert_eq!(
            decide_reward(false, Some(ReferralStatus::Pending)),
            RewardDecision::None
        );
        assert_eq!(
            decide_reward(false, Some(ReferralStatus::Converted)),
            RewardDecision::None
        );
    }

    #[test]
    fn test_first_purchase_with_pending_referral_converts() {
        assert_eq!(
            decide_reward(true, Some(ReferralStatus::Pending)),
            RewardDecision::ReferralConversion
        );
    }

    #[test]
    fn test_first_purchase_without_referral_gets_signup_bonus() {
        assert_eq!(decide_reward(true, None), RewardDecision::SignupBonus);
    }

    #[test]
    fn test_converted_referral_is_terminal() {
        // A second "first purchase" can never re-convert.
        assert_eq!(
            decide_reward(true, Some(ReferralStatus::Converted)),
            RewardDecision::SignupBonus
        );
    }
}
