// db/referraldb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::referralmodel::{Referral, ReferralWithUser};

#[async_trait]
pub trait ReferralExt {
    /// Insert a pending referral for an ordered referrer/referred pair.
    /// The unique pair constraint surfaces duplicates as a database error.
    async fn create_referral(
        &self,
        referrer_id: Uuid,
        referred_id: Uuid,
        referral_code: &str,
    ) -> Result<Referral, sqlx::Error>;

    /// The (at most one) inbound referral for a referred user.
    async fn get_referral_by_referred(
        &self,
        referred_id: Uuid,
    ) -> Result<Option<Referral>, sqlx::Error>;

    async fn get_referral_by_pair(
        &self,
        referrer_id: Uuid,
        referred_id: Uuid,
    ) -> Result<Option<Referral>, sqlx::Error>;

    async fn get_referrals_by_referrer(
        &self,
        referrer_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<ReferralWithUser>, sqlx::Error>;

    async fn get_referral_count_by_referrer(
        &self,
        referrer_id: Uuid,
    ) -> Result<i64, sqlx::Error>;

    /// (total, converted) referral counts for a referrer in one pass.
    async fn get_referral_totals(&self, referrer_id: Uuid) -> Result<(i64, i64), sqlx::Error>;
}

#[async_trait]
impl ReferralExt for DBClient {
    async fn create_referral(
        &self,
        referrer_id: Uuid,
        referred_id: Uuid,
        referral_code: &str,
    ) -> Result<Referral, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            INSERT INTO referrals (referrer_id, referred_id, referral_code, status)
            VALUES ($1, $2, $3, 'pending'::referral_status)
            RETURNING
                id, referrer_id, referred_id, referral_code, status,
                converted_at, purchase_id, created_at
            "#,
        )
        .bind(referrer_id)
        .bind(referred_id)
        .bind(referral_code)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_referral_by_referred(
        &self,
        referred_id: Uuid,
    ) -> Result<Option<Referral>, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            SELECT
                id, referrer_id, referred_id, referral_code, status,
                converted_at, purchase_id, created_at
            FROM referrals
            WHERE referred_id = $1
            "#,
        )
        .bind(referred_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_referral_by_pair(
        &self,
        referrer_id: Uuid,
        referred_id: Uuid,
    ) -> Result<Option<Referral>, sqlx::Error> {
        sqlx::query_as::<_, Referral>(
            r#"
            SELECT
                id, referrer_id, referred_id, referral_code, status,
                converted_at, purchase_id, created_at
            FROM referrals
            WHERE referrer_id = $1 AND referred_id = $2
            "#,
        )
        .bind(referrer_id)
        .bind(referred_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_referrals_by_referrer(
        &self,
        referrer_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<Vec<ReferralWithUser>, sqlx::Error> {
        let offset = (page - 1) as i64 * limit as i64;

        sqlx::query_as::<_, ReferralWithUser>(
            r#"
            SELECT
                r.id, r.status, r.converted_at, r.created_at,
                u.id AS referred_id, u.name AS referred_name, u.email AS referred_email
            FROM referrals r
            JOIN users u ON u.id = r.referred_id
            WHERE r.referrer_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(referrer_id)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_referral_count_by_referrer(
        &self,
        referrer_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM referrals WHERE referrer_id = $1")
            .bind(referrer_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn get_referral_totals(&self, referrer_id: Uuid) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'converted'::referral_status)
            FROM referrals
            WHERE referrer_id = $1
            "#,
        )
        .bind(referrer_id)
        .fetch_one(&self.pool)
        .await
    }
}
