// db/dashboarddb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::dashboardmodel::{Dashboard, DashboardWithUser};

#[async_trait]
pub trait DashboardExt {
    async fn create_dashboard(&self, user_id: Uuid) -> Result<Dashboard, sqlx::Error>;

    async fn get_dashboard(&self, user_id: Uuid) -> Result<Option<Dashboard>, sqlx::Error>;

    /// Atomic counter bump when a new referral relationship is recorded.
    async fn increment_referred_users(&self, user_id: Uuid) -> Result<(), sqlx::Error>;

    async fn get_leaderboard(&self, limit: usize) -> Result<Vec<DashboardWithUser>, sqlx::Error>;
}

#[async_trait]
impl DashboardExt for DBClient {
    async fn create_dashboard(&self, user_id: Uuid) -> Result<Dashboard, sqlx::Error> {
        sqlx::query_as::<_, Dashboard>(
            r#"
            INSERT INTO dashboards (user_id)
            VALUES ($1)
            RETURNING user_id, referred_users, converted_users, total_credits, updated_at
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_dashboard(&self, user_id: Uuid) -> Result<Option<Dashboard>, sqlx::Error> {
        sqlx::query_as::<_, Dashboard>(
            r#"
            SELECT user_id, referred_users, converted_users, total_credits, updated_at
            FROM dashboards
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn increment_referred_users(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE dashboards
            SET referred_users = referred_users + 1,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_leaderboard(&self, limit: usize) -> Result<Vec<DashboardWithUser>, sqlx::Error> {
        sqlx::query_as::<_, DashboardWithUser>(
            r#"
            SELECT
                d.user_id, d.referred_users, d.converted_users, d.total_credits,
                u.name, u.email, u.referral_code
            FROM dashboards d
            JOIN users u ON u.id = d.user_id
            WHERE u.is_deleted = FALSE
            ORDER BY d.total_credits DESC, d.converted_users DESC, d.referred_users DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
    }
}
