// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::usermodel::User;

#[async_trait]
pub trait UserExt {
    /// Look a user up by exactly one of id, email or referral code.
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        referral_code: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error>;

    async fn get_user_count(&self) -> Result<i64, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
        referral_code: T,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, sqlx::Error>;

    /// Soft delete: the row is kept, the account stops resolving.
    async fn soft_delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
        referral_code: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, password, role, referral_code,
                    credits, is_email_verified, is_deleted,
                    created_at, updated_at
                FROM users
                WHERE id = $1 AND is_deleted = FALSE
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, password, role, referral_code,
                    credits, is_email_verified, is_deleted,
                    created_at, updated_at
                FROM users
                WHERE email = $1 AND is_deleted = FALSE
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(referral_code) = referral_code {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT
                    id, name, email, password, role, referral_code,
                    credits, is_email_verified, is_deleted,
                    created_at, updated_at
                FROM users
                WHERE referral_code = $1 AND is_deleted = FALSE
                "#,
            )
            .bind(referral_code)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(&self, page: u32, limit: usize) -> Result<Vec<User>, sqlx::Error> {
        let offset = (page - 1) as i64 * limit as i64;

        sqlx::query_as::<_, User>(
            r#"
            SELECT
                id, name, email, password, role, referral_code,
                credits, is_email_verified, is_deleted,
                created_at, updated_at
            FROM users
            WHERE is_deleted = FALSE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_deleted = FALSE")
            .fetch_one(&self.pool)
            .await
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
        referral_code: T,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, referral_code)
            VALUES ($1, $2, $3, $4)
            RETURNING
                id, name, email, password, role, referral_code,
                credits, is_email_verified, is_deleted,
                created_at, updated_at
            "#,
        )
        .bind(name.into())
        .bind(email.into())
        .bind(password.into())
        .bind(referral_code.into())
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING
                id, name, email, password, role, referral_code,
                credits, is_email_verified, is_deleted,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }

    async fn soft_delete_user(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET is_deleted = TRUE,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
