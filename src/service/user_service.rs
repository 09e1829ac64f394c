// service/user_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::Config,
    db::{
        dashboarddb::DashboardExt, db::DBClient, referraldb::ReferralExt, userdb::UserExt,
    },
    dtos::{userdtos::RegisterUserDto, Pagination},
    models::{
        dashboardmodel::Dashboard, referralmodel::ReferralWithUser, usermodel::User,
    },
    service::{
        error::ServiceError,
        notifier::{Notification, Notifier},
        referral::{generate_referral_code, generate_referral_link},
        referral_service::ReferralService,
    },
    utils::{password, validation},
};

const REFERRAL_CODE_ATTEMPTS: u32 = 5;

#[derive(Debug)]
pub struct UserDashboardResult {
    pub user: User,
    pub dashboard: Dashboard,
    pub recent_referrals: Vec<ReferralWithUser>,
    pub referral_link: String,
}

pub struct UserService {
    db_client: Arc<DBClient>,
    referral_service: Arc<ReferralService>,
    notifier: Arc<Notifier>,
    frontend_url: String,
}

impl UserService {
    pub fn new(
        db_client: Arc<DBClient>,
        referral_service: Arc<ReferralService>,
        notifier: Arc<Notifier>,
        config: &Config,
    ) -> Self {
        Self {
            db_client,
            referral_service,
            notifier,
            frontend_url: config.frontend_url.clone(),
        }
    }

    /// Register a new account: user row, dashboard row, and (when a referral
    /// code was supplied) the pending referral relationship.
    pub async fn register(&self, dto: &RegisterUserDto) -> Result<User, ServiceError> {
        let existing = self.db_client.get_user(None, Some(&dto.email), None).await?;
        if existing.is_some() {
            return Err(ServiceError::EmailExists);
        }

        // Resolve the referrer before creating anything, so a bad code fails
        // the registration cleanly.
        let referrer = match &dto.referral_code {
            Some(code) => {
                validation::validate_referral_code(code).map_err(ServiceError::Validation)?;
                Some(
                    self.db_client
                        .get_user(None, None, Some(code))
                        .await?
                        .ok_or(ServiceError::ReferralCodeNotFound)?,
                )
            }
            None => None,
        };

        let hashed_password = password::hash(&dto.password[..])
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        let referral_code = self.generate_unique_referral_code().await?;

        let user = self
            .db_client
            .save_user(
                validation::sanitize_string(&dto.name),
                dto.email.clone(),
                hashed_password,
                referral_code,
            )
            .await?;

        self.db_client.create_dashboard(user.id).await?;

        if let Some(referrer) = referrer {
            self.referral_service
                .create_referral(referrer.id, user.id, &referrer.referral_code)
                .await?;
        }

        self.notifier.enqueue(Notification::Welcome {
            email: user.email.clone(),
            name: user.name.clone(),
            referral_code: user.referral_code.clone(),
        });

        Ok(user)
    }

    async fn generate_unique_referral_code(&self) -> Result<String, ServiceError> {
        for _ in 0..REFERRAL_CODE_ATTEMPTS {
            let code = generate_referral_code();
            if self
                .db_client
                .get_user(None, None, Some(&code))
                .await?
                .is_none()
            {
                return Ok(code);
            }
        }

        Err(ServiceError::Validation(
            "Could not generate a unique referral code".to_string(),
        ))
    }

    pub async fn get_my_profile(&self, user_id: Uuid) -> Result<User, ServiceError> {
        self.db_client
            .get_user(Some(user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))
    }

    pub async fn get_all_users(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<User>, Pagination), ServiceError> {
        let users = self.db_client.get_users(page, limit).await?;
        let total = self.db_client.get_user_count().await?;

        Ok((users, Pagination::new(total, page, limit)))
    }

    pub async fn update_my_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, ServiceError> {
        if let Some(ref email) = email {
            if let Some(existing) = self.db_client.get_user(None, Some(email), None).await? {
                if existing.id != user_id {
                    return Err(ServiceError::EmailExists);
                }
            }
        }

        self.db_client
            .update_user_profile(user_id, name, email)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => ServiceError::UserNotFound(user_id),
                err => ServiceError::Database(err),
            })
    }

    pub async fn get_user_dashboard(
        &self,
        user_id: Uuid,
    ) -> Result<UserDashboardResult, ServiceError> {
        let user = self
            .db_client
            .get_user(Some(user_id), None, None)
            .await?
            .ok_or(ServiceError::UserNotFound(user_id))?;

        let dashboard = self
            .db_client
            .get_dashboard(user_id)
            .await?
            .unwrap_or(Dashboard {
                user_id,
                referred_users: 0,
                converted_users: 0,
                total_credits: 0,
                updated_at: None,
            });

        let recent_referrals = self
            .db_client
            .get_referrals_by_referrer(user_id, 1, 5)
            .await?;

        let referral_link = generate_referral_link(&self.frontend_url, &user.referral_code);

        Ok(UserDashboardResult {
            user,
            dashboard,
            recent_referrals,
            referral_link,
        })
    }

    pub async fn get_referral_history(
        &self,
        user_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<ReferralWithUser>, Pagination), ServiceError> {
        let referrals = self
            .db_client
            .get_referrals_by_referrer(user_id, page, limit)
            .await?;
        let total = self
            .db_client
            .get_referral_count_by_referrer(user_id)
            .await?;

        Ok((referrals, Pagination::new(total, page, limit)))
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ServiceError> {
        let user = self.db_client.get_user(Some(user_id), None, None).await?;
        if user.is_none() {
            return Err(ServiceError::UserNotFound(user_id));
        }

        Ok(self.db_client.soft_delete_user(user_id).await?)
    }
}
