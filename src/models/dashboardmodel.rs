use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Denormalized per-user referral aggregate. Advisory only: recomputable from
/// referrals/purchases, and the purchase workflow tolerates update failures.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Dashboard {
    pub user_id: Uuid,
    pub referred_users: i32,
    pub converted_users: i32,
    pub total_credits: i32,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Dashboard joined with its owner's public profile, for the leaderboard.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct DashboardWithUser {
    pub user_id: Uuid,
    pub referred_users: i32,
    pub converted_users: i32,
    pub total_credits: i32,
    pub name: String,
    pub email: String,
    pub referral_code: String,
}
