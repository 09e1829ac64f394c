use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "referral_status", rename_all = "snake_case")]
pub enum ReferralStatus {
    Pending,
    Converted,
}

/// Referrer -> referred relationship, created at registration time.
/// Transitions pending -> converted at most once, on the referred user's
/// first purchase. Converted is terminal.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Referral {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referred_id: Uuid,
    pub referral_code: String,
    pub status: ReferralStatus,
    pub converted_at: Option<DateTime<Utc>>,
    pub purchase_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReferralStats {
    pub total_referred_users: i64,
    pub converted_users: i64,
    pub pending_users: i64,
    pub total_credits_earned: i64,
    pub conversion_rate: f64,
}

/// Referral row joined with the referred user's public profile, for history
/// listings.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct ReferralWithUser {
    pub id: Uuid,
    pub status: ReferralStatus,
    pub converted_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub referred_id: Uuid,
    pub referred_name: String,
    pub referred_email: String,
}
