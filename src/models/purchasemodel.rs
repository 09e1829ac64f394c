use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable record of a completed purchase. Never updated or deleted.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: String,
    pub amount: f64,
    pub is_first_purchase: bool,
    pub purchase_date: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Purchase joined with the converting referral's referrer, when one exists.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct PurchaseWithReferrer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: String,
    pub amount: f64,
    pub is_first_purchase: bool,
    pub purchase_date: DateTime<Utc>,
    pub referrer_id: Option<Uuid>,
    pub referrer_name: Option<String>,
    pub referrer_email: Option<String>,
}

/// Purchase joined with the purchasing user, for the admin listing.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct PurchaseWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: String,
    pub amount: f64,
    pub is_first_purchase: bool,
    pub purchase_date: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct PurchaseStats {
    pub total_purchases: i64,
    pub total_spent: f64,
    pub average_purchase_amount: f64,
    pub first_purchase_date: Option<DateTime<Utc>>,
    pub last_purchase_date: Option<DateTime<Utc>>,
}
