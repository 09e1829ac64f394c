use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    dtos::Pagination,
    models::purchasemodel::{Purchase, PurchaseStats, PurchaseWithReferrer, PurchaseWithUser},
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreatePurchaseDto {
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,

    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SimulatePurchaseDto {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub product_name: String,

    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentDto {
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,

    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,

    pub currency: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentDto {
    #[validate(length(min = 1, message = "Payment Intent ID is required"))]
    pub payment_intent_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseResultDto {
    pub purchase: Purchase,
    pub credits_awarded: i32,
    pub is_first_purchase: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseResponseDto {
    pub status: String,
    pub message: String,
    pub data: PurchaseResultDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseHistoryResponseDto {
    pub status: String,
    pub purchases: Vec<PurchaseWithReferrer>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseDetailResponseDto {
    pub status: String,
    pub purchase: PurchaseWithReferrer,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseStatsResponseDto {
    pub status: String,
    pub stats: PurchaseStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminPurchaseListResponseDto {
    pub status: String,
    pub purchases: Vec<PurchaseWithUser>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentIntentResponseDto {
    pub status: String,
    pub client_secret: String,
    pub payment_intent_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StripeCustomerResponseDto {
    pub status: String,
    pub customer_id: String,
}
