// service/purchase_service.rs
use std::sync::Arc;

use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};
use uuid::Uuid;

use crate::{
    db::{db::DBClient, purchasedb::PurchaseExt, userdb::UserExt},
    dtos::Pagination,
    models::purchasemodel::{PurchaseStats, PurchaseWithReferrer, PurchaseWithUser},
    service::{
        error::ServiceError,
        referral_service::{ProcessPurchaseResult, ReferralService},
        stripe::{PaymentIntent, StripeClient, StripeCustomer},
    },
    utils::{currency, validation},
};

#[derive(Debug)]
pub struct CreatePurchaseResult {
    pub purchase: crate::models::purchasemodel::Purchase,
    pub credits_awarded: i32,
    pub is_first_purchase: bool,
    pub message: String,
}

#[derive(Debug)]
pub struct PaymentIntentResult {
    pub client_secret: String,
    pub payment_intent_id: String,
}

pub struct PurchaseService {
    db_client: Arc<DBClient>,
    referral_service: Arc<ReferralService>,
    stripe: Arc<StripeClient>,
}

impl PurchaseService {
    pub fn new(
        db_client: Arc<DBClient>,
        referral_service: Arc<ReferralService>,
        stripe: Arc<StripeClient>,
    ) -> Self {
        Self {
            db_client,
            referral_service,
            stripe,
        }
    }

    /// Record a purchase and award any referral/signup credits.
    pub async fn create_purchase(
        &self,
        user_id: Uuid,
        product_id: &str,
        amount: f64,
    ) -> Result<CreatePurchaseResult, ServiceError> {
        let user = self.db_client.get_user(Some(user_id), None, None).await?;
        if user.is_none() {
            return Err(ServiceError::UserNotFound(user_id));
        }

        let result: ProcessPurchaseResult = self
            .referral_service
            .process_purchase(user_id, product_id, amount)
            .await?;

        let message = if result.is_first_purchase {
            format!(
                "Purchase successful! You earned {} credits.",
                result.credits_awarded
            )
        } else {
            "Purchase successful!".to_string()
        };

        Ok(CreatePurchaseResult {
            purchase: result.purchase,
            credits_awarded: result.credits_awarded,
            is_first_purchase: result.is_first_purchase,
            message,
        })
    }

    pub async fn get_purchase_history(
        &self,
        user_id: Uuid,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<PurchaseWithReferrer>, Pagination), ServiceError> {
        let purchases = self
            .db_client
            .get_purchase_history(user_id, page, limit)
            .await?;
        let total = self.db_client.get_purchase_count(user_id).await?;

        Ok((purchases, Pagination::new(total, page, limit)))
    }

    pub async fn get_purchase_by_id(
        &self,
        purchase_id: Uuid,
        user_id: Uuid,
    ) -> Result<PurchaseWithReferrer, ServiceError> {
        self.db_client
            .get_purchase_by_id(purchase_id, user_id)
            .await?
            .ok_or(ServiceError::PurchaseNotFound(purchase_id))
    }

    pub async fn get_purchase_stats(&self, user_id: Uuid) -> Result<PurchaseStats, ServiceError> {
        Ok(self.db_client.get_purchase_stats(user_id).await?)
    }

    pub async fn get_all_purchases(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<(Vec<PurchaseWithUser>, Pagination), ServiceError> {
        let purchases = self.db_client.get_all_purchases(page, limit).await?;
        let total = self.db_client.get_total_purchase_count().await?;

        Ok((purchases, Pagination::new(total, page, limit)))
    }

    /// Demo path: synthesize a product id and run the normal purchase flow.
    pub async fn simulate_purchase(
        &self,
        user_id: Uuid,
        product_name: &str,
        amount: f64,
    ) -> Result<CreatePurchaseResult, ServiceError> {
        validation::validate_product_id(product_name).map_err(ServiceError::Validation)?;

        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        let product_id = format!("PROD_{}_{}", Utc::now().timestamp_millis(), suffix);

        self.create_purchase(user_id, &product_id, amount).await
    }

    pub async fn create_payment_intent(
        &self,
        user_id: Uuid,
        product_id: &str,
        amount: f64,
        currency: &str,
    ) -> Result<PaymentIntentResult, ServiceError> {
        validation::validate_product_id(product_id).map_err(ServiceError::Validation)?;
        validation::validate_amount(amount).map_err(ServiceError::Validation)?;

        let user = self.db_client.get_user(Some(user_id), None, None).await?;
        if user.is_none() {
            return Err(ServiceError::UserNotFound(user_id));
        }

        let intent = self
            .stripe
            .create_payment_intent(
                currency::dollars_to_cents(amount),
                currency,
                &user_id.to_string(),
                product_id,
            )
            .await
            .map_err(|e| ServiceError::PaymentProvider(e.to_string()))?;

        let client_secret = intent
            .client_secret
            .ok_or_else(|| ServiceError::PaymentProvider("Missing client secret".to_string()))?;

        Ok(PaymentIntentResult {
            client_secret,
            payment_intent_id: intent.id,
        })
    }

    /// Verify a Stripe payment and record the purchase it paid for. Credits
    /// are only ever awarded after the intent checks out: succeeded status,
    /// owned by the caller.
    pub async fn confirm_payment(
        &self,
        payment_intent_id: &str,
        user_id: Uuid,
    ) -> Result<CreatePurchaseResult, ServiceError> {
        let intent: PaymentIntent = self
            .stripe
            .retrieve_payment_intent(payment_intent_id)
            .await
            .map_err(|e| ServiceError::PaymentProvider(e.to_string()))?;

        if intent.status != "succeeded" {
            return Err(ServiceError::PaymentNotCompleted(intent.status));
        }

        let intent_user_id = intent
            .metadata
            .get("userId")
            .and_then(|id| Uuid::parse_str(id).ok());
        if intent_user_id != Some(user_id) {
            return Err(ServiceError::PaymentOwnershipMismatch);
        }

        let product_id = intent.metadata.get("productId").ok_or_else(|| {
            ServiceError::Validation("Payment intent is missing product metadata".to_string())
        })?;

        tracing::info!(
            "Confirmed Stripe payment {} of {} for user {}",
            intent.id,
            currency::format_cents_as_dollars(intent.amount),
            user_id
        );

        let amount = currency::cents_to_dollars(intent.amount);

        self.create_purchase(user_id, product_id, amount).await
    }

    pub async fn create_stripe_customer(
        &self,
        user_id: Uuid,
        email: &str,
        name: &str,
    ) -> Result<StripeCustomer, ServiceError> {
        self.stripe
            .create_customer(email, name, &user_id.to_string())
            .await
            .map_err(|e| ServiceError::PaymentProvider(e.to_string()))
    }
}
