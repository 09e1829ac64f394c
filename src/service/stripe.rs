// service/stripe.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::Config;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
    /// Minor currency units (cents).
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Thin adapter over the Stripe REST API. Amounts cross this boundary in
/// minor units only; callers convert at the edge.
pub struct StripeClient {
    secret_key: String,
    client: reqwest::Client,
}

impl StripeClient {
    pub fn new(config: &Config) -> Self {
        Self {
            secret_key: config.stripe_secret_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn create_payment_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        user_id: &str,
        product_id: &str,
    ) -> Result<PaymentIntent, Box<dyn std::error::Error + Send + Sync>> {
        let amount = amount_cents.to_string();
        let params = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("metadata[userId]", user_id),
            ("metadata[productId]", product_id),
            ("automatic_payment_methods[enabled]", "true"),
        ];

        let response = self
            .client
            .post(format!("{}/payment_intents", STRIPE_API_BASE))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntent, Box<dyn std::error::Error + Send + Sync>> {
        let response = self
            .client
            .get(format!(
                "{}/payment_intents/{}",
                STRIPE_API_BASE, payment_intent_id
            ))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub async fn create_customer(
        &self,
        email: &str,
        name: &str,
        user_id: &str,
    ) -> Result<StripeCustomer, Box<dyn std::error::Error + Send + Sync>> {
        let params = [
            ("email", email),
            ("name", name),
            ("metadata[userId]", user_id),
        ];

        let response = self
            .client
            .post(format!("{}/customers", STRIPE_API_BASE))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("Stripe request failed")
                .to_string();
            return Err(message.into());
        }

        Ok(serde_json::from_value(body)?)
    }
}
