use std::sync::Arc;

use axum::{http::HeaderMap, response::IntoResponse, routing::post, Extension, Json, Router};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::{dtos::Response, error::HttpError, AppState};

/// Reject signatures whose timestamp is older than this, to blunt replay.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

pub fn webhook_handler() -> Router {
    Router::new().route("/stripe", post(stripe_webhook))
}

/// Stripe event receiver. Only `payment_intent.succeeded` matters here: it is
/// confirmed through the same verify-before-award path as the client-driven
/// confirmation endpoint.
pub async fn stripe_webhook(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, HttpError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| HttpError::unauthorized("Missing Stripe signature".to_string()))?;

    let webhook_secret = &app_state.env.stripe_webhook_secret;
    if webhook_secret.is_empty() {
        tracing::error!("Stripe webhook received but STRIPE_WEBHOOK_SECRET is not configured");
        return Err(HttpError::server_error("Webhook not configured"));
    }

    if !verify_stripe_signature(&body, signature, webhook_secret) {
        tracing::warn!("Invalid Stripe webhook signature received");
        return Err(HttpError::unauthorized("Invalid webhook signature".to_string()));
    }

    let event: serde_json::Value = serde_json::from_str(&body)
        .map_err(|_| HttpError::bad_request("Invalid webhook payload".to_string()))?;

    let event_type = event["type"].as_str().unwrap_or_default();
    if event_type != "payment_intent.succeeded" {
        tracing::debug!("Ignoring Stripe event type: {}", event_type);
        return Ok(Json(Response {
            status: "success",
            message: "Event ignored".to_string(),
        }));
    }

    let intent = &event["data"]["object"];
    let intent_id = intent["id"]
        .as_str()
        .ok_or_else(|| HttpError::bad_request("Event is missing payment intent id".to_string()))?;
    let user_id = intent["metadata"]["userId"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| HttpError::bad_request("Event is missing user metadata".to_string()))?;

    app_state
        .purchase_service
        .confirm_payment(intent_id, user_id)
        .await?;

    Ok(Json(Response {
        status: "success",
        message: "Payment processed".to_string(),
    }))
}

/// Stripe signs `{timestamp}.{raw body}` with HMAC-SHA256; the header carries
/// `t=<timestamp>,v1=<hex signature>[,v1=...]`.
fn verify_stripe_signature(payload: &str, sig_header: &str, secret: &str) -> bool {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in sig_header.split(',') {
        match part.split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let Some(timestamp) = timestamp else {
        return false;
    };
    if signatures.is_empty() {
        return false;
    }

    let age = chrono::Utc::now().timestamp() - timestamp;
    if age > SIGNATURE_TOLERANCE_SECS {
        return false;
    }

    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(signed_payload.as_bytes());
    let expected = mac.finalize().into_bytes();

    signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|decoded| decoded.ct_eq(&expected).into())
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(payload: &str, timestamp: i64, secret: &str) -> String {
        let signed_payload = format!("{}.{}", timestamp, payload);
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = r#"{"type":"payment_intent.succeeded"}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(payload, timestamp, "whsec_test");
        let header = format!("t={},v1={}", timestamp, signature);

        assert!(verify_stripe_signature(payload, &header, "whsec_test"));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(r#"{"amount":100}"#, timestamp, "whsec_test");
        let header = format!("t={},v1={}", timestamp, signature);

        assert!(!verify_stripe_signature(r#"{"amount":999}"#, &header, "whsec_test"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = r#"{"amount":100}"#;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(payload, timestamp, "whsec_a");
        let header = format!("t={},v1={}", timestamp, signature);

        assert!(!verify_stripe_signature(payload, &header, "whsec_b"));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = r#"{"amount":100}"#;
        let timestamp = chrono::Utc::now().timestamp() - SIGNATURE_TOLERANCE_SECS - 1;
        let signature = sign(payload, timestamp, "whsec_test");
        let header = format!("t={},v1={}", timestamp, signature);

        assert!(!verify_stripe_signature(payload, &header, "whsec_test"));
    }

    #[test]
    fn test_malformed_header_rejected() {
        assert!(!verify_stripe_signature("{}", "garbage", "whsec_test"));
        assert!(!verify_stripe_signature("{}", "t=notanumber,v1=00", "whsec_test"));
    }
}
