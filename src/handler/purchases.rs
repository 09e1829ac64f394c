use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        purchasedtos::{
            AdminPurchaseListResponseDto, ConfirmPaymentDto, CreatePaymentIntentDto,
            CreatePurchaseDto, PaymentIntentResponseDto, PurchaseDetailResponseDto,
            PurchaseHistoryResponseDto, PurchaseResponseDto, PurchaseResultDto,
            PurchaseStatsResponseDto, SimulatePurchaseDto, StripeCustomerResponseDto,
        },
        RequestQueryDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    utils::validation,
    AppState,
};

pub fn purchases_handler() -> Router {
    Router::new()
        .route("/", post(create_purchase))
        .route("/simulate", post(simulate_purchase))
        .route("/history", get(get_purchase_history))
        .route("/stats/overview", get(get_purchase_stats))
        .route(
            "/admin/all",
            get(get_all_purchases).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route("/payment-intent", post(create_payment_intent))
        .route("/confirm-payment", post(confirm_payment))
        .route("/customer", post(create_stripe_customer))
        .route("/:id", get(get_purchase_by_id))
}

pub async fn create_purchase(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreatePurchaseDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .purchase_service
        .create_purchase(user.user.id, &body.product_id, body.amount)
        .await?;

    Ok(Json(PurchaseResponseDto {
        status: "success".to_string(),
        message: result.message,
        data: PurchaseResultDto {
            purchase: result.purchase,
            credits_awarded: result.credits_awarded,
            is_first_purchase: result.is_first_purchase,
        },
    }))
}

pub async fn simulate_purchase(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<SimulatePurchaseDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .purchase_service
        .simulate_purchase(user.user.id, &body.product_name, body.amount)
        .await?;

    Ok(Json(PurchaseResponseDto {
        status: "success".to_string(),
        message: result.message,
        data: PurchaseResultDto {
            purchase: result.purchase,
            credits_awarded: result.credits_awarded,
            is_first_purchase: result.is_first_purchase,
        },
    }))
}

pub async fn get_purchase_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (page, limit) = validation::clamp_pagination(query_params.page, query_params.limit);

    let (purchases, pagination) = app_state
        .purchase_service
        .get_purchase_history(user.user.id, page, limit)
        .await?;

    Ok(Json(PurchaseHistoryResponseDto {
        status: "success".to_string(),
        purchases,
        pagination,
    }))
}

pub async fn get_purchase_by_id(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(purchase_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let purchase = app_state
        .purchase_service
        .get_purchase_by_id(purchase_id, user.user.id)
        .await?;

    Ok(Json(PurchaseDetailResponseDto {
        status: "success".to_string(),
        purchase,
    }))
}

pub async fn get_purchase_stats(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state
        .purchase_service
        .get_purchase_stats(user.user.id)
        .await?;

    Ok(Json(PurchaseStatsResponseDto {
        status: "success".to_string(),
        stats,
    }))
}

pub async fn get_all_purchases(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (page, limit) = validation::clamp_pagination(query_params.page, query_params.limit);

    let (purchases, pagination) = app_state
        .purchase_service
        .get_all_purchases(page, limit)
        .await?;

    Ok(Json(AdminPurchaseListResponseDto {
        status: "success".to_string(),
        purchases,
        pagination,
    }))
}

pub async fn create_payment_intent(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreatePaymentIntentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let currency = body.currency.as_deref().unwrap_or("usd");

    let result = app_state
        .purchase_service
        .create_payment_intent(user.user.id, &body.product_id, body.amount, currency)
        .await?;

    Ok(Json(PaymentIntentResponseDto {
        status: "success".to_string(),
        client_secret: result.client_secret,
        payment_intent_id: result.payment_intent_id,
    }))
}

/// Register the caller as a Stripe customer, for saved payment methods.
pub async fn create_stripe_customer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let customer = app_state
        .purchase_service
        .create_stripe_customer(user.user.id, &user.user.email, &user.user.name)
        .await?;

    Ok(Json(StripeCustomerResponseDto {
        status: "success".to_string(),
        customer_id: customer.id,
    }))
}

pub async fn confirm_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<ConfirmPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .purchase_service
        .confirm_payment(&body.payment_intent_id, user.user.id)
        .await?;

    Ok(Json(PurchaseResponseDto {
        status: "success".to_string(),
        message: "Payment confirmed and purchase processed successfully!".to_string(),
        data: PurchaseResultDto {
            purchase: result.purchase,
            credits_awarded: result.credits_awarded,
            is_first_purchase: result.is_first_purchase,
        },
    }))
}
