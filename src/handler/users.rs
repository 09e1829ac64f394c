use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::referraldb::ReferralExt,
    dtos::{
        userdtos::{
            FilterUserDto, UpdateUserProfileDto, UserData, UserListResponseDto, UserResponseDto,
        },
        Response, RequestQueryDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    utils::validation,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_my_profile))
        .route("/dashboard", get(get_user_dashboard))
        .route("/referral-history", get(get_referral_history))
        .route("/referral-status", get(check_referral_status))
        .route(
            "/admin/all",
            get(get_all_users).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route(
            "/admin/:user_id",
            delete(delete_user).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route("/:user_id", get(get_user_profile))
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user.user),
        },
    }))
}

pub async fn update_my_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateUserProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated = app_state
        .user_service
        .update_my_profile(user.user.id, body.name, body.email)
        .await?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    }))
}

pub async fn get_user_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state.user_service.get_my_profile(user_id).await?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn get_user_dashboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let result = app_state
        .user_service
        .get_user_dashboard(user.user.id)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "user": FilterUserDto::filter_user(&result.user),
        "dashboard": {
            "totalReferredUsers": result.dashboard.referred_users,
            "convertedUsers": result.dashboard.converted_users,
            "totalCreditsEarned": result.dashboard.total_credits,
            "referralLink": result.referral_link,
        },
        "recentReferrals": result.recent_referrals,
    })))
}

pub async fn get_referral_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (page, limit) = validation::clamp_pagination(query_params.page, query_params.limit);

    let (referrals, meta) = app_state
        .user_service
        .get_referral_history(user.user.id, page, limit)
        .await?;

    Ok(Json(crate::dtos::referraldtos::ReferralHistoryResponseDto {
        status: "success".to_string(),
        referrals,
        meta,
    }))
}

/// Whether the current user was referred by someone, and where that referral
/// stands.
pub async fn check_referral_status(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let referral = app_state
        .db_client
        .get_referral_by_referred(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(json!({
        "status": "success",
        "wasReferred": referral.is_some(),
        "referral": referral,
    })))
}

pub async fn get_all_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (page, limit) = validation::clamp_pagination(query_params.page, query_params.limit);

    let (users, meta) = app_state.user_service.get_all_users(page, limit).await?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        meta,
    }))
}

pub async fn delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.user_service.delete_user(user_id).await?;

    Ok(Json(Response {
        status: "success",
        message: "User deleted successfully".to_string(),
    }))
}
