use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::referraldtos::{
        LeaderboardQueryDto, LeaderboardResponseDto, ReferralStatsResponseDto, ReferralUserDto,
        ValidateReferralResponseDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

const DEFAULT_LEADERBOARD_SIZE: usize = 10;

pub fn referrals_handler() -> Router {
    Router::new()
        .route("/validate/:referral_code", get(validate_referral_code))
        .route("/leaderboard", get(get_referral_leaderboard))
}

pub fn referral_stats_handler() -> Router {
    Router::new().route("/stats", get(get_referral_stats))
}

pub async fn get_referral_stats(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let result = app_state
        .referral_service
        .get_referral_stats(user.user.id)
        .await?;

    Ok(Json(ReferralStatsResponseDto {
        status: "success".to_string(),
        user: ReferralUserDto::from_user(&result.user),
        stats: result.stats,
        referral_link: result.referral_link,
    }))
}

pub async fn validate_referral_code(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(referral_code): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .referral_service
        .validate_referral_code(&referral_code)
        .await?;

    Ok(Json(ValidateReferralResponseDto {
        status: "success".to_string(),
        user: ReferralUserDto::from_user(&user),
    }))
}

pub async fn get_referral_leaderboard(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<LeaderboardQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let limit = query_params.limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE);

    let leaderboard = app_state
        .referral_service
        .get_referral_leaderboard(limit)
        .await?;

    Ok(Json(LeaderboardResponseDto {
        status: "success".to_string(),
        leaderboard,
    }))
}
