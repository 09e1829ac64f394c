use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        auth::auth_handler,
        purchases::purchases_handler,
        referrals::{referral_stats_handler, referrals_handler},
        users::users_handler,
        webhook::webhook_handler,
    },
    middleware::auth,
    AppState,
};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Referral stats require auth; code validation and the leaderboard are
    // public.
    let referral_routes = Router::new()
        .merge(referral_stats_handler().layer(middleware::from_fn(auth)))
        .merge(referrals_handler());

    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/purchases",
            purchases_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/referrals", referral_routes)
        .nest("/webhook", webhook_handler())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_route)
}
