mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod mail;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use crate::mail::sendmail::Mailer;
use crate::routes::create_router;

// Import the services
use service::{
    notifier::Notifier,
    purchase_service::PurchaseService,
    referral_service::ReferralService,
    stripe::StripeClient,
    user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub referral_service: Arc<ReferralService>,
    pub purchase_service: Arc<PurchaseService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(db_client: DBClient, mailer: Mailer, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        // Initialize all services
        let notifier = Arc::new(Notifier::new(Arc::new(mailer)));
        let stripe = Arc::new(StripeClient::new(&config));

        let referral_service = Arc::new(ReferralService::new(
            db_client_arc.clone(),
            notifier.clone(),
            &config,
        ));

        let purchase_service = Arc::new(PurchaseService::new(
            db_client_arc.clone(),
            referral_service.clone(),
            stripe,
        ));

        let user_service = Arc::new(UserService::new(
            db_client_arc.clone(),
            referral_service.clone(),
            notifier.clone(),
            &config,
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            referral_service,
            purchase_service,
            user_service,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    // Connect to PostgreSQL
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;

    tracing::info!("Connection to the database is successful!");

    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let db_client = DBClient::new(pool);

    let mailer = Mailer::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize mailer: {}", e))?;

    let allowed_origins = vec![
        config.frontend_url.parse::<HeaderValue>()?,
        "http://localhost:5173".parse::<HeaderValue>()?,
        "http://localhost:8000".parse::<HeaderValue>()?,
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app_state = Arc::new(AppState::new(db_client, mailer, config.clone()));

    let app = create_router(app_state).layer(cors);

    tracing::info!("Server is running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .context("Failed to bind server port")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
