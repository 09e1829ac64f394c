#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub frontend_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Stripe configuration
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    // Email service configuration
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    // Credit policy
    pub referral_bonus: i32,
    pub signup_bonus: i32,
    // Purchase workflow transaction bound, in seconds
    pub tx_timeout_secs: u64,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let frontend_url = std::env::var("FRONTEND_URL").expect("FRONTEND_URL must be set");

        // Stripe configuration (with defaults for local development)
        let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY")
            .unwrap_or_else(|_| "sk_test_placeholder".to_string());
        let stripe_webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .unwrap_or_else(|_| "".to_string());

        // Email service configuration (with defaults)
        let smtp_host = std::env::var("SMTP_HOST")
            .unwrap_or_else(|_| "localhost".to_string());
        let smtp_username = std::env::var("SMTP_USERNAME")
            .unwrap_or_else(|_| "".to_string());
        let smtp_password = std::env::var("SMTP_PASSWORD")
            .unwrap_or_else(|_| "".to_string());
        let from_email = std::env::var("FROM_EMAIL")
            .unwrap_or_else(|_| "Neo Market <noreply@neomarket.app>".to_string());

        let referral_bonus = std::env::var("REFERRAL_BONUS")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(2);
        let signup_bonus = std::env::var("SIGNUP_BONUS")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(1);

        let tx_timeout_secs = std::env::var("TX_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        Config {
            database_url,
            frontend_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8000),
            stripe_secret_key,
            stripe_webhook_secret,
            smtp_host,
            smtp_username,
            smtp_password,
            from_email,
            referral_bonus,
            signup_bonus,
            tx_timeout_secs,
        }
    }
}
