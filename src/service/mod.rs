pub mod error;
pub mod notifier;
pub mod purchase_service;
pub mod referral;
pub mod referral_service;
pub mod stripe;
pub mod user_service;
