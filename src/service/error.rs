use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::error::{ErrorMessage, HttpError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("User not found")]
    UserNotFound(Uuid),

    #[error("Purchase not found")]
    PurchaseNotFound(Uuid),

    #[error("Invalid referral code")]
    ReferralCodeNotFound,

    #[error("Referral already exists")]
    ReferralAlreadyExists,

    #[error("A user with this email already exists")]
    EmailExists,

    #[error("{0}")]
    Validation(String),

    #[error("Payment not completed (status: {0})")]
    PaymentNotCompleted(String),

    #[error("Payment does not belong to user")]
    PaymentOwnershipMismatch,

    #[error("Payment provider error: {0}")]
    PaymentProvider(String),

    #[error("Purchase transaction exceeded {0:?}")]
    TransactionTimeout(Duration),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::UserNotFound(_) => HttpError::not_found("User not found"),
            ServiceError::PurchaseNotFound(_) => HttpError::not_found("Purchase not found"),
            ServiceError::ReferralCodeNotFound => HttpError::not_found("Invalid referral code"),

            ServiceError::ReferralAlreadyExists => {
                HttpError::unique_constraint_violation("Referral already exists")
            }
            ServiceError::EmailExists => {
                HttpError::unique_constraint_violation(ErrorMessage::EmailExist.to_string())
            }

            ServiceError::Validation(_) | ServiceError::PaymentNotCompleted(_) => {
                HttpError::bad_request(error.to_string())
            }

            ServiceError::PaymentOwnershipMismatch => {
                HttpError::forbidden("Payment does not belong to user")
            }

            // Internal detail stays in the logs, not in the response body.
            ServiceError::Database(ref err) => {
                tracing::error!("Database error: {}", err);
                HttpError::server_error("Internal server error")
            }
            ServiceError::PaymentProvider(ref err) => {
                tracing::error!("Payment provider error: {}", err);
                HttpError::server_error("Payment processing failed")
            }
            ServiceError::TransactionTimeout(duration) => {
                tracing::error!("Purchase transaction exceeded {:?}", duration);
                HttpError::server_error("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_status_mapping() {
        let user_id = Uuid::new_v4();
        assert_eq!(
            HttpError::from(ServiceError::UserNotFound(user_id)).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HttpError::from(ServiceError::ReferralCodeNotFound).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HttpError::from(ServiceError::ReferralAlreadyExists).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            HttpError::from(ServiceError::EmailExists).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            HttpError::from(ServiceError::Validation("bad amount".to_string())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::from(ServiceError::PaymentNotCompleted("processing".to_string())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::from(ServiceError::PaymentOwnershipMismatch).status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            HttpError::from(ServiceError::Database(sqlx::Error::RowNotFound)).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HttpError::from(ServiceError::TransactionTimeout(Duration::from_secs(10))).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = HttpError::from(ServiceError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.message, "Internal server error");

        let err = HttpError::from(ServiceError::PaymentProvider("card declined".to_string()));
        assert_eq!(err.message, "Payment processing failed");
    }
}
