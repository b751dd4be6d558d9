//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Responses are always JSON of
//! the form `{ "error": true, "message": ... }`; server-side faults are
//! captured to Sentry and reported to the client without internal detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, SettlementError};
use crate::stripe::StripeError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Auth chain rejected the request.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Settlement failed, possibly after recording the payment.
    #[error("Settlement error: {0}")]
    Settlement(#[from] SettlementError),

    /// Charge provider call failed.
    #[error("Payment provider error: {0}")]
    Stripe(#[from] StripeError),

    /// Caller asked for another identity's statistics.
    #[error("unauthorized access!")]
    IdentityMismatch,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                AuthError::Signing(_) | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Settlement(err) => match err {
                SettlementError::InvalidDraft(_) => StatusCode::BAD_REQUEST,
                SettlementError::PaymentInsert(_) | SettlementError::OrdersNotRemoved { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Stripe(_) => StatusCode::BAD_GATEWAY,
            Self::IdentityMismatch => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn is_server_fault(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Auth(AuthError::Unauthorized) => {
                json!({ "error": true, "message": "unauthorized access" })
            }
            Self::Auth(AuthError::Forbidden) => {
                json!({ "error": true, "message": "forbidden access" })
            }
            Self::IdentityMismatch => json!({ "error": true, "message": "unauthorized access!" }),
            Self::BadRequest(msg) => json!({ "error": true, "message": msg }),
            Self::Settlement(SettlementError::InvalidDraft(msg)) => {
                json!({ "error": true, "message": msg })
            }
            Self::Settlement(SettlementError::OrdersNotRemoved {
                payment_id,
                order_ids,
                ..
            }) => json!({
                "error": true,
                "message": "settlement incomplete",
                "insertedPaymentId": payment_id,
                "pendingOrderIds": order_ids,
            }),
            Self::Stripe(_) => json!({ "error": true, "message": "payment provider error" }),
            _ => json!({ "error": true, "message": "internal server error" }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the verified caller.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_string()),
            ..Default::default()
        }));
    });
}
