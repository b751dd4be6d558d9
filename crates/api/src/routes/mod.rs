//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - Greeting
//! GET    /health                    - Liveness
//! GET    /health/ready              - Readiness (pings the store)
//!
//! # Tokens
//! POST   /jwt                       - Issue a bearer token for the posted claims
//!
//! # Identities
//! GET    /user                      - List identities (admin)
//! POST   /user                      - Idempotent self-registration
//! DELETE /user/{id}                 - Remove an identity (admin)
//! GET    /user/admin/{email}        - Is the caller an admin (self only)
//! PATCH  /user/admin/{id}           - Elevate an identity to admin (admin)
//!
//! The two `/user/admin/*` routes share one path pattern; the segment is an
//! email for `GET` and a user ID for `PATCH`.
//!
//! # Catalog
//! GET    /menu                      - All menu items
//! GET    /menu/category/{id}        - One menu item or null
//! POST   /menu                      - Insert (admin)
//! PATCH  /menu/category/{id}        - Replace mutable fields (admin)
//! DELETE /menu/{id}                 - Delete (admin)
//!
//! # Orders (caller's own)
//! GET    /order?email=              - Pending orders
//! POST   /order                     - Place an order
//! DELETE /order/{id}                - Cancel an order
//! GET    /bookingHistory/{email}    - Payments joined with the catalog
//!
//! # Payments
//! POST   /create-payment-intent     - Charge-provider intent, returns clientSecret
//! GET    /payment/{email}           - Caller's payments
//! POST   /payment                   - Settle orders into a payment
//!
//! # Statistics
//! GET    /user-statistics/{email}   - Caller's totals
//! GET    /admin-statistics          - Platform totals (admin)
//! ```

pub mod auth;
pub mod health;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod statistics;
pub mod users;

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
    middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use swiftbite_core::Email;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::services::{AuthError, VerifiedIdentity};
use crate::state::AppState;

/// All API routes, without state or layers.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/jwt", post(auth::issue_token))
        .route("/user", get(users::list).post(users::register))
        .route("/user/{id}", delete(users::remove))
        .route(
            "/user/admin/{key}",
            get(users::admin_status).patch(users::elevate),
        )
        .route("/menu", get(menu::list).post(menu::create))
        .route("/menu/{id}", delete(menu::remove))
        .route(
            "/menu/category/{id}",
            get(menu::get_one).patch(menu::update),
        )
        .route("/order", get(orders::list).post(orders::create))
        .route("/order/{id}", delete(orders::cancel))
        .route("/bookingHistory/{email}", get(orders::booking_history))
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route("/payment", post(payments::settle))
        .route("/payment/{email}", get(payments::list))
        .route("/user-statistics/{email}", get(statistics::user))
        .route("/admin-statistics", get(statistics::admin))
}

/// The full application: routes, state, and the tracing/request-id/CORS stack.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

async fn index() -> &'static str {
    "Hello swiftBite!"
}

// =============================================================================
// Shared extractors and helpers
// =============================================================================

/// JSON body extractor whose rejection is a JSON `400`.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Parse a path ID.
fn parse_id<T: FromStr>(raw: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {raw}")))
}

/// Self-scoped check against a caller-supplied email.
///
/// A value that is not even an email cannot be the caller's.
fn self_scoped(caller: &VerifiedIdentity, raw: &str) -> Result<Email, AuthError> {
    let email = Email::parse(raw).map_err(|_| AuthError::Forbidden)?;
    caller.ensure_self(&email)?;
    Ok(email)
}
