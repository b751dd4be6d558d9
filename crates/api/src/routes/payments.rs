//! Payment routes: charge intents and settlement.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use swiftbite_core::to_minor_units;

use super::{ApiJson, self_scoped};
use crate::error::{AppError, Result};
use crate::middleware::Authenticated;
use crate::models::{Payment, PaymentDraft};
use crate::services::SettlementOutcome;
use crate::state::AppState;
use crate::stripe::CURRENCY;

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// `POST /create-payment-intent` - open a card charge for `price`.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Authenticated(_caller): Authenticated,
    ApiJson(request): ApiJson<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>> {
    let amount = to_minor_units(request.price).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let client_secret = state
        .charges()
        .create_payment_intent(amount, CURRENCY)
        .await?;
    Ok(Json(PaymentIntentResponse { client_secret }))
}

/// `GET /payment/{email}` - the caller's settled payments.
pub async fn list(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(email): Path<String>,
) -> Result<Json<Vec<Payment>>> {
    let email = self_scoped(&caller, &email)?;
    Ok(Json(state.stores().payments.list_by_email(&email).await?))
}

/// `POST /payment` - record the payment, then remove the orders it settles.
///
/// Not idempotent: posting the same draft twice records two payments.
pub async fn settle(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(draft): ApiJson<PaymentDraft>,
) -> Result<Json<SettlementOutcome>> {
    caller.ensure_self(&draft.email)?;
    Ok(Json(state.settlement().settle(draft).await?))
}
