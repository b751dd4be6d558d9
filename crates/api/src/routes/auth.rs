//! Token issuance.

use axum::{Json, extract::State};
use serde::Serialize;

use super::ApiJson;
use crate::error::Result;
use crate::services::Claims;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `POST /jwt` - sign the posted claims for one hour.
pub async fn issue_token(
    State(state): State<AppState>,
    ApiJson(claims): ApiJson<Claims>,
) -> Result<Json<TokenResponse>> {
    let token = state.tokens().issue(claims)?;
    Ok(Json(TokenResponse { token }))
}
