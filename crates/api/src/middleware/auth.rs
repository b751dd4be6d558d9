//! Authorization extractors.
//!
//! Each extractor evaluates one canonical [`GuardChain`]. Extraction happens
//! before the handler body runs, so a rejected request never reaches a
//! store operation.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::services::{AuthError, GuardChain, Passage, VerifiedIdentity};
use crate::state::AppState;

/// Extractor that requires a verified bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Authenticated(caller): Authenticated) -> impl IntoResponse {
///     format!("Hello, {}!", caller.email())
/// }
/// ```
pub struct Authenticated(pub VerifiedIdentity);

/// Extractor that requires a verified bearer token whose identity holds the
/// admin role (Verifier, then Gate).
pub struct AdminOnly {
    pub identity: VerifiedIdentity,
    pub user: User,
}

async fn run_chain(
    chain: GuardChain,
    parts: &Parts,
    state: &AppState,
) -> Result<Passage, AuthError> {
    let authorization = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let passage = chain
        .evaluate(authorization, state.tokens(), state.gate())
        .await?;

    if let Some(identity) = &passage.identity {
        set_sentry_user(identity.email().as_str());
    }

    Ok(passage)
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let passage = run_chain(GuardChain::AUTHENTICATED, parts, state).await?;
        let identity = passage.identity.ok_or(AuthError::Unauthorized)?;
        Ok(Self(identity))
    }
}

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let passage = run_chain(GuardChain::ADMIN, parts, state).await?;
        match (passage.identity, passage.admin) {
            (Some(identity), Some(user)) => Ok(Self { identity, user }),
            _ => Err(AuthError::Unauthorized.into()),
        }
    }
}
