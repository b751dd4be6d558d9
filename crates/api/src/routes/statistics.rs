//! Aggregate read routes.

use axum::{
    Json,
    extract::{Path, State},
};
use swiftbite_core::Email;

use crate::error::{AppError, Result};
use crate::middleware::{AdminOnly, Authenticated};
use crate::services::statistics::{
    AdminStatistics, UserStatistics, admin_statistics, user_statistics,
};
use crate::state::AppState;

/// `GET /user-statistics/{email}`
///
/// A mismatch here answers `401`, unlike the other self-scoped routes.
pub async fn user(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(email): Path<String>,
) -> Result<Json<UserStatistics>> {
    let email = Email::parse(&email).map_err(|_| AppError::IdentityMismatch)?;
    if &email != caller.email() {
        return Err(AppError::IdentityMismatch);
    }

    let stores = state.stores();
    let payments = stores.payments.list_by_email(&email).await?;
    let menu_items = stores.menu.count().await?;

    Ok(Json(user_statistics(&payments, menu_items)))
}

/// `GET /admin-statistics`
pub async fn admin(
    State(state): State<AppState>,
    _admin: AdminOnly,
) -> Result<Json<AdminStatistics>> {
    let stores = state.stores();
    let (users, menu_items, orders, payments) = tokio::try_join!(
        stores.users.count(),
        stores.menu.count(),
        stores.orders.count(),
        stores.payments.list_all(),
    )?;

    Ok(Json(admin_statistics(users, menu_items, orders, &payments)))
}
