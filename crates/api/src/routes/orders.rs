//! Pending-order routes. Every operation is scoped to the caller.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use swiftbite_core::OrderId;

use super::{ApiJson, parse_id, self_scoped};
use crate::error::Result;
use crate::middleware::Authenticated;
use crate::models::{DeleteResult, InsertResult, NewOrder, Order};
use crate::services::statistics::{BookingEntry, booking_history as join_history, referenced_names};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub email: Option<String>,
}

/// `GET /order?email=` - the caller's pending orders.
///
/// No `email` means no orders.
pub async fn list(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Query(query): Query<OrderQuery>,
) -> Result<Json<Vec<Order>>> {
    let Some(raw) = query.email.filter(|e| !e.trim().is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    let email = self_scoped(&caller, &raw)?;
    Ok(Json(state.stores().orders.list_by_buyer(&email).await?))
}

/// `POST /order` - place an order on the caller's behalf.
pub async fn create(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(order): ApiJson<NewOrder>,
) -> Result<Json<InsertResult<OrderId>>> {
    caller.ensure_self(&order.buyer_email)?;
    let order = state.stores().orders.insert(order).await?;
    tracing::info!(order_id = %order.id, "order placed");
    Ok(Json(InsertResult {
        inserted_id: order.id,
    }))
}

/// `DELETE /order/{id}` - cancel one of the caller's orders.
///
/// Someone else's order counts as missing.
pub async fn cancel(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id: OrderId = parse_id(&id)?;
    let deleted_count = state
        .stores()
        .orders
        .delete_owned(id, caller.email())
        .await?;
    Ok(Json(DeleteResult { deleted_count }))
}

/// `GET /bookingHistory/{email}` - the caller's payments joined with the catalog.
pub async fn booking_history(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(email): Path<String>,
) -> Result<Json<Vec<BookingEntry>>> {
    let email = self_scoped(&caller, &email)?;
    let stores = state.stores();

    let payments = stores.payments.list_by_email(&email).await?;
    let names = referenced_names(&payments);
    let menu = if names.is_empty() {
        Vec::new()
    } else {
        stores.menu.find_by_names(&names).await?
    };

    Ok(Json(join_history(&payments, &menu)))
}
