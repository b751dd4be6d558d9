//! Catalog routes.
//!
//! Reads are public. Writes pass the admin chain.

use axum::{
    Json,
    extract::{Path, State},
};

use swiftbite_core::MenuItemId;

use super::{ApiJson, parse_id};
use crate::error::Result;
use crate::middleware::AdminOnly;
use crate::models::{DeleteResult, InsertResult, MenuItem, MenuItemFields, UpdateResult};
use crate::state::AppState;

/// `GET /menu`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>> {
    Ok(Json(state.stores().menu.list().await?))
}

/// `GET /menu/category/{id}` - the item, or `null`.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<MenuItem>>> {
    let id: MenuItemId = parse_id(&id)?;
    Ok(Json(state.stores().menu.get(id).await?))
}

/// `POST /menu`
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminOnly,
    ApiJson(fields): ApiJson<MenuItemFields>,
) -> Result<Json<InsertResult<MenuItemId>>> {
    let item = state.stores().menu.insert(fields).await?;
    tracing::info!(menu_item_id = %item.id, name = %item.fields.name, "menu item created");
    Ok(Json(InsertResult {
        inserted_id: item.id,
    }))
}

/// `PATCH /menu/category/{id}` - replace every mutable field.
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminOnly,
    Path(id): Path<String>,
    ApiJson(fields): ApiJson<MenuItemFields>,
) -> Result<Json<UpdateResult>> {
    let id: MenuItemId = parse_id(&id)?;
    Ok(Json(state.stores().menu.update(id, fields).await?))
}

/// `DELETE /menu/{id}`
pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminOnly,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id: MenuItemId = parse_id(&id)?;
    let deleted_count = state.stores().menu.delete(id).await?;
    Ok(Json(DeleteResult { deleted_count }))
}
