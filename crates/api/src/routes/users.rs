//! Identity routes.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use swiftbite_core::{Email, Role, UserId};

use super::{ApiJson, parse_id};
use crate::error::Result;
use crate::middleware::{AdminOnly, Authenticated};
use crate::models::{DeleteResult, InsertResult, NewUser, UpdateResult, User};
use crate::services::{RegistrationOutcome, register as register_identity};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminStatus {
    pub admin: bool,
}

/// `GET /user` - every identity.
pub async fn list(State(state): State<AppState>, _admin: AdminOnly) -> Result<Json<Vec<User>>> {
    Ok(Json(state.stores().users.list().await?))
}

/// `POST /user` - register if unseen.
///
/// Re-registering an existing email is not an error; the stored identity is
/// left untouched.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(user): ApiJson<NewUser>,
) -> Result<Response> {
    let response = match register_identity(state.stores().users.as_ref(), user).await? {
        RegistrationOutcome::Created(user) => Json(InsertResult {
            inserted_id: user.id,
        })
        .into_response(),
        RegistrationOutcome::AlreadyExists => Json(json!({
            "message": "user already exists",
            "insertedId": null,
        }))
        .into_response(),
    };
    Ok(response)
}

/// `DELETE /user/{id}`
pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminOnly,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>> {
    let id: UserId = parse_id(&id)?;
    let deleted_count = state.stores().users.delete(id).await?;
    Ok(Json(DeleteResult { deleted_count }))
}

/// `GET /user/admin/{email}` - whether the caller holds the admin role.
///
/// Asking about anyone else answers `false` without consulting the store.
pub async fn admin_status(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    Path(email): Path<String>,
) -> Result<Json<AdminStatus>> {
    let is_self = Email::parse(&email).is_ok_and(|email| &email == caller.email());
    if !is_self {
        return Ok(Json(AdminStatus { admin: false }));
    }

    let admin = state.gate().is_admin(caller.email()).await?;
    Ok(Json(AdminStatus { admin }))
}

/// `PATCH /user/admin/{id}` - elevate an identity to admin.
pub async fn elevate(
    State(state): State<AppState>,
    admin: AdminOnly,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>> {
    let id: UserId = parse_id(&id)?;
    let result = state.stores().users.set_role(id, Role::Admin).await?;
    if result.modified_count > 0 {
        tracing::info!(user_id = %id, by = %admin.identity.email(), "identity elevated to admin");
    }
    Ok(Json(result))
}
