//! Identity domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use swiftbite_core::{Email, Role, UserId};

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: UserId,
    /// Unique identity key.
    pub email: Email,
    /// Display name supplied at registration.
    pub name: Option<String>,
    /// Avatar URL supplied at registration.
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    /// Stored role; only elevation ever changes it.
    pub role: Role,
    /// When the identity registered.
    pub created_at: DateTime<Utc>,
}

/// Self-registration payload.
///
/// The role is never taken from the request; new identities always start
/// as [`Role::None`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: Email,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "photoURL", alias = "photo_url")]
    pub photo_url: Option<String>,
}
