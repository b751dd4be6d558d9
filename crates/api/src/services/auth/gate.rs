//! Role Gate: elevated capability from stored role.

use std::sync::Arc;

use swiftbite_core::Email;

use super::{AuthError, VerifiedIdentity};
use crate::db::UserStore;
use crate::models::User;

/// Grants administrative capability iff the stored role is `admin`.
///
/// Trusts the decoded email unconditionally, so it takes a
/// [`VerifiedIdentity`] rather than a bare email.
#[derive(Clone)]
pub struct RoleGate {
    users: Arc<dyn UserStore>,
}

impl RoleGate {
    /// Create a gate backed by the identity store.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Require the verified caller to hold the admin role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the identity is unknown or not an
    /// admin, or `AuthError::Repository` if the lookup fails.
    pub async fn require_admin(&self, identity: &VerifiedIdentity) -> Result<User, AuthError> {
        match self.users.find_by_email(identity.email()).await? {
            Some(user) if user.role.is_admin() => Ok(user),
            _ => {
                tracing::debug!(email = %identity.email(), "admin capability denied");
                Err(AuthError::Forbidden)
            }
        }
    }

    /// Whether the identity stored under `email` is an admin.
    ///
    /// Unknown identities are not admins.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn is_admin(&self, email: &Email) -> Result<bool, AuthError> {
        Ok(self
            .users
            .find_by_email(email)
            .await?
            .is_some_and(|user| user.role.is_admin()))
    }
}
