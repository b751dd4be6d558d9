//! Idempotent self-registration.

use tracing::instrument;

use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, User};

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new identity was inserted with role `none`.
    Created(User),
    /// An identity with this email already existed; nothing was written.
    AlreadyExists,
}

/// Register an identity unless its email is already known.
///
/// Check-then-insert; a concurrent registration that slips between the two
/// steps is caught by the store's uniqueness constraint and folded into
/// [`RegistrationOutcome::AlreadyExists`].
///
/// # Errors
///
/// Returns `RepositoryError` if the store fails for any other reason.
#[instrument(skip(users, user), fields(email = %user.email))]
pub async fn register(
    users: &dyn UserStore,
    user: NewUser,
) -> Result<RegistrationOutcome, RepositoryError> {
    if users.find_by_email(&user.email).await?.is_some() {
        tracing::debug!("identity already registered");
        return Ok(RegistrationOutcome::AlreadyExists);
    }

    match users.insert(user).await {
        Ok(created) => {
            tracing::info!(user_id = %created.id, "identity registered");
            Ok(RegistrationOutcome::Created(created))
        }
        Err(RepositoryError::Conflict(_)) => {
            tracing::debug!("lost registration race");
            Ok(RegistrationOutcome::AlreadyExists)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use swiftbite_core::{Email, Role};

    use super::*;
    use crate::db::MemoryStore;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: Email::parse(email).unwrap(),
            name: Some("Ada".to_string()),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_with_no_role() {
        let store = MemoryStore::new();

        let outcome = register(&store, new_user("ada@swiftbite.io")).await.unwrap();

        let user = match outcome {
            RegistrationOutcome::Created(user) => user,
            other => panic!("expected Created, got {other:?}"),
        };
        assert_eq!(user.role, Role::None);
        assert_eq!(user.name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_register_twice_inserts_once() {
        let store = MemoryStore::new();

        let first = register(&store, new_user("ada@swiftbite.io")).await.unwrap();
        let second = register(&store, new_user("ada@swiftbite.io")).await.unwrap();

        assert!(matches!(first, RegistrationOutcome::Created(_)));
        assert_eq!(second, RegistrationOutcome::AlreadyExists);
        assert_eq!(UserStore::count(&store).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_create_one_identity() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    register(store.as_ref(), new_user("ada@swiftbite.io"))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), RegistrationOutcome::Created(_)) {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(UserStore::count(store.as_ref()).await.unwrap(), 1);
    }
}
