//! Identity management commands.
//!
//! Promotion is the only way to mint the first admin; after that, admins can
//! elevate others through `PATCH /user/admin/{id}`.

use swiftbite_api::db::postgres::PgUserRepository;
use swiftbite_api::db::{RepositoryError, UserStore};
use swiftbite_core::{Email, EmailError, Role};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during identity operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Nobody has registered with this email yet.
    #[error("No identity registered with email: {0}")]
    NotRegistered(String),
}

/// Print every registered identity.
pub async fn list() -> Result<(), UserError> {
    let users = PgUserRepository::new(connect().await?);

    let all = users.list().await?;

    #[allow(clippy::print_stdout)]
    {
        for user in &all {
            println!("{}\t{}\t{}", user.id, user.email, user.role);
        }
    }
    Ok(())
}

/// Grant the admin role to a registered identity.
pub async fn promote(email: &str) -> Result<(), UserError> {
    let email = Email::parse(email)?;
    let users = PgUserRepository::new(connect().await?);

    let user = users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| UserError::NotRegistered(email.to_string()))?;

    let result = users.set_role(user.id, Role::Admin).await?;
    if result.modified_count == 0 {
        tracing::info!("{} is already an admin", email);
    } else {
        tracing::info!("{} promoted to admin", email);
    }
    Ok(())
}
