//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors produced by the auth chain.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credential missing, malformed, wrongly signed, or expired.
    #[error("unauthorized access")]
    Unauthorized,

    /// Valid credential, but insufficient role or wrong identity scope.
    #[error("forbidden access")]
    Forbidden,

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error during the role lookup.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
