//! `PostgreSQL` repositories.
//!
//! Queries are runtime-checked (`query_as::<_, Row>`) against internal
//! `FromRow` row types, converted into domain types via `TryFrom` so that
//! invalid stored data surfaces as `RepositoryError::DataCorruption`.

mod menu;
mod orders;
mod payments;
mod settlement;
mod users;

pub use menu::PgMenuRepository;
pub use orders::PgOrderRepository;
pub use payments::PgPaymentRepository;
pub use settlement::PgSettlementRepository;
pub use users::PgUserRepository;

use swiftbite_core::Email;

use super::RepositoryError;

/// Parse an email read back from the database.
fn stored_email(raw: &str) -> Result<Email, RepositoryError> {
    Email::parse(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid email in database: {e}")))
}

/// Convert a `COUNT(*)` / rows-affected value.
fn count_from(raw: i64) -> Result<u64, RepositoryError> {
    u64::try_from(raw).map_err(|_| RepositoryError::DataCorruption(format!("negative count {raw}")))
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
