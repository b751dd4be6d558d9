//! Persistence for the swiftBite API.
//!
//! # Collections
//!
//! - `users` - Identities and their role (unique on `email`)
//! - `menu_items` - The catalog
//! - `orders` - Pending orders (deleted on settlement or cancellation)
//! - `payments` - Settled payments
//!
//! Each collection sits behind an `async_trait` store trait so the HTTP layer
//! and the services never see the backend. Two backends exist:
//!
//! - [`postgres`] - `sqlx` repositories over a `PgPool`
//! - [`memory`] - an in-process store, used by tests and `SWIFTBITE_STORE=memory`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p swiftbite-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use swiftbite_core::{Email, MenuItemId, OrderId, Role, UserId};

use crate::models::{
    MenuItem, MenuItemFields, NewOrder, NewUser, Order, Payment, PaymentDraft, UpdateResult, User,
};

pub use memory::MemoryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Identity store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All identities, oldest first.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Look up an identity by its email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Insert a new identity with role `none`.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Set an identity's role.
    async fn set_role(&self, id: UserId, role: Role) -> Result<UpdateResult, RepositoryError>;

    /// Remove an identity. Returns the number of documents deleted.
    async fn delete(&self, id: UserId) -> Result<u64, RepositoryError>;

    /// Number of identities.
    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// Catalog store.
#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn list(&self) -> Result<Vec<MenuItem>, RepositoryError>;

    async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError>;

    /// Items whose name is one of `names`.
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<MenuItem>, RepositoryError>;

    async fn insert(&self, fields: MenuItemFields) -> Result<MenuItem, RepositoryError>;

    /// Replace every mutable field of an item.
    async fn update(
        &self,
        id: MenuItemId,
        fields: MenuItemFields,
    ) -> Result<UpdateResult, RepositoryError>;

    async fn delete(&self, id: MenuItemId) -> Result<u64, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// Pending order store.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn list_by_buyer(&self, buyer: &Email) -> Result<Vec<Order>, RepositoryError>;

    async fn insert(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    /// Delete one order, but only if it belongs to `buyer`.
    async fn delete_owned(&self, id: OrderId, buyer: &Email) -> Result<u64, RepositoryError>;

    /// Bulk delete by ID set, restricted to orders owned by `buyer`.
    /// IDs that do not exist or belong to someone else are ignored.
    ///
    /// Returns the number of orders actually removed.
    async fn delete_many(&self, ids: &[OrderId], buyer: &Email) -> Result<u64, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// Settled payment store.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Persist a payment document. Never deduplicates.
    async fn insert(&self, draft: PaymentDraft) -> Result<Payment, RepositoryError>;

    async fn list_by_email(&self, email: &Email) -> Result<Vec<Payment>, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<Payment>, RepositoryError>;
}

/// Settlement as a single atomic write.
///
/// Backends that can span payments and orders in one transaction implement
/// this; the others settle in two steps through [`PaymentStore`] and
/// [`OrderStore`].
#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Insert `draft` and delete those of `order_ids` owned by `draft.email`.
    /// Either both writes land or neither does.
    ///
    /// Returns the stored payment and the number of orders removed.
    async fn settle(
        &self,
        draft: PaymentDraft,
        order_ids: &[OrderId],
    ) -> Result<(Payment, u64), RepositoryError>;
}

/// The four collections, bundled for application state.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub menu: Arc<dyn MenuStore>,
    pub orders: Arc<dyn OrderStore>,
    pub payments: Arc<dyn PaymentStore>,
    /// Present when the backend can settle atomically.
    pub settlements: Option<Arc<dyn SettlementStore>>,
    /// Present when backed by Postgres; used for readiness checks.
    pub pool: Option<PgPool>,
}

impl Stores {
    /// All collections backed by one Postgres pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepository::new(pool.clone())),
            menu: Arc::new(postgres::PgMenuRepository::new(pool.clone())),
            orders: Arc::new(postgres::PgOrderRepository::new(pool.clone())),
            payments: Arc::new(postgres::PgPaymentRepository::new(pool.clone())),
            settlements: Some(Arc::new(postgres::PgSettlementRepository::new(
                pool.clone(),
            ))),
            pool: Some(pool),
        }
    }

    /// All collections backed by one shared in-memory store.
    #[must_use]
    pub fn in_memory(store: &Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            menu: store.clone(),
            orders: store.clone(),
            payments: store.clone(),
            settlements: None,
            pool: None,
        }
    }

    /// Check that the backing store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database ping fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").fetch_one(pool).await?;
        }
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
