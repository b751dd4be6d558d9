//! Transactional settlement write.

use async_trait::async_trait;
use sqlx::PgPool;

use swiftbite_core::OrderId;

use super::orders::delete_owned_many;
use super::payments::insert_payment;
use crate::db::{RepositoryError, SettlementStore};
use crate::models::{Payment, PaymentDraft};

/// Inserts the payment and removes the settled orders in one transaction.
#[derive(Clone)]
pub struct PgSettlementRepository {
    pool: PgPool,
}

impl PgSettlementRepository {
    /// Create a new settlement repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettlementStore for PgSettlementRepository {
    async fn settle(
        &self,
        draft: PaymentDraft,
        order_ids: &[OrderId],
    ) -> Result<(Payment, u64), RepositoryError> {
        let buyer = draft.email.clone();
        let mut tx = self.pool.begin().await?;

        let payment = insert_payment(&mut *tx, draft).await?;
        let deleted = delete_owned_many(&mut *tx, order_ids, &buyer).await?;

        tx.commit().await?;

        Ok((payment, deleted))
    }
}
