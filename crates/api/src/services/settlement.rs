//! Settlement Coordinator: converts pending orders into one payment.
//!
//! The only multi-document write in the system. Two steps, in order:
//!
//! 1. insert the payment document (which lists the order IDs it settles)
//! 2. bulk-delete those orders by ID set, limited to the payer's own orders
//!
//! When the backend provides a [`SettlementStore`] both steps run in one
//! transaction and a failure leaves nothing behind. Otherwise the stores are
//! independent and there is no rollback: if step 2 fails the payment stays
//! and the orders linger. That partial outcome is returned as
//! [`SettlementError::OrdersNotRemoved`] carrying the inserted payment ID and
//! is logged at ERROR for reconciliation.
//!
//! Settlement is not idempotent. Replaying a draft inserts a second payment
//! and removes nothing. Overlapping concurrent settlements are not
//! coordinated either: each reports the shared orders as removed, though
//! only one delete actually removes them.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use swiftbite_core::{OrderId, PaymentId};

use crate::db::{OrderStore, PaymentStore, RepositoryError, SettlementStore, Stores};
use crate::models::{Payment, PaymentDraft};

/// Errors from a settlement attempt.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The draft was rejected before any write.
    #[error("invalid payment draft: {0}")]
    InvalidDraft(String),

    /// Step 1 failed, or the transaction rolled back; nothing was written.
    #[error("payment insert failed: {0}")]
    PaymentInsert(#[source] RepositoryError),

    /// Step 1 succeeded, step 2 failed. The payment exists, the orders remain.
    #[error("payment {payment_id} recorded but orders were not removed: {source}")]
    OrdersNotRemoved {
        payment_id: PaymentId,
        order_ids: Vec<OrderId>,
        #[source]
        source: RepositoryError,
    },
}

/// Both outcomes of a completed settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOutcome {
    /// The payment document written in step 1.
    pub inserted_payment_id: PaymentId,
    /// The order IDs targeted by the bulk delete.
    pub removed_order_ids: Vec<OrderId>,
    /// How many orders the bulk delete actually removed.
    pub deleted_count: u64,
}

/// Runs settlements against the payment and order stores.
#[derive(Clone)]
pub struct SettlementCoordinator {
    payments: Arc<dyn PaymentStore>,
    orders: Arc<dyn OrderStore>,
    atomic: Option<Arc<dyn SettlementStore>>,
}

impl SettlementCoordinator {
    /// Create a coordinator that settles in two independent steps.
    #[must_use]
    pub fn new(payments: Arc<dyn PaymentStore>, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            payments,
            orders,
            atomic: None,
        }
    }

    /// Create a coordinator over `stores`, settling atomically when the
    /// backend supports it.
    #[must_use]
    pub fn from_stores(stores: &Stores) -> Self {
        let coordinator = Self::new(stores.payments.clone(), stores.orders.clone());
        match &stores.settlements {
            Some(atomic) => coordinator.with_atomic_store(atomic.clone()),
            None => coordinator,
        }
    }

    /// Route every settlement through `store` in a single write.
    #[must_use]
    pub fn with_atomic_store(mut self, store: Arc<dyn SettlementStore>) -> Self {
        self.atomic = Some(store);
        self
    }

    /// Settle a payment draft.
    ///
    /// Duplicate order IDs in the draft are collapsed; the stored payment
    /// keeps the draft's list as given.
    ///
    /// # Errors
    ///
    /// - `SettlementError::InvalidDraft` if the price is negative
    /// - `SettlementError::PaymentInsert` if step 1 fails or the atomic write
    ///   rolls back
    /// - `SettlementError::OrdersNotRemoved` if step 2 fails after step 1
    #[instrument(
        skip(self, draft),
        fields(email = %draft.email, order_count = draft.order_items.len())
    )]
    pub async fn settle(&self, draft: PaymentDraft) -> Result<SettlementOutcome, SettlementError> {
        if draft.price.is_sign_negative() {
            return Err(SettlementError::InvalidDraft(
                "price must not be negative".to_string(),
            ));
        }

        let mut order_ids = Vec::with_capacity(draft.order_items.len());
        for id in &draft.order_items {
            if !order_ids.contains(id) {
                order_ids.push(*id);
            }
        }

        let (payment, deleted_count) = match &self.atomic {
            Some(store) => store
                .settle(draft, &order_ids)
                .await
                .map_err(SettlementError::PaymentInsert)?,
            None => self.settle_in_steps(draft, &order_ids).await?,
        };

        if deleted_count < u64::try_from(order_ids.len()).unwrap_or(u64::MAX) {
            tracing::warn!(
                payment_id = %payment.id,
                targeted = order_ids.len(),
                deleted_count,
                "settlement removed fewer orders than referenced"
            );
        }

        tracing::info!(payment_id = %payment.id, deleted_count, "settlement complete");

        Ok(SettlementOutcome {
            inserted_payment_id: payment.id,
            removed_order_ids: order_ids,
            deleted_count,
        })
    }

    async fn settle_in_steps(
        &self,
        draft: PaymentDraft,
        order_ids: &[OrderId],
    ) -> Result<(Payment, u64), SettlementError> {
        let buyer = draft.email.clone();
        let payment = self
            .payments
            .insert(draft)
            .await
            .map_err(SettlementError::PaymentInsert)?;

        match self.orders.delete_many(order_ids, &buyer).await {
            Ok(deleted_count) => Ok((payment, deleted_count)),
            Err(source) => {
                tracing::error!(
                    payment_id = %payment.id,
                    order_ids = ?order_ids,
                    error = %source,
                    "settlement incomplete: payment recorded, orders not removed"
                );
                Err(SettlementError::OrdersNotRemoved {
                    payment_id: payment.id,
                    order_ids: order_ids.to_vec(),
                    source,
                })
            }
        }
    }
}
