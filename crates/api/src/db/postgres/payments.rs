//! Settled payment repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use swiftbite_core::{Email, OrderId, PaymentId};

use super::stored_email;
use crate::db::{PaymentStore, RepositoryError};
use crate::models::{Payment, PaymentDraft};

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    email: String,
    items_name: Vec<String>,
    price: Decimal,
    order_items: Vec<Uuid>,
    transaction_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepositoryError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::from_uuid(row.id),
            email: stored_email(&row.email)?,
            items_name: row.items_name,
            price: row.price,
            order_items: row.order_items.into_iter().map(OrderId::from_uuid).collect(),
            transaction_id: row.transaction_id,
            created_at: row.created_at,
        })
    }
}

/// Insert one payment document.
pub(super) async fn insert_payment<'e, E>(
    executor: E,
    draft: PaymentDraft,
) -> Result<Payment, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let order_items: Vec<Uuid> = draft.order_items.iter().map(OrderId::as_uuid).collect();

    let row = sqlx::query_as::<_, PaymentRow>(
        r"
        INSERT INTO payments (id, email, items_name, price, order_items, transaction_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, email, items_name, price, order_items, transaction_id, created_at
        ",
    )
    .bind(Uuid::new_v4())
    .bind(draft.email.as_str())
    .bind(draft.items_name)
    .bind(draft.price)
    .bind(order_items)
    .bind(draft.transaction_id)
    .fetch_one(executor)
    .await?;

    row.try_into()
}

/// Repository for the `payments` table.
#[derive(Clone)]
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PgPaymentRepository {
    async fn insert(&self, draft: PaymentDraft) -> Result<Payment, RepositoryError> {
        insert_payment(&self.pool, draft).await
    }

    async fn list_by_email(&self, email: &Email) -> Result<Vec<Payment>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r"
            SELECT id, email, items_name, price, order_items, transaction_id, created_at
            FROM payments
            WHERE email = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(email.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_all(&self) -> Result<Vec<Payment>, RepositoryError> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r"
            SELECT id, email, items_name, price, order_items, transaction_id, created_at
            FROM payments
            ORDER BY created_at ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
