//! Pending order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use swiftbite_core::{Email, OrderId};

use super::{count_from, stored_email};
use crate::db::{OrderStore, RepositoryError};
use crate::models::{NewOrder, Order};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    buyer_email: String,
    items_name: Vec<String>,
    price: Decimal,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::from_uuid(row.id),
            buyer_email: stored_email(&row.buyer_email)?,
            items_name: row.items_name,
            price: row.price,
            image: row.image,
            created_at: row.created_at,
        })
    }
}

/// Delete those of `ids` that belong to `buyer`.
pub(super) async fn delete_owned_many<'e, E>(
    executor: E,
    ids: &[OrderId],
    buyer: &Email,
) -> Result<u64, RepositoryError>
where
    E: PgExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(0);
    }

    let ids: Vec<Uuid> = ids.iter().map(OrderId::as_uuid).collect();
    let result = sqlx::query("DELETE FROM orders WHERE id = ANY($1) AND buyer_email = $2")
        .bind(ids)
        .bind(buyer.as_str())
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Repository for the `orders` table.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderRepository {
    async fn list_by_buyer(&self, buyer: &Email) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, buyer_email, items_name, price, image, created_at
            FROM orders
            WHERE buyer_email = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(buyer.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (id, buyer_email, items_name, price, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, buyer_email, items_name, price, image, created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(order.buyer_email.as_str())
        .bind(order.items_name)
        .bind(order.price)
        .bind(order.image)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn delete_owned(&self, id: OrderId, buyer: &Email) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND buyer_email = $2")
            .bind(id.as_uuid())
            .bind(buyer.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_many(&self, ids: &[OrderId], buyer: &Email) -> Result<u64, RepositoryError> {
        delete_owned_many(&self.pool, ids, buyer).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        count_from(count)
    }
}
