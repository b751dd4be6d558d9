//! Catalog repository.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use swiftbite_core::MenuItemId;

use super::count_from;
use crate::db::{MenuStore, RepositoryError};
use crate::models::{MenuItem, MenuItemFields, UpdateResult};

#[derive(Debug, sqlx::FromRow)]
struct MenuItemRow {
    id: Uuid,
    name: String,
    image: String,
    price: Decimal,
    category: String,
    short_description: String,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        Self {
            id: MenuItemId::from_uuid(row.id),
            fields: MenuItemFields {
                name: row.name,
                image: row.image,
                price: row.price,
                category: row.category,
                short_description: row.short_description,
            },
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UpdateCountsRow {
    matched: i64,
    modified: i64,
}

/// Repository for the `menu_items` table.
#[derive(Clone)]
pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuStore for PgMenuRepository {
    async fn list(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, image, price, category, short_description
            FROM menu_items
            ORDER BY category, name
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, image, price, category, short_description
            FROM menu_items
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<MenuItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r"
            SELECT id, name, image, price, category, short_description
            FROM menu_items
            WHERE name = ANY($1)
            ",
        )
        .bind(names)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, fields: MenuItemFields) -> Result<MenuItem, RepositoryError> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r"
            INSERT INTO menu_items (id, name, image, price, category, short_description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, image, price, category, short_description
            ",
        )
        .bind(Uuid::new_v4())
        .bind(fields.name)
        .bind(fields.image)
        .bind(fields.price)
        .bind(fields.category)
        .bind(fields.short_description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: MenuItemId,
        fields: MenuItemFields,
    ) -> Result<UpdateResult, RepositoryError> {
        let counts = sqlx::query_as::<_, UpdateCountsRow>(
            r"
            WITH target AS (
                SELECT id, name, image, price, category, short_description
                FROM menu_items WHERE id = $1 FOR UPDATE
            ), changed AS (
                UPDATE menu_items m
                SET name = $2, image = $3, price = $4, category = $5, short_description = $6
                FROM target t
                WHERE m.id = t.id
                  AND (t.name, t.image, t.price, t.category, t.short_description)
                      IS DISTINCT FROM ($2, $3, $4, $5, $6)
                RETURNING m.id
            )
            SELECT (SELECT COUNT(*) FROM target) AS matched,
                   (SELECT COUNT(*) FROM changed) AS modified
            ",
        )
        .bind(id.as_uuid())
        .bind(fields.name)
        .bind(fields.image)
        .bind(fields.price)
        .bind(fields.category)
        .bind(fields.short_description)
        .fetch_one(&self.pool)
        .await?;

        Ok(UpdateResult {
            matched_count: count_from(counts.matched)?,
            modified_count: count_from(counts.modified)?,
        })
    }

    async fn delete(&self, id: MenuItemId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(&self.pool)
            .await?;

        count_from(count)
    }
}
