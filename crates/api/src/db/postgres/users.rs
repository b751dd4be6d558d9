//! Identity repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use swiftbite_core::{Email, Role, UserId};

use super::{conflict_on_unique, count_from, stored_email};
use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, UpdateResult, User};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: Option<String>,
    photo_url: Option<String>,
    role: Role,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: stored_email(&row.email)?,
            name: row.name,
            photo_url: row.photo_url,
            role: row.role,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UpdateCountsRow {
    matched: i64,
    modified: i64,
}

/// Repository for the `users` table.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, name, photo_url, role, created_at
            FROM users
            ORDER BY created_at ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, name, photo_url, role, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (id, email, name, photo_url, role)
            VALUES ($1, $2, $3, $4, 'none')
            RETURNING id, email, name, photo_url, role, created_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(user.email.as_str())
        .bind(user.name)
        .bind(user.photo_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        row.try_into()
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<UpdateResult, RepositoryError> {
        let counts = sqlx::query_as::<_, UpdateCountsRow>(
            r"
            WITH target AS (
                SELECT id, role FROM users WHERE id = $1 FOR UPDATE
            ), changed AS (
                UPDATE users u SET role = $2
                FROM target t
                WHERE u.id = t.id AND t.role IS DISTINCT FROM $2
                RETURNING u.id
            )
            SELECT (SELECT COUNT(*) FROM target) AS matched,
                   (SELECT COUNT(*) FROM changed) AS modified
            ",
        )
        .bind(id.as_uuid())
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(UpdateResult {
            matched_count: count_from(counts.matched)?,
            modified_count: count_from(counts.modified)?,
        })
    }

    async fn delete(&self, id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        count_from(count)
    }
}
