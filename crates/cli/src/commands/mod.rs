//! CLI command implementations.

pub mod migrate;
pub mod token;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use swiftbite_api::config::{ConfigError, database_url_from_env};

/// Connect to the database named by `SWIFTBITE_DATABASE_URL`.
async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();
    let database_url: SecretString = database_url_from_env()?;

    tracing::info!("Connecting to database...");
    Ok(swiftbite_api::db::create_pool(&database_url).await?)
}

/// Errors from establishing a database connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
