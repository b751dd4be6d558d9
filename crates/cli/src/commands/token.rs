//! Bearer-token commands.
//!
//! # Environment Variables
//!
//! - `ACCESS_TOKEN_SECRET` - The same signing secret the API runs with

use swiftbite_api::config::{ConfigError, access_token_secret_from_env};
use swiftbite_api::services::{AuthError, Claims, TokenService};
use swiftbite_core::{Email, EmailError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Signing failed: {0}")]
    Auth(#[from] AuthError),
}

/// Sign a one-hour token for `email` and print it.
pub fn issue(email: &str) -> Result<(), TokenError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    let tokens = TokenService::new(&access_token_secret_from_env()?);
    let token = tokens.issue(Claims::new(email))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}
