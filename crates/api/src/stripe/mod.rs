//! Charge-authorization provider integration.
//!
//! The API only ever asks the provider for one thing: a payment intent for a
//! given amount, returning the client secret the web client uses to confirm
//! the charge. That seam is the [`PaymentIntentProvider`] trait;
//! [`StripeClient`] is the production implementation.

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::StripeClient;
pub use error::StripeError;
pub use types::{PaymentIntent, StripeErrorBody, StripeErrorResponse};

/// Currency every intent is created in.
pub const CURRENCY: &str = "usd";

/// Creates payment intents with an external charge provider.
#[async_trait]
pub trait PaymentIntentProvider: Send + Sync {
    /// Create an intent for `amount_minor` minor units of `currency` and
    /// return its client secret.
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<String, StripeError>;
}
