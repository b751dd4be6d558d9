//! Charge-provider errors.

use thiserror::Error;

/// Errors that can occur when talking to the charge provider.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("Stripe request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Stripe response error: {0}")]
    Response(String),

    /// Stripe returned an error object.
    #[error("Stripe API error ({status}): {message}")]
    Api { status: u16, message: String },
}
