//! Stripe REST client.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use super::error::StripeError;
use super::types::{PaymentIntent, StripeErrorResponse};
use super::PaymentIntentProvider;

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    /// HTTP client.
    client: Client,
    /// API base URL, without trailing slash.
    api_base: String,
    /// Secret key for bearer authentication.
    secret_key: SecretString,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StripeClient {
    /// Create a new Stripe client.
    #[must_use]
    pub fn new(api_base: &str, secret_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key,
        }
    }

    /// The API base URL in use.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl PaymentIntentProvider for StripeClient {
    #[instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<String, StripeError> {
        let amount = amount_minor.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&form)
            .send()
            .await
            .map_err(|e| StripeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Option<StripeErrorResponse> = response.json().await.ok();
            let message = body
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            error!(status = status.as_u16(), %message, "Stripe API error creating payment intent");
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| StripeError::Response(e.to_string()))?;

        debug!(intent_id = %intent.id, "Payment intent created");

        intent
            .client_secret
            .ok_or_else(|| StripeError::Response("missing client_secret".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const KEY: &str = "sk_test_4eC39HqLyjWDarjtT1zdp7dc";

    fn client_for(server: &MockServer) -> StripeClient {
        StripeClient::new(&server.base_url(), SecretString::from(KEY.to_string()))
    }

    #[test]
    fn test_debug_redacts_secret_key() {
        let client = StripeClient::new(
            "https://api.stripe.com/",
            SecretString::from("sk_test_very_secret_value".to_string()),
        );

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("sk_test_very_secret_value"));
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let client = StripeClient::new(
            "https://api.stripe.com/",
            SecretString::from("sk_test".to_string()),
        );
        assert_eq!(client.api_base(), "https://api.stripe.com");
    }

    #[tokio::test]
    async fn test_create_payment_intent_returns_client_secret() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/payment_intents")
                    .header("authorization", format!("Bearer {KEY}"))
                    .form_urlencoded_tuple("amount", "1299")
                    .form_urlencoded_tuple("currency", "usd")
                    .form_urlencoded_tuple("payment_method_types[]", "card");
                then.status(200).json_body(json!({
                    "id": "pi_3Mtw",
                    "amount": 1299,
                    "currency": "usd",
                    "client_secret": "pi_3Mtw_secret_abc",
                }));
            })
            .await;

        let secret = client_for(&server)
            .create_payment_intent(1299, "usd")
            .await
            .unwrap();

        assert_eq!(secret, "pi_3Mtw_secret_abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_payment_intent_surfaces_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/payment_intents");
                then.status(402).json_body(json!({
                    "error": {
                        "type": "card_error",
                        "message": "Your card was declined.",
                    }
                }));
            })
            .await;

        let err = client_for(&server)
            .create_payment_intent(1299, "usd")
            .await
            .unwrap_err();

        match err {
            StripeError::Api { status, message } => {
                assert_eq!(status, 402);
                assert_eq!(message, "Your card was declined.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_payment_intent_api_error_without_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/payment_intents");
                then.status(500).body("upstream unavailable");
            })
            .await;

        let err = client_for(&server)
            .create_payment_intent(500, "usd")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StripeError::Api { status: 500, ref message } if message == "Unknown error"
        ));
    }

    #[tokio::test]
    async fn test_create_payment_intent_requires_client_secret() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/payment_intents");
                then.status(200).json_body(json!({
                    "id": "pi_3Mtw",
                    "amount": 1299,
                    "currency": "usd",
                    "client_secret": null,
                }));
            })
            .await;

        let err = client_for(&server)
            .create_payment_intent(1299, "usd")
            .await
            .unwrap_err();

        assert!(matches!(err, StripeError::Response(_)));
    }
}
