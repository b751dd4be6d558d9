//! Integration tests for swiftBite.
//!
//! The full router (auth chain, handlers, error mapping, request-id and
//! trace layers) is driven in-process with `tower::ServiceExt::oneshot`
//! against the in-memory store and a recording charge provider. No database
//! or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p swiftbite-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use parking_lot::Mutex;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use swiftbite_api::db::{MemoryStore, Stores};
use swiftbite_api::models::NewUser;
use swiftbite_api::routes;
use swiftbite_api::services::{Claims, TokenService};
use swiftbite_api::state::AppState;
use swiftbite_api::stripe::{PaymentIntentProvider, StripeError};
use swiftbite_core::{Email, Role};

/// Signing secret shared by the app under test and the token helpers.
pub const TEST_SECRET: &str = "integration-test-signing-secret-4f9a1c7e2b8d";

/// Charge provider that records every request instead of calling out.
#[derive(Debug, Default)]
pub struct RecordingCharges {
    calls: Mutex<Vec<(i64, String)>>,
}

impl RecordingCharges {
    /// `(amount_minor, currency)` of every intent requested so far.
    pub fn calls(&self) -> Vec<(i64, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PaymentIntentProvider for RecordingCharges {
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<String, StripeError> {
        self.calls.lock().push((amount_minor, currency.to_string()));
        Ok(format!("pi_test_{amount_minor}_secret"))
    }
}

/// A response with its body parsed as JSON (`Value::Null` if empty or not JSON).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// The application wired to in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
    pub tokens: TokenService,
    pub charges: Arc<RecordingCharges>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let stores = Stores::in_memory(&store);
        let charges = Arc::new(RecordingCharges::default());
        let secret = SecretString::from(TEST_SECRET.to_string());

        let state = AppState::from_parts(
            TokenService::new(&secret),
            stores.clone(),
            charges.clone(),
        );

        Self {
            router: routes::app(state),
            stores,
            tokens: TokenService::new(&secret),
            charges,
        }
    }

    /// A valid bearer token for `email`.
    pub fn token_for(&self, email: &str) -> String {
        self.tokens
            .issue(Claims::new(Email::parse(email).unwrap()))
            .unwrap()
    }

    /// Register `email` directly in the identity store.
    pub async fn register(&self, email: &str) -> swiftbite_api::models::User {
        self.stores
            .users
            .insert(NewUser {
                email: Email::parse(email).unwrap(),
                name: None,
                photo_url: None,
            })
            .await
            .unwrap()
    }

    /// Register `email` and grant it the admin role. Returns its token.
    pub async fn admin(&self, email: &str) -> String {
        let user = self.register(email).await;
        self.stores.users.set_role(user.id, Role::Admin).await.unwrap();
        self.token_for(email)
    }

    /// Send a request through the router.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
