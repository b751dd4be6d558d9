//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::Stores;
use crate::services::{RoleGate, SettlementCoordinator, TokenService};
use crate::stripe::{PaymentIntentProvider, StripeClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the stores, the auth services, and the charge provider.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    stores: Stores,
    tokens: TokenService,
    gate: RoleGate,
    settlement: SettlementCoordinator,
    charges: Arc<dyn PaymentIntentProvider>,
}

impl AppState {
    /// Create application state for production use.
    ///
    /// The charge provider is a [`StripeClient`] built from configuration.
    #[must_use]
    pub fn new(config: &AppConfig, stores: Stores) -> Self {
        let charges = Arc::new(StripeClient::new(
            &config.stripe_api_base,
            config.payment_secret_key.clone(),
        ));
        Self::with_provider(config, stores, charges)
    }

    /// Create application state with an explicit charge provider.
    #[must_use]
    pub fn with_provider(
        config: &AppConfig,
        stores: Stores,
        charges: Arc<dyn PaymentIntentProvider>,
    ) -> Self {
        Self::from_parts(
            TokenService::new(&config.access_token_secret),
            stores,
            charges,
        )
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(
        tokens: TokenService,
        stores: Stores,
        charges: Arc<dyn PaymentIntentProvider>,
    ) -> Self {
        let gate = RoleGate::new(stores.users.clone());
        let settlement = SettlementCoordinator::from_stores(&stores);

        Self {
            inner: Arc::new(AppStateInner {
                stores,
                tokens,
                gate,
                settlement,
                charges,
            }),
        }
    }

    /// Get a reference to the stores.
    #[must_use]
    pub fn stores(&self) -> &Stores {
        &self.inner.stores
    }

    /// Get a reference to the Credential Verifier.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the Role Gate.
    #[must_use]
    pub fn gate(&self) -> &RoleGate {
        &self.inner.gate
    }

    /// Get a reference to the Settlement Coordinator.
    #[must_use]
    pub fn settlement(&self) -> &SettlementCoordinator {
        &self.inner.settlement
    }

    /// Get a reference to the charge provider.
    #[must_use]
    pub fn charges(&self) -> &dyn PaymentIntentProvider {
        self.inner.charges.as_ref()
    }
}
