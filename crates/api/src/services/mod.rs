//! Business logic services for the swiftBite API.
//!
//! # Services
//!
//! - `auth` - Credential Verifier, Role Gate, and the guard chain composing them
//! - `registration` - Idempotent self-registration
//! - `settlement` - Order to payment settlement
//! - `statistics` - Read-only reducers over settled payments

pub mod auth;
pub mod registration;
pub mod settlement;
pub mod statistics;

pub use auth::{
    AuthError, Claims, Guard, GuardChain, Passage, RoleGate, TokenService, VerifiedIdentity,
};
pub use registration::{RegistrationOutcome, register};
pub use settlement::{SettlementCoordinator, SettlementError, SettlementOutcome};
