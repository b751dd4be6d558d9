//! Authentication and authorization.
//!
//! Three pieces, composed in a fixed order:
//!
//! - [`TokenService`] - the Credential Verifier. Pure, no I/O.
//! - [`RoleGate`] - looks up a verified identity's stored role.
//! - [`GuardChain`] - an ordered list of [`Guard`] steps evaluated before a
//!   handler runs. The gate is only reachable through a chain whose earlier
//!   step produced a [`VerifiedIdentity`].

mod error;
mod gate;
mod guard;
mod token;

pub use error::AuthError;
pub use gate::RoleGate;
pub use guard::{Guard, GuardChain, Passage};
pub use token::{Claims, TOKEN_TTL_SECS, TokenService, VerifiedIdentity, bearer_token};
