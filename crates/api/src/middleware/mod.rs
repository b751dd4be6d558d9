//! HTTP middleware and extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS
//!
//! Authorization is not a layer: handlers declare it through the
//! [`Authenticated`] and [`AdminOnly`] extractors, which run the guard chain
//! before the handler body.

pub mod auth;
pub mod request_id;

pub use auth::{AdminOnly, Authenticated};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
