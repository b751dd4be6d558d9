//! swiftBite API library.
//!
//! The food-ordering backend as a library, so the router can be driven
//! in-process by the integration tests and reused by the CLI.
//!
//! # Security
//!
//! - Bearer tokens are HS256, valid for one hour, signed with `ACCESS_TOKEN_SECRET`
//! - Admin routes re-read the caller's role from the identity store on every request
//! - Per-diner routes only ever act on the token's own email

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stripe;
