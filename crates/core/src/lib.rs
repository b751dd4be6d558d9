//! swiftBite Core - Shared types library.
//!
//! This crate provides common types used across all swiftBite components:
//! - `api` - The HTTP backend (auth chain, catalog, orders, settlement)
//! - `cli` - Command-line tools for migrations and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, roles and money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
