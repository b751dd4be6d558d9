//! Domain models for the swiftBite API.
//!
//! These are validated domain objects, separate from database row types.
//! Serde attributes pin the JSON wire format: document IDs serialize as
//! `_id`, prices as JSON numbers, and the camelCase field names the web
//! client already speaks (`itemsName`, `orderItems`).

pub mod menu;
pub mod order;
pub mod payment;
pub mod results;
pub mod user;

pub use menu::{MenuItem, MenuItemFields};
pub use order::{NewOrder, Order};
pub use payment::{Payment, PaymentDraft};
pub use results::{DeleteResult, InsertResult, UpdateResult};
pub use user::{NewUser, User};
