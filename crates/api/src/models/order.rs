//! Pending order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use swiftbite_core::{Email, OrderId};

/// A pending order, alive until settled or cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub buyer_email: Email,
    #[serde(rename = "itemsName")]
    pub items_name: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Checkout-initiation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub buyer_email: Email,
    #[serde(rename = "itemsName", default)]
    pub items_name: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}
