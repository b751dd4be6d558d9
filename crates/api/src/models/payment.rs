//! Settled payment domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use swiftbite_core::{Email, OrderId, PaymentId};

/// A settled payment.
///
/// Item names are copied in at settlement time so the history survives
/// later menu edits and deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: PaymentId,
    pub email: Email,
    #[serde(rename = "itemsName")]
    pub items_name: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// The orders this payment settled. They no longer exist.
    #[serde(rename = "orderItems")]
    pub order_items: Vec<OrderId>,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// Settlement request payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentDraft {
    pub email: Email,
    #[serde(rename = "itemsName", default)]
    pub items_name: Vec<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "orderItems", default)]
    pub order_items: Vec<OrderId>,
    #[serde(rename = "transactionId", default)]
    pub transaction_id: Option<String>,
}
