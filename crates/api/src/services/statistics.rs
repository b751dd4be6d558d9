//! Read-only reducers over settled payments.
//!
//! Pure functions; callers fetch the inputs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use swiftbite_core::{Email, OrderId, PaymentId, total};

use crate::models::{MenuItem, Payment};

/// Per-diner summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    /// Sum of the diner's payment prices, two decimals.
    pub total_revenue: String,
    /// Item names across all of the diner's payments.
    pub total_item_count: usize,
    /// Size of the catalog.
    pub menu_items_count: u64,
}

/// Platform-wide summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatistics {
    pub user: u64,
    pub menu_items: u64,
    pub orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// One row of booking history: a payment unwound to a single item name,
/// joined with the catalog entry of that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingEntry {
    #[serde(rename = "_id")]
    pub payment_id: PaymentId,
    pub email: Email,
    #[serde(rename = "itemsName")]
    pub item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(rename = "orderItems")]
    pub order_items: Vec<OrderId>,
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(rename = "detailedMenuItems")]
    pub menu_item: MenuItem,
}

/// Reduce one diner's payments.
#[must_use]
pub fn user_statistics(payments: &[Payment], menu_items_count: u64) -> UserStatistics {
    let revenue = total(payments.iter().map(|p| p.price));
    UserStatistics {
        total_revenue: format_two_places(revenue),
        total_item_count: payments.iter().map(|p| p.items_name.len()).sum(),
        menu_items_count,
    }
}

/// Reduce store counts and all payments.
#[must_use]
pub fn admin_statistics(
    users: u64,
    menu_items: u64,
    orders: u64,
    payments: &[Payment],
) -> AdminStatistics {
    AdminStatistics {
        user: users,
        menu_items,
        orders,
        revenue: total(payments.iter().map(|p| p.price)),
    }
}

/// Join payments with the catalog by item name.
///
/// Emits one entry per (payment, item name, matching menu item). Names with
/// no catalog match are dropped, as are payments with no names.
#[must_use]
pub fn booking_history(payments: &[Payment], menu: &[MenuItem]) -> Vec<BookingEntry> {
    let mut entries = Vec::new();
    for payment in payments {
        for name in &payment.items_name {
            for item in menu.iter().filter(|m| &m.fields.name == name) {
                entries.push(BookingEntry {
                    payment_id: payment.id,
                    email: payment.email.clone(),
                    item_name: name.clone(),
                    price: payment.price,
                    order_items: payment.order_items.clone(),
                    transaction_id: payment.transaction_id.clone(),
                    date: payment.created_at,
                    menu_item: item.clone(),
                });
            }
        }
    }
    entries
}

/// Item names referenced by a set of payments, deduplicated.
#[must_use]
pub fn referenced_names(payments: &[Payment]) -> Vec<String> {
    let mut names: Vec<String> = payments
        .iter()
        .flat_map(|p| p.items_name.iter().cloned())
        .collect();
    names.sort();
    names.dedup();
    names
}

fn format_two_places(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}
