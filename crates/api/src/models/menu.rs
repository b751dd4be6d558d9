//! Catalog domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use swiftbite_core::MenuItemId;

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    #[serde(rename = "_id")]
    pub id: MenuItemId,
    #[serde(flatten)]
    pub fields: MenuItemFields,
}

/// The mutable fields of a menu item.
///
/// Used for both insert and update: an update replaces all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemFields {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub short_description: String,
}
