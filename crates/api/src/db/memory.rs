//! In-process store.
//!
//! Backs all four collections with `parking_lot` locked maps. Selected with
//! `SWIFTBITE_STORE=memory` and used throughout the test suites. Write
//! semantics mirror the Postgres repositories: email uniqueness is enforced,
//! bulk deletes ignore unknown IDs, unchanged updates report
//! `modified_count == 0`, prices are kept at two decimal places, and the
//! menu lists by category then name.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::{Decimal, RoundingStrategy};

use swiftbite_core::{Email, MenuItemId, OrderId, PaymentId, Role, UserId};

use super::{MenuStore, OrderStore, PaymentStore, RepositoryError, UserStore};
use crate::models::{
    MenuItem, MenuItemFields, NewOrder, NewUser, Order, Payment, PaymentDraft, UpdateResult, User,
};

/// All collections held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    menu: RwLock<BTreeMap<MenuItemId, MenuItem>>,
    orders: RwLock<Vec<Order>>,
    payments: RwLock<Vec<Payment>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn as_count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

/// Round a price the way a `NUMERIC(12, 2)` column stores it.
fn stored_price(price: Decimal) -> Decimal {
    let mut price = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);
    price
}

fn stored_fields(fields: MenuItemFields) -> MenuItemFields {
    MenuItemFields {
        price: stored_price(fields.price),
        ..fields
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.read().clone())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepositoryError> {
        // Check and insert under one write lock so concurrent registrations
        // of the same email cannot both succeed.
        let mut users = self.users.write();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_string()));
        }

        let user = User {
            id: UserId::generate(),
            email: user.email,
            name: user.name,
            photo_url: user.photo_url,
            role: Role::None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<UpdateResult, RepositoryError> {
        let mut users = self.users.write();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(UpdateResult::default());
        };

        let modified = user.role != role;
        user.role = role;
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete(&self, id: UserId) -> Result<u64, RepositoryError> {
        let mut users = self.users.write();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(as_count(before - users.len()))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(as_count(self.users.read().len()))
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn list(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let mut items: Vec<MenuItem> = self.menu.read().values().cloned().collect();
        items.sort_by(|a, b| {
            (&a.fields.category, &a.fields.name).cmp(&(&b.fields.category, &b.fields.name))
        });
        Ok(items)
    }

    async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        Ok(self.menu.read().get(&id).cloned())
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<MenuItem>, RepositoryError> {
        Ok(self
            .menu
            .read()
            .values()
            .filter(|item| names.contains(&item.fields.name))
            .cloned()
            .collect())
    }

    async fn insert(&self, fields: MenuItemFields) -> Result<MenuItem, RepositoryError> {
        let item = MenuItem {
            id: MenuItemId::generate(),
            fields: stored_fields(fields),
        };
        self.menu.write().insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        id: MenuItemId,
        fields: MenuItemFields,
    ) -> Result<UpdateResult, RepositoryError> {
        let fields = stored_fields(fields);
        let mut menu = self.menu.write();
        let Some(item) = menu.get_mut(&id) else {
            return Ok(UpdateResult::default());
        };

        let modified = item.fields != fields;
        item.fields = fields;
        Ok(UpdateResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete(&self, id: MenuItemId) -> Result<u64, RepositoryError> {
        Ok(u64::from(self.menu.write().remove(&id).is_some()))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(as_count(self.menu.read().len()))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list_by_buyer(&self, buyer: &Email) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .orders
            .read()
            .iter()
            .filter(|o| &o.buyer_email == buyer)
            .cloned()
            .collect())
    }

    async fn insert(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let order = Order {
            id: OrderId::generate(),
            buyer_email: order.buyer_email,
            items_name: order.items_name,
            price: stored_price(order.price),
            image: order.image,
            created_at: Utc::now(),
        };
        self.orders.write().push(order.clone());
        Ok(order)
    }

    async fn delete_owned(&self, id: OrderId, buyer: &Email) -> Result<u64, RepositoryError> {
        let mut orders = self.orders.write();
        let before = orders.len();
        orders.retain(|o| !(o.id == id && &o.buyer_email == buyer));
        Ok(as_count(before - orders.len()))
    }

    async fn delete_many(&self, ids: &[OrderId], buyer: &Email) -> Result<u64, RepositoryError> {
        let mut orders = self.orders.write();
        let before = orders.len();
        orders.retain(|o| !(ids.contains(&o.id) && &o.buyer_email == buyer));
        Ok(as_count(before - orders.len()))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(as_count(self.orders.read().len()))
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn insert(&self, draft: PaymentDraft) -> Result<Payment, RepositoryError> {
        let payment = Payment {
            id: PaymentId::generate(),
            email: draft.email,
            items_name: draft.items_name,
            price: stored_price(draft.price),
            order_items: draft.order_items,
            transaction_id: draft.transaction_id,
            created_at: Utc::now(),
        };
        self.payments.write().push(payment.clone());
        Ok(payment)
    }

    async fn list_by_email(&self, email: &Email) -> Result<Vec<Payment>, RepositoryError> {
        Ok(self
            .payments
            .read()
            .iter()
            .filter(|p| &p.email == email)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Payment>, RepositoryError> {
        Ok(self.payments.read().clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::Stores;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn stores() -> Stores {
        Stores::in_memory(&Arc::new(MemoryStore::new()))
    }

    fn new_user(s: &str) -> NewUser {
        NewUser {
            email: email(s),
            name: None,
            photo_url: None,
        }
    }

    fn fields(name: &str, price: i64) -> MenuItemFields {
        MenuItemFields {
            name: name.to_string(),
            image: String::new(),
            price: Decimal::new(price, 2),
            category: "pizza".to_string(),
            short_description: String::new(),
        }
    }

    fn new_order(buyer: &str) -> NewOrder {
        NewOrder {
            buyer_email: email(buyer),
            items_name: vec!["Margherita".to_string()],
            price: Decimal::new(1250, 2),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_user_insert_rejects_duplicate_email() {
        let stores = stores();
        stores.users.insert(new_user("a@x.io")).await.unwrap();

        let err = stores.users.insert(new_user("a@x.io")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(stores.users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_new_users_start_without_role() {
        let stores = stores();
        let user = stores.users.insert(new_user("a@x.io")).await.unwrap();
        assert_eq!(user.role, Role::None);
    }

    #[tokio::test]
    async fn test_set_role_counts() {
        let stores = stores();
        let user = stores.users.insert(new_user("a@x.io")).await.unwrap();

        let first = stores.users.set_role(user.id, Role::Admin).await.unwrap();
        assert_eq!((first.matched_count, first.modified_count), (1, 1));

        let again = stores.users.set_role(user.id, Role::Admin).await.unwrap();
        assert_eq!((again.matched_count, again.modified_count), (1, 0));

        let missing = stores
            .users
            .set_role(UserId::generate(), Role::Admin)
            .await
            .unwrap();
        assert_eq!(missing, UpdateResult::default());
    }

    #[tokio::test]
    async fn test_menu_update_missing_and_unchanged() {
        let stores = stores();
        let item = stores.menu.insert(fields("Margherita", 1250)).await.unwrap();

        let unchanged = stores
            .menu
            .update(item.id, fields("Margherita", 1250))
            .await
            .unwrap();
        assert_eq!((unchanged.matched_count, unchanged.modified_count), (1, 0));

        let changed = stores
            .menu
            .update(item.id, fields("Margherita", 1400))
            .await
            .unwrap();
        assert_eq!((changed.matched_count, changed.modified_count), (1, 1));

        let missing = stores
            .menu
            .update(MenuItemId::generate(), fields("Ghost", 100))
            .await
            .unwrap();
        assert_eq!(missing, UpdateResult::default());
    }

    #[tokio::test]
    async fn test_menu_find_by_names() {
        let stores = stores();
        stores.menu.insert(fields("Margherita", 1250)).await.unwrap();
        stores.menu.insert(fields("Calzone", 1400)).await.unwrap();

        let found = stores
            .menu
            .find_by_names(&["Calzone".to_string(), "Unknown".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].fields.name, "Calzone");
    }

    #[tokio::test]
    async fn test_delete_owned_ignores_other_buyers() {
        let stores = stores();
        let order = stores.orders.insert(new_order("a@x.io")).await.unwrap();

        let removed = stores
            .orders
            .delete_owned(order.id, &email("b@x.io"))
            .await
            .unwrap();
        assert_eq!(removed, 0);

        let removed = stores
            .orders
            .delete_owned(order.id, &email("a@x.io"))
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_delete_many_ignores_unknown_ids() {
        let stores = stores();
        let o1 = stores.orders.insert(new_order("a@x.io")).await.unwrap();
        let o2 = stores.orders.insert(new_order("a@x.io")).await.unwrap();

        let removed = stores
            .orders
            .delete_many(&[o1.id, OrderId::generate()], &email("a@x.io"))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let left = stores.orders.list_by_buyer(&email("a@x.io")).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, o2.id);
    }

    #[tokio::test]
    async fn test_delete_many_skips_other_buyers_orders() {
        let stores = stores();
        let mine = stores.orders.insert(new_order("a@x.io")).await.unwrap();
        let theirs = stores.orders.insert(new_order("b@x.io")).await.unwrap();

        let removed = stores
            .orders
            .delete_many(&[mine.id, theirs.id], &email("a@x.io"))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let left = stores.orders.list_by_buyer(&email("b@x.io")).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, theirs.id);
    }

    #[tokio::test]
    async fn test_menu_lists_by_category_then_name() {
        let stores = stores();
        let mut tiramisu = fields("Tiramisu", 650);
        tiramisu.category = "dessert".to_string();
        stores.menu.insert(fields("Margherita", 1250)).await.unwrap();
        stores.menu.insert(tiramisu).await.unwrap();
        stores.menu.insert(fields("Calzone", 1400)).await.unwrap();

        let names: Vec<String> = stores
            .menu
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.fields.name)
            .collect();
        assert_eq!(names, vec!["Tiramisu", "Calzone", "Margherita"]);
    }

    #[tokio::test]
    async fn test_prices_stored_at_two_decimal_places() {
        let stores = stores();
        let mut item = fields("Margherita", 0);
        item.price = Decimal::new(12_345, 3);
        let item = stores.menu.insert(item).await.unwrap();
        assert_eq!(item.fields.price.to_string(), "12.35");

        let mut order = new_order("a@x.io");
        order.price = Decimal::new(99_994, 4);
        let order = stores.orders.insert(order).await.unwrap();
        assert_eq!(order.price.to_string(), "10.00");

        let payment = stores
            .payments
            .insert(PaymentDraft {
                email: email("a@x.io"),
                items_name: vec![],
                price: Decimal::new(5, 0),
                order_items: vec![],
                transaction_id: None,
            })
            .await
            .unwrap();
        assert_eq!(payment.price.to_string(), "5.00");
    }

    #[tokio::test]
    async fn test_menu_update_compares_rounded_price() {
        let stores = stores();
        let item = stores.menu.insert(fields("Margherita", 1250)).await.unwrap();

        let mut same = fields("Margherita", 0);
        same.price = Decimal::new(12_501, 3);
        let result = stores.menu.update(item.id, same).await.unwrap();
        assert_eq!((result.matched_count, result.modified_count), (1, 0));
    }

    #[tokio::test]
    async fn test_payments_filtered_by_email() {
        let stores = stores();
        for who in ["a@x.io", "a@x.io", "b@x.io"] {
            stores
                .payments
                .insert(PaymentDraft {
                    email: email(who),
                    items_name: vec![],
                    price: Decimal::ONE,
                    order_items: vec![],
                    transaction_id: None,
                })
                .await
                .unwrap();
        }

        assert_eq!(
            stores
                .payments
                .list_by_email(&email("a@x.io"))
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(stores.payments.list_all().await.unwrap().len(), 3);
    }
}
