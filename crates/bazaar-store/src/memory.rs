//! In-memory store behind the commerce repository traits.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use bazaar_commerce::cart::Cart;
use bazaar_commerce::catalog::{AdjustmentReason, InventoryAdjustment, Product};
use bazaar_commerce::checkout::Order;
use bazaar_commerce::repository::{CartRepository, OrderRepository, ProductRepository};
use bazaar_commerce::{CommerceError, OrderId, ProductId, UserId};

use crate::StoreError;

/// Products and the stock audit trail, guarded together so a ledger batch
/// and its audit records are written under one lock.
#[derive(Default)]
pub(crate) struct Catalog {
    pub(crate) products: HashMap<ProductId, Product>,
    pub(crate) adjustments: Vec<InventoryAdjustment>,
}

#[derive(Default)]
struct OrderTable {
    by_id: HashMap<OrderId, Order>,
    by_intent: HashMap<String, OrderId>,
}

/// Process-local storage for products, stock, carts and orders.
#[derive(Default)]
pub struct MemoryStore {
    pub(crate) catalog: RwLock<Catalog>,
    carts: RwLock<HashMap<UserId, Cart>>,
    orders: RwLock<OrderTable>,
    fail_on_order_save: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save_order` fail (tests of compensation paths).
    pub fn set_fail_on_order_save(&self, fail: bool) {
        self.fail_on_order_save.store(fail, Ordering::SeqCst);
    }

    /// Validate and insert products, replacing any with the same ID.
    pub async fn seed(&self, products: Vec<Product>) -> Result<usize, StoreError> {
        let count = products.len();
        for product in products {
            self.upsert_product(product).await?;
        }
        Ok(count)
    }

    /// Number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.by_id.len()
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceError> {
        Ok(self.catalog.read().await.products.get(id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, CommerceError> {
        let catalog = self.catalog.read().await;
        let mut products: Vec<Product> = catalog.products.values().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(products)
    }

    /// Admin edit path: stock is set directly, and every counter change is
    /// recorded as a correction.
    async fn upsert_product(&self, product: Product) -> Result<(), CommerceError> {
        product.validate()?;
        let mut catalog = self.catalog.write().await;
        let now = Utc::now();

        let corrections: Vec<InventoryAdjustment> = product
            .variants
            .iter()
            .filter_map(|variant| {
                let before = catalog
                    .products
                    .get(&product.id)
                    .and_then(|old| old.variant(&variant.key()))
                    .map_or(0, |v| v.stock);
                (variant.stock != before).then(|| InventoryAdjustment {
                    product_id: product.id.clone(),
                    variant: variant.key(),
                    quantity_change: variant.stock - before,
                    stock_after: variant.stock,
                    reason: AdjustmentReason::Correction,
                    reference_id: None,
                    timestamp: now,
                })
            })
            .collect();

        debug!(product_id = %product.id, corrections = corrections.len(), "Product stored");
        catalog.adjustments.extend(corrections);
        catalog.products.insert(product.id.clone(), product);
        Ok(())
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn load_cart(&self, owner: &UserId) -> Result<Cart, CommerceError> {
        Ok(self
            .carts
            .read()
            .await
            .get(owner)
            .cloned()
            .unwrap_or_else(|| Cart::new(owner.clone())))
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), CommerceError> {
        self.carts
            .write()
            .await
            .insert(cart.owner.clone(), cart.clone());
        Ok(())
    }

    async fn clear_cart(&self, owner: &UserId) -> Result<(), CommerceError> {
        self.carts.write().await.remove(owner);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert_order(&self, order: &Order) -> Result<(), CommerceError> {
        let mut table = self.orders.write().await;
        if table.by_id.contains_key(&order.id) {
            return Err(StoreError::Duplicate {
                entity: "order",
                key: order.id.to_string(),
            }
            .into());
        }
        if let Some(intent) = &order.payment.intent_id {
            if table.by_intent.contains_key(intent) {
                return Err(StoreError::Duplicate {
                    entity: "payment intent",
                    key: intent.clone(),
                }
                .into());
            }
            table.by_intent.insert(intent.clone(), order.id.clone());
        }
        table.by_id.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, CommerceError> {
        Ok(self.orders.read().await.by_id.get(id).cloned())
    }

    async fn find_by_intent(&self, intent_id: &str) -> Result<Option<Order>, CommerceError> {
        let table = self.orders.read().await;
        Ok(table
            .by_intent
            .get(intent_id)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn save_order(&self, order: &Order) -> Result<Order, CommerceError> {
        if self.fail_on_order_save.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected(format!("save of order {}", order.id)).into());
        }

        let mut table = self.orders.write().await;
        let stored = table
            .by_id
            .get(&order.id)
            .ok_or_else(|| CommerceError::order_not_found(order.id.as_str()))?;
        if stored.version != order.version {
            return Err(CommerceError::ConcurrentModification(format!(
                "order {} changed (expected version {}, found {})",
                order.id, order.version, stored.version
            )));
        }

        let mut saved = order.clone();
        saved.version += 1;
        if let Some(intent) = &saved.payment.intent_id {
            table.by_intent.insert(intent.clone(), saved.id.clone());
        }
        table.by_id.insert(saved.id.clone(), saved.clone());
        Ok(saved)
    }

    async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, CommerceError> {
        let table = self.orders.read().await;
        Ok(newest_first(
            table.by_id.values().filter(|o| &o.user_id == user_id),
        ))
    }

    async fn all_orders(&self) -> Result<Vec<Order>, CommerceError> {
        let table = self.orders.read().await;
        Ok(newest_first(table.by_id.values()))
    }
}

fn newest_first<'a>(orders: impl Iterator<Item = &'a Order>) -> Vec<Order> {
    let mut orders: Vec<Order> = orders.cloned().collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::catalog::VariantKey;
    use bazaar_commerce::checkout::{OrderTotals, ShippingInfo};
    use bazaar_commerce::{Currency, Money};

    fn order_for(user: &str) -> Order {
        let zero = Money::zero(Currency::INR);
        let totals = OrderTotals {
            items_price: zero,
            shipping_price: zero,
            tax_price: zero,
            total_price: zero,
        };
        let info = ShippingInfo::new("1 Main St", "Delhi", "110001", "India", "9999999999");
        Order::new(UserId::new(user), Vec::new(), info, totals)
    }

    #[tokio::test]
    async fn test_save_order_bumps_version() {
        let store = MemoryStore::new();
        let order = order_for("u1");
        store.insert_order(&order).await.unwrap();

        let saved = store.save_order(&order).await.unwrap();
        assert_eq!(saved.version, 1);
        assert_eq!(store.get_order(&order.id).await.unwrap().unwrap().version, 1);
    }

    #[tokio::test]
    async fn test_stale_save_is_rejected() {
        let store = MemoryStore::new();
        let order = order_for("u1");
        store.insert_order(&order).await.unwrap();
        store.save_order(&order).await.unwrap();

        let err = store.save_order(&order).await.unwrap_err();
        assert_eq!(err.kind(), "ConcurrentModification");
    }

    #[tokio::test]
    async fn test_duplicate_intent_rejected() {
        let store = MemoryStore::new();
        let mut first = order_for("u1");
        first.payment.intent_id = Some("order_1".into());
        let mut second = order_for("u1");
        second.payment.intent_id = Some("order_1".into());

        store.insert_order(&first).await.unwrap();
        assert!(store.insert_order(&second).await.is_err());
        assert_eq!(
            store.find_by_intent("order_1").await.unwrap().unwrap().id,
            first.id
        );
    }

    #[tokio::test]
    async fn test_orders_for_user_filters() {
        let store = MemoryStore::new();
        store.insert_order(&order_for("u1")).await.unwrap();
        store.insert_order(&order_for("u2")).await.unwrap();
        store.insert_order(&order_for("u1")).await.unwrap();

        assert_eq!(store.orders_for_user(&UserId::new("u1")).await.unwrap().len(), 2);
        assert_eq!(store.all_orders().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_upsert_validates_and_records_corrections() {
        let store = MemoryStore::new();
        let product = Product::new("Tee", Money::from_major(500, Currency::INR))
            .with_variant(VariantKey::new("M", "Red"), "T-M-R", 4);
        store.upsert_product(product.clone()).await.unwrap();

        let catalog = store.catalog.read().await;
        assert_eq!(catalog.adjustments.len(), 1);
        assert_eq!(catalog.adjustments[0].quantity_change, 4);
        drop(catalog);

        let invalid = Product::new("", Money::from_major(500, Currency::INR));
        assert!(store.upsert_product(invalid).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_cart_loads_empty() {
        let store = MemoryStore::new();
        let cart = store.load_cart(&UserId::new("nobody")).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.owner, UserId::new("nobody"));
    }
}
