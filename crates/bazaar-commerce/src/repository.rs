//! Storage contracts used by the cart and order services.
//!
//! Stock counters live behind [`StockLedger`](crate::catalog::StockLedger);
//! these traits cover the documents around them.

use async_trait::async_trait;

use crate::cart::Cart;
use crate::catalog::Product;
use crate::checkout::Order;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};

/// Product documents.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Look up a product by ID.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, CommerceError>;

    /// All products.
    async fn list_products(&self) -> Result<Vec<Product>, CommerceError>;

    /// Validate and insert or replace a product.
    async fn upsert_product(&self, product: Product) -> Result<(), CommerceError>;
}

/// One cart per user.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The user's cart, or an empty one if none was saved.
    async fn load_cart(&self, owner: &UserId) -> Result<Cart, CommerceError>;

    /// Replace the user's cart.
    async fn save_cart(&self, cart: &Cart) -> Result<(), CommerceError>;

    /// Drop all entries of the user's cart.
    async fn clear_cart(&self, owner: &UserId) -> Result<(), CommerceError>;
}

/// Order documents with optimistic concurrency.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order. Fails if the ID or payment intent is already taken.
    async fn insert_order(&self, order: &Order) -> Result<(), CommerceError>;

    /// Look up an order by ID.
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, CommerceError>;

    /// Look up an order by its payment intent ID.
    async fn find_by_intent(&self, intent_id: &str) -> Result<Option<Order>, CommerceError>;

    /// Store `order` if the stored version still equals `order.version`.
    ///
    /// Returns the stored order with its version bumped, or
    /// `ConcurrentModification` if another writer got there first.
    async fn save_order(&self, order: &Order) -> Result<Order, CommerceError>;

    /// Orders of one user, newest first.
    async fn orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, CommerceError>;

    /// Every order, newest first.
    async fn all_orders(&self) -> Result<Vec<Order>, CommerceError>;
}
