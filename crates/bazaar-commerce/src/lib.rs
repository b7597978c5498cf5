//! Order, inventory and payment consistency core for Bazaar.
//!
//! - **Catalog**: products, variants, the Stock Ledger contract and admin stock edits
//! - **Cart**: per-user carts and the Cart Aggregator service
//! - **Checkout**: orders, the status state machine and the Order Workflow
//! - **Payment**: the Payment Gateway Adapter contract and HMAC verification
//!
//! Every cart and order operation takes an explicit [`Principal`]; storage
//! sits behind the traits in [`repository`] and [`catalog::StockLedger`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_commerce::prelude::*;
//!
//! let workflow = OrderWorkflow::new(products, ledger, carts, orders, gateway);
//! let receipt = workflow.checkout(&principal, shipping_info).await?;
//! let signature = gateway.sign(&receipt.payment_intent.id, "pay_123")?;
//! let paid = workflow
//!     .verify_payment(&principal, &PaymentConfirmation {
//!         intent_id: receipt.payment_intent.id,
//!         payment_id: "pay_123".into(),
//!         signature,
//!     })
//!     .await?;
//! assert_eq!(paid.status, OrderStatus::Paid);
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod principal;
pub mod repository;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod payment;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};
pub use principal::{Principal, Role};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::principal::{Principal, Role};
    pub use crate::repository::{CartRepository, OrderRepository, ProductRepository};

    // Catalog
    pub use crate::catalog::{
        AdjustmentReason, CatalogService, InventoryAdjustment, Product, ProductVariant,
        StockAdjustment, StockBatch, StockLedger, StockLevel, VariantKey,
    };

    // Cart
    pub use crate::cart::{Cart, CartService, CartView, GuestEntry, MergeOutcome};

    // Checkout
    pub use crate::checkout::{
        AdminStats, CheckoutReceipt, Order, OrderItem, OrderStatus, OrderWorkflow,
        PaymentConfirmation, PricingPolicy, ShippingInfo,
    };

    // Payment
    pub use crate::payment::{OfflineGateway, PaymentGateway, PaymentIntent, SignatureVerifier};
}
