//! Checkout module.
//!
//! Contains orders, their status state machine, pricing, dashboard figures
//! and the Order Workflow service.

mod address;
mod order;
mod pricing;
mod stats;
mod workflow;

pub use address::ShippingInfo;
pub use order::{Order, OrderItem, OrderStatus, PaymentInfo, PaymentStatus};
pub use pricing::{OrderTotals, PricingPolicy};
pub use stats::{
    AdminStats, CategorySales, DailySales, LowStockVariant, TopProduct,
    LOW_STOCK_PRODUCT_THRESHOLD, LOW_STOCK_VARIANT_THRESHOLD,
};
pub use workflow::{CheckoutReceipt, OrderWorkflow, PaymentConfirmation};
