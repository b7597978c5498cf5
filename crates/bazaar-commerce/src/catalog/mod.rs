//! Product catalog module.
//!
//! Contains products, their variants, the stock ledger contract and the
//! catalog service.

mod inventory;
mod product;
mod service;

pub use inventory::{
    AdjustmentReason, InventoryAdjustment, StockAdjustment, StockBatch, StockLedger,
};
pub use service::{CatalogService, StockLevel};
pub use product::{slugify, Product, ProductImage, ProductVariant, VariantKey, MAX_TITLE_LEN};
