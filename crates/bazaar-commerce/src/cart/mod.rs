//! Shopping cart module.
//!
//! Contains the cart entity, its catalog-resolved view, and the Cart
//! Aggregator service.

mod cart;
mod service;
mod view;

pub use cart::{Cart, CartEntry, MAX_QUANTITY_PER_ITEM};
pub use service::{CartService, GuestEntry, MergeAdjustment, MergeAdjustmentReason, MergeOutcome};
pub use view::{CartLine, CartView};
