//! In-process storage backend for Bazaar.
//!
//! [`MemoryStore`] implements every repository trait of `bazaar-commerce`
//! and the [`StockLedger`](bazaar_commerce::catalog::StockLedger) with
//! atomic, all-or-nothing stock batches.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.seed_from_file(Path::new("catalog.json"), Currency::INR).await?;
//! let workflow = OrderWorkflow::new(
//!     store.clone(), store.clone(), store.clone(), store.clone(), gateway,
//! );
//! ```

mod error;
mod ledger;
mod memory;
mod seed;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use seed::{load_catalog, parse_catalog};
