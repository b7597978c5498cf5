//! Cart and cart entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::VariantKey;
use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};

/// Maximum quantity allowed per cart entry.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A user's cart. At most one entry per (product, size, color).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Owner of the cart.
    pub owner: UserId,
    /// Entries in insertion order.
    pub entries: Vec<CartEntry>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// One (product, variant, quantity) entry. Stores no prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    pub product_id: ProductId,
    pub variant: VariantKey,
    /// Always at least 1.
    pub quantity: i64,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(owner: UserId) -> Self {
        Self {
            owner,
            entries: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Find the entry for a product variant.
    pub fn entry(&self, product_id: &ProductId, variant: &VariantKey) -> Option<&CartEntry> {
        self.entries
            .iter()
            .find(|e| &e.product_id == product_id && &e.variant == variant)
    }

    /// Quantity already in the cart for a product variant (0 if absent).
    pub fn quantity_of(&self, product_id: &ProductId, variant: &VariantKey) -> i64 {
        self.entry(product_id, variant).map_or(0, |e| e.quantity)
    }

    /// Quantity the entry would hold after adding `quantity` more.
    ///
    /// Returns an error if:
    /// - Quantity is not positive
    /// - The result would exceed MAX_QUANTITY_PER_ITEM
    /// - Arithmetic overflow would occur
    pub fn quantity_after_add(
        &self,
        product_id: &ProductId,
        variant: &VariantKey,
        quantity: i64,
    ) -> Result<i64, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let combined = self
            .quantity_of(product_id, variant)
            .checked_add(quantity)
            .ok_or(CommerceError::Overflow)?;
        if combined > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                combined,
                MAX_QUANTITY_PER_ITEM,
            ));
        }
        Ok(combined)
    }

    /// Add to an existing entry or create one. Returns the new quantity.
    pub fn add(
        &mut self,
        product_id: ProductId,
        variant: VariantKey,
        quantity: i64,
    ) -> Result<i64, CommerceError> {
        let combined = self.quantity_after_add(&product_id, &variant, quantity)?;
        self.put(product_id, variant, combined);
        Ok(combined)
    }

    /// Replace an entry's quantity. A quantity <= 0 removes the entry.
    ///
    /// Returns false if there is no such entry.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        variant: &VariantKey,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove(product_id, variant));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }
        match self
            .entries
            .iter_mut()
            .find(|e| &e.product_id == product_id && &e.variant == variant)
        {
            Some(entry) => {
                entry.quantity = quantity;
                self.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Set an entry to exactly `quantity` (>= 1), creating it if needed.
    pub(crate) fn put(&mut self, product_id: ProductId, variant: VariantKey, quantity: i64) {
        match self
            .entries
            .iter_mut()
            .find(|e| e.product_id == product_id && e.variant == variant)
        {
            Some(entry) => entry.quantity = quantity,
            None => self.entries.push(CartEntry {
                product_id,
                variant,
                quantity,
            }),
        }
        self.updated_at = Utc::now();
    }

    /// Remove an entry. Returns whether something was removed.
    pub fn remove(&mut self, product_id: &ProductId, variant: &VariantKey) -> bool {
        let len_before = self.entries.len();
        self.entries
            .retain(|e| !(&e.product_id == product_id && &e.variant == variant));
        let removed = self.entries.len() < len_before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.updated_at = Utc::now();
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
