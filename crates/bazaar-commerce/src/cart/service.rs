//! Cart Aggregator: validated cart mutations for one authenticated owner.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cart::{Cart, CartView, MAX_QUANTITY_PER_ITEM};
use crate::catalog::{Product, VariantKey};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Currency;
use crate::principal::Principal;
use crate::repository::{CartRepository, ProductRepository};

/// An entry held client-side by a guest, sent on login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestEntry {
    pub product_id: ProductId,
    pub variant: VariantKey,
    pub quantity: i64,
}

/// What happened to a guest entry that was not merged as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergeAdjustment {
    pub product_id: ProductId,
    pub variant: VariantKey,
    /// Quantity the guest asked for.
    pub requested: i64,
    /// Quantity added to the cart (0 when skipped).
    pub merged: i64,
    pub reason: MergeAdjustmentReason,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MergeAdjustmentReason {
    /// Product or variant does not exist.
    Unavailable,
    /// Quantity was not positive.
    InvalidQuantity,
    /// Sum was clamped to stock or the per-entry limit.
    Clamped,
}

/// Result of a merge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergeOutcome {
    pub cart: CartView,
    pub adjustments: Vec<MergeAdjustment>,
}

/// Cart operations. Every call acts on the principal's own cart.
pub struct CartService {
    products: Arc<dyn ProductRepository>,
    carts: Arc<dyn CartRepository>,
    currency: Currency,
}

impl CartService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        carts: Arc<dyn CartRepository>,
        currency: Currency,
    ) -> Self {
        Self {
            products,
            carts,
            currency,
        }
    }

    /// The caller's cart resolved against current prices and stock.
    pub async fn get(&self, principal: &Principal) -> Result<CartView, CommerceError> {
        let cart = self.carts.load_cart(&principal.user_id).await?;
        self.view(&cart).await
    }

    /// Add `quantity` units, combining with an existing entry.
    pub async fn add(
        &self,
        principal: &Principal,
        product_id: &ProductId,
        variant: &VariantKey,
        quantity: i64,
    ) -> Result<CartView, CommerceError> {
        let mut cart = self.carts.load_cart(&principal.user_id).await?;
        let combined = cart.quantity_after_add(product_id, variant, quantity)?;

        let product = self.product(product_id).await?;
        ensure_stock(&product, variant, combined)?;

        cart.add(product_id.clone(), variant.clone(), quantity)?;
        self.carts.save_cart(&cart).await?;
        debug!(
            user_id = %principal.user_id,
            product_id = %product_id,
            variant = %variant,
            quantity = combined,
            "Cart entry added"
        );
        self.view(&cart).await
    }

    /// Replace an entry's quantity; `quantity <= 0` removes it.
    pub async fn update(
        &self,
        principal: &Principal,
        product_id: &ProductId,
        variant: &VariantKey,
        quantity: i64,
    ) -> Result<CartView, CommerceError> {
        let mut cart = self.carts.load_cart(&principal.user_id).await?;
        if cart.entry(product_id, variant).is_none() {
            return Err(CommerceError::NotFound {
                entity: "Cart item",
                id: format!("{product_id} ({variant})"),
            });
        }

        if quantity > 0 {
            let product = self.product(product_id).await?;
            ensure_stock(&product, variant, quantity)?;
        }

        cart.set_quantity(product_id, variant, quantity)?;
        self.carts.save_cart(&cart).await?;
        self.view(&cart).await
    }

    /// Remove an entry. Removing an absent entry succeeds.
    pub async fn remove(
        &self,
        principal: &Principal,
        product_id: &ProductId,
        variant: &VariantKey,
    ) -> Result<CartView, CommerceError> {
        let mut cart = self.carts.load_cart(&principal.user_id).await?;
        if cart.remove(product_id, variant) {
            self.carts.save_cart(&cart).await?;
        }
        self.view(&cart).await
    }

    /// Empty the cart.
    pub async fn clear(&self, principal: &Principal) -> Result<CartView, CommerceError> {
        self.carts.clear_cart(&principal.user_id).await?;
        self.view(&Cart::new(principal.user_id.clone())).await
    }

    /// Merge guest entries into the caller's cart.
    ///
    /// Matching entries are summed; the sum is clamped to current stock and
    /// the per-entry limit. Unknown products and non-positive quantities are
    /// skipped. Every entry not merged as requested is reported.
    pub async fn merge(
        &self,
        principal: &Principal,
        guest_entries: Vec<GuestEntry>,
    ) -> Result<MergeOutcome, CommerceError> {
        let mut cart = self.carts.load_cart(&principal.user_id).await?;
        let mut adjustments = Vec::new();
        let mut products: HashMap<ProductId, Option<Product>> = HashMap::new();

        for guest in guest_entries {
            if guest.quantity <= 0 {
                adjustments.push(MergeAdjustment::skipped(
                    guest,
                    MergeAdjustmentReason::InvalidQuantity,
                ));
                continue;
            }

            if !products.contains_key(&guest.product_id) {
                let product = self.products.get_product(&guest.product_id).await?;
                products.insert(guest.product_id.clone(), product);
            }
            let stock = products
                .get(&guest.product_id)
                .and_then(Option::as_ref)
                .and_then(|p| p.variant(&guest.variant))
                .map(|v| v.stock);
            let Some(stock) = stock else {
                adjustments.push(MergeAdjustment::skipped(
                    guest,
                    MergeAdjustmentReason::Unavailable,
                ));
                continue;
            };

            let existing = cart.quantity_of(&guest.product_id, &guest.variant);
            let wanted = existing.saturating_add(guest.quantity);
            let target = wanted.min(stock).min(MAX_QUANTITY_PER_ITEM);

            if target <= existing {
                adjustments.push(MergeAdjustment::skipped(guest, MergeAdjustmentReason::Clamped));
                continue;
            }
            if target < wanted {
                adjustments.push(MergeAdjustment {
                    product_id: guest.product_id.clone(),
                    variant: guest.variant.clone(),
                    requested: guest.quantity,
                    merged: target - existing,
                    reason: MergeAdjustmentReason::Clamped,
                });
            }
            cart.put(guest.product_id, guest.variant, target);
        }

        self.carts.save_cart(&cart).await?;
        info!(
            user_id = %principal.user_id,
            entries = cart.entries.len(),
            adjusted = adjustments.len(),
            "Guest cart merged"
        );
        Ok(MergeOutcome {
            cart: self.view(&cart).await?,
            adjustments,
        })
    }

    async fn product(&self, product_id: &ProductId) -> Result<Product, CommerceError> {
        self.products
            .get_product(product_id)
            .await?
            .ok_or_else(|| CommerceError::product_not_found(product_id.as_str()))
    }

    async fn view(&self, cart: &Cart) -> Result<CartView, CommerceError> {
        let mut products = HashMap::new();
        for entry in &cart.entries {
            if products.contains_key(&entry.product_id) {
                continue;
            }
            if let Some(product) = self.products.get_product(&entry.product_id).await? {
                products.insert(entry.product_id.clone(), product);
            }
        }
        CartView::build(cart, self.currency, |id| products.get(id))
    }
}

impl MergeAdjustment {
    fn skipped(guest: GuestEntry, reason: MergeAdjustmentReason) -> Self {
        Self {
            product_id: guest.product_id,
            variant: guest.variant,
            requested: guest.quantity,
            merged: 0,
            reason,
        }
    }
}

/// Fail unless the variant exists and holds at least `quantity` units.
fn ensure_stock(product: &Product, variant: &VariantKey, quantity: i64) -> Result<(), CommerceError> {
    let stock = product
        .variant(variant)
        .ok_or_else(|| CommerceError::variant_not_found(format!("{} ({variant})", product.id)))?
        .stock;
    if stock < quantity {
        return Err(CommerceError::InsufficientStock {
            product: product.title.clone(),
            requested: quantity,
            available: stock,
        });
    }
    Ok(())
}
