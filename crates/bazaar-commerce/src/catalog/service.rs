//! Catalog reads and admin stock edits.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::catalog::{
    AdjustmentReason, InventoryAdjustment, Product, StockAdjustment, StockBatch, StockLedger,
    VariantKey,
};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Currency;
use crate::principal::Principal;
use crate::repository::ProductRepository;

/// Target stock for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub variant: VariantKey,
    pub stock: i64,
}

/// Public product reads and the admin edit path.
pub struct CatalogService {
    products: Arc<dyn ProductRepository>,
    ledger: Arc<dyn StockLedger>,
    currency: Currency,
}

impl CatalogService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        ledger: Arc<dyn StockLedger>,
        currency: Currency,
    ) -> Self {
        Self {
            products,
            ledger,
            currency,
        }
    }

    /// Currency every product must be priced in.
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Every product, newest first.
    pub async fn list_products(&self) -> Result<Vec<Product>, CommerceError> {
        self.products.list_products().await
    }

    pub async fn product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.products
            .get_product(id)
            .await?
            .ok_or_else(|| CommerceError::product_not_found(id.as_str()))
    }

    /// Store a new product (admin).
    pub async fn create_product(
        &self,
        principal: &Principal,
        product: Product,
    ) -> Result<Product, CommerceError> {
        principal.ensure_admin()?;
        if self.products.get_product(&product.id).await?.is_some() {
            return Err(CommerceError::ValidationError(format!(
                "product {} already exists",
                product.id
            )));
        }
        product.ensure_currency(self.currency)?;
        self.products.upsert_product(product.clone()).await?;
        info!(product_id = %product.id, user_id = %principal.user_id, "Product created");
        Ok(product)
    }

    /// Replace a product's details and variants (admin). The ID and creation
    /// time of the stored product are kept.
    pub async fn update_product(
        &self,
        principal: &Principal,
        id: &ProductId,
        mut product: Product,
    ) -> Result<Product, CommerceError> {
        principal.ensure_admin()?;
        let existing = self.product(id).await?;
        product.id = existing.id;
        product.created_at = existing.created_at;
        product.ensure_currency(self.currency)?;
        self.products.upsert_product(product.clone()).await?;
        info!(product_id = %product.id, user_id = %principal.user_id, "Product updated");
        Ok(product)
    }

    /// Set the stock of the listed variants (admin).
    ///
    /// The differences to current stock go through the ledger as one
    /// correction batch, so either every level is applied or none is.
    pub async fn update_stock(
        &self,
        principal: &Principal,
        id: &ProductId,
        levels: Vec<StockLevel>,
    ) -> Result<Product, CommerceError> {
        principal.ensure_admin()?;
        if levels.is_empty() {
            return Err(CommerceError::ValidationError(
                "at least one variant stock level is required".into(),
            ));
        }
        let product = self.product(id).await?;

        let mut lines = Vec::with_capacity(levels.len());
        for level in &levels {
            if level.stock < 0 {
                return Err(CommerceError::ValidationError(format!(
                    "stock for {} cannot be negative",
                    level.variant
                )));
            }
            let current = product
                .variant(&level.variant)
                .map(|v| v.stock)
                .ok_or_else(|| CommerceError::variant_not_found(format!("{id} ({})", level.variant)))?;
            if level.stock != current {
                lines.push(StockAdjustment {
                    product_id: id.clone(),
                    variant: level.variant.clone(),
                    delta: level.stock - current,
                });
            }
        }

        if !lines.is_empty() {
            let applied = self
                .ledger
                .apply(StockBatch::new(lines, AdjustmentReason::Correction))
                .await?;
            info!(
                product_id = %id,
                user_id = %principal.user_id,
                lines = applied.len(),
                "Stock levels updated"
            );
        }
        self.product(id).await
    }

    /// Add (positive) or remove (negative) units of one variant (admin).
    /// Returns the stock after the change.
    pub async fn adjust_stock(
        &self,
        principal: &Principal,
        id: &ProductId,
        variant: &VariantKey,
        delta: i64,
    ) -> Result<i64, CommerceError> {
        principal.ensure_admin()?;
        match delta {
            0 => return Err(CommerceError::ValidationError("delta cannot be zero".into())),
            d if d > 0 => self.ledger.increment(id, variant, d).await?,
            d => {
                let quantity = d.checked_neg().ok_or(CommerceError::Overflow)?;
                self.ledger.decrement(id, variant, quantity).await?
            }
        }
        let stock = self.ledger.available(id, variant).await?;
        info!(product_id = %id, variant = %variant, delta, stock, "Stock adjusted");
        Ok(stock)
    }

    /// Stock audit trail of a product, oldest first (admin).
    pub async fn stock_history(
        &self,
        principal: &Principal,
        id: &ProductId,
    ) -> Result<Vec<InventoryAdjustment>, CommerceError> {
        principal.ensure_admin()?;
        self.product(id).await?;
        self.ledger.adjustments(id).await
    }
}
