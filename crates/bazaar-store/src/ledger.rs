//! Stock ledger over the in-memory catalog.
//!
//! A batch is validated line by line against projected counters and only
//! then written, all under the catalog write lock. Two checkouts racing for
//! the last units therefore cannot both succeed.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, warn};

use bazaar_commerce::catalog::{InventoryAdjustment, StockAdjustment, StockBatch, StockLedger, VariantKey};
use bazaar_commerce::{CommerceError, ProductId};

use crate::memory::{Catalog, MemoryStore};

#[async_trait]
impl StockLedger for MemoryStore {
    async fn available(
        &self,
        product_id: &ProductId,
        variant: &VariantKey,
    ) -> Result<i64, CommerceError> {
        let catalog = self.catalog.read().await;
        let product = catalog
            .products
            .get(product_id)
            .ok_or_else(|| CommerceError::product_not_found(product_id.as_str()))?;
        product
            .variant(variant)
            .map(|v| v.stock)
            .ok_or_else(|| CommerceError::variant_not_found(format!("{product_id} ({variant})")))
    }

    async fn apply(&self, batch: StockBatch) -> Result<Vec<InventoryAdjustment>, CommerceError> {
        let mut catalog = self.catalog.write().await;
        let lines = plan(&catalog, &batch)?;

        let now = Utc::now();
        let mut applied = Vec::with_capacity(lines.len());
        for line in lines {
            let Some(variant) = catalog
                .products
                .get_mut(&line.product_id)
                .and_then(|p| p.variant_mut(&line.variant))
            else {
                continue;
            };
            variant.stock += line.delta;
            applied.push(InventoryAdjustment {
                product_id: line.product_id.clone(),
                variant: line.variant.clone(),
                quantity_change: line.delta,
                stock_after: variant.stock,
                reason: batch.reason,
                reference_id: batch.reference.clone(),
                timestamp: now,
            });
        }

        debug!(
            reason = batch.reason.as_str(),
            reference = batch.reference.as_deref().unwrap_or("-"),
            lines = applied.len(),
            "Stock batch applied"
        );
        catalog.adjustments.extend(applied.iter().cloned());
        Ok(applied)
    }

    async fn adjustments(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<InventoryAdjustment>, CommerceError> {
        Ok(self
            .catalog
            .read()
            .await
            .adjustments
            .iter()
            .filter(|a| &a.product_id == product_id)
            .cloned()
            .collect())
    }
}

/// Check every line against projected stock without writing anything.
/// Returns the lines to apply (missing ones dropped when the batch allows it).
fn plan<'b>(catalog: &Catalog, batch: &'b StockBatch) -> Result<Vec<&'b StockAdjustment>, CommerceError> {
    let mut projected: HashMap<(&ProductId, &VariantKey), i64> = HashMap::new();
    let mut accepted = Vec::with_capacity(batch.lines.len());

    for line in &batch.lines {
        let found = catalog
            .products
            .get(&line.product_id)
            .and_then(|p| p.variant(&line.variant).map(|v| (p, v)));
        let Some((product, variant)) = found else {
            if batch.skip_missing {
                warn!(
                    product_id = %line.product_id,
                    variant = %line.variant,
                    reason = batch.reason.as_str(),
                    "Skipping stock line for removed product"
                );
                continue;
            }
            return Err(match catalog.products.get(&line.product_id) {
                Some(_) => CommerceError::variant_not_found(format!(
                    "{} ({})",
                    line.product_id, line.variant
                )),
                None => CommerceError::product_not_found(line.product_id.as_str()),
            });
        };

        let current = projected
            .entry((&line.product_id, &line.variant))
            .or_insert(variant.stock);
        let next = current.checked_add(line.delta).ok_or(CommerceError::Overflow)?;
        if next < 0 {
            return Err(CommerceError::InsufficientStock {
                product: product.title.clone(),
                requested: -line.delta,
                available: *current,
            });
        }
        *current = next;
        accepted.push(line);
    }
    Ok(accepted)
}
