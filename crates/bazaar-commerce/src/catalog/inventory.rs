//! Stock ledger contract and inventory audit types.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::VariantKey;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Reason for an inventory adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// Sold to customer (payment confirmed).
    Sale,
    /// Order cancelled after stock was taken.
    Cancellation,
    /// Order refunded after stock was taken.
    Refund,
    /// Manual correction or compensation of a failed write.
    Correction,
}

impl AdjustmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::Sale => "sale",
            AdjustmentReason::Cancellation => "cancellation",
            AdjustmentReason::Refund => "refund",
            AdjustmentReason::Correction => "correction",
        }
    }
}

/// One signed change to one variant's counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub product_id: ProductId,
    pub variant: VariantKey,
    /// Negative to take stock, positive to restore it.
    pub delta: i64,
}

impl StockAdjustment {
    /// Take `quantity` units.
    pub fn decrement(product_id: ProductId, variant: VariantKey, quantity: i64) -> Self {
        Self {
            product_id,
            variant,
            delta: -quantity,
        }
    }

    /// Give back `quantity` units.
    pub fn increment(product_id: ProductId, variant: VariantKey, quantity: i64) -> Self {
        Self {
            product_id,
            variant,
            delta: quantity,
        }
    }

    /// The opposite adjustment.
    pub fn reversed(&self) -> Self {
        Self {
            product_id: self.product_id.clone(),
            variant: self.variant.clone(),
            delta: -self.delta,
        }
    }
}

/// A set of adjustments applied all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockBatch {
    pub lines: Vec<StockAdjustment>,
    pub reason: AdjustmentReason,
    /// Order or other document the batch belongs to.
    pub reference: Option<String>,
    /// Drop lines whose product or variant no longer exists instead of failing.
    pub skip_missing: bool,
}

impl StockBatch {
    pub fn new(lines: Vec<StockAdjustment>, reason: AdjustmentReason) -> Self {
        Self {
            lines,
            reason,
            reference: None,
            skip_missing: false,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn skipping_missing(mut self) -> Self {
        self.skip_missing = true;
        self
    }

    /// The batch that undoes `applied`.
    pub fn compensation(applied: &[InventoryAdjustment], reference: Option<String>) -> Self {
        Self {
            lines: applied
                .iter()
                .map(|a| StockAdjustment {
                    product_id: a.product_id.clone(),
                    variant: a.variant.clone(),
                    delta: -a.quantity_change,
                })
                .collect(),
            reason: AdjustmentReason::Correction,
            reference,
            skip_missing: true,
        }
    }
}

/// An applied inventory adjustment (audit trail).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryAdjustment {
    pub product_id: ProductId,
    pub variant: VariantKey,
    /// Change in quantity (positive or negative).
    pub quantity_change: i64,
    /// Counter value after the change.
    pub stock_after: i64,
    pub reason: AdjustmentReason,
    pub reference_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Authoritative per-variant stock counters.
///
/// Implementations must make `decrement` a single conditional update
/// (`stock -= qty WHERE stock >= qty`) and `apply` all-or-nothing, so the
/// non-negative stock invariant holds under concurrent checkouts.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Current stock of a variant. `NotFound` if product or variant is absent.
    async fn available(&self, product_id: &ProductId, variant: &VariantKey)
        -> Result<i64, CommerceError>;

    /// Apply every line of the batch or none of them.
    async fn apply(&self, batch: StockBatch) -> Result<Vec<InventoryAdjustment>, CommerceError>;

    /// Audit trail for one product, oldest first.
    async fn adjustments(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<InventoryAdjustment>, CommerceError>;

    /// Whether `quantity` units can be taken right now.
    async fn check_available(
        &self,
        product_id: &ProductId,
        variant: &VariantKey,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        Ok(self.available(product_id, variant).await? >= quantity)
    }

    /// Take `quantity` units, failing with `InsufficientStock` if short.
    async fn decrement(
        &self,
        product_id: &ProductId,
        variant: &VariantKey,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        let line = StockAdjustment::decrement(product_id.clone(), variant.clone(), quantity);
        self.apply(StockBatch::new(vec![line], AdjustmentReason::Correction))
            .await
            .map(|_| ())
    }

    /// Give back `quantity` units.
    async fn increment(
        &self,
        product_id: &ProductId,
        variant: &VariantKey,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        let line = StockAdjustment::increment(product_id.clone(), variant.clone(), quantity);
        self.apply(StockBatch::new(vec![line], AdjustmentReason::Correction))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_signs() {
        let key = VariantKey::new("M", "Red");
        let take = StockAdjustment::decrement(ProductId::new("p1"), key.clone(), 3);
        assert_eq!(take.delta, -3);
        assert_eq!(take.reversed().delta, 3);
        assert_eq!(StockAdjustment::increment(ProductId::new("p1"), key, 2).delta, 2);
    }

    #[test]
    fn test_compensation_negates_applied() {
        let applied = vec![InventoryAdjustment {
            product_id: ProductId::new("p1"),
            variant: VariantKey::new("M", "Red"),
            quantity_change: -4,
            stock_after: 1,
            reason: AdjustmentReason::Sale,
            reference_id: Some("o1".into()),
            timestamp: Utc::now(),
        }];
        let batch = StockBatch::compensation(&applied, Some("o1".into()));
        assert_eq!(batch.lines[0].delta, 4);
        assert_eq!(batch.reason, AdjustmentReason::Correction);
        assert!(batch.skip_missing);
    }
}
