//! Order totals: shipping and tax over the item subtotal.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::Money;

/// Shipping and tax rules applied at checkout. Amounts are in minor units
/// of the order currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: i64,
    /// Shipping charged at or below the threshold.
    pub flat_shipping: i64,
    /// Tax rate in whole percent.
    pub tax_rate_percent: i64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: 100_000,
            flat_shipping: 10_000,
            tax_rate_percent: 18,
        }
    }
}

/// Price breakdown stored on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of line totals.
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    /// items + shipping + tax.
    pub total_price: Money,
}

impl PricingPolicy {
    /// Shipping for a subtotal.
    pub fn shipping_for(&self, subtotal: &Money) -> Money {
        if subtotal.amount_minor > self.free_shipping_threshold {
            Money::zero(subtotal.currency)
        } else {
            Money::new(self.flat_shipping, subtotal.currency)
        }
    }

    /// Compute the full breakdown.
    pub fn totals(&self, items_price: Money) -> Result<OrderTotals, CommerceError> {
        let shipping_price = self.shipping_for(&items_price);
        let tax_price = items_price.percent(self.tax_rate_percent)?;
        let total_price = items_price.try_add(&shipping_price)?.try_add(&tax_price)?;
        Ok(OrderTotals {
            items_price,
            shipping_price,
            tax_price,
            total_price,
        })
    }
}

impl OrderTotals {
    /// Whether total == items + shipping + tax.
    pub fn is_consistent(&self) -> bool {
        self.items_price
            .try_add(&self.shipping_price)
            .and_then(|m| m.try_add(&self.tax_price))
            .map(|sum| sum == self.total_price)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_small_order_pays_shipping() {
        let totals = PricingPolicy::default()
            .totals(Money::from_major(500, Currency::INR))
            .unwrap();
        assert_eq!(totals.shipping_price.amount_minor, 10_000);
        assert_eq!(totals.tax_price.amount_minor, 9_000);
        assert_eq!(totals.total_price.amount_minor, 50_000 + 10_000 + 9_000);
        assert!(totals.is_consistent());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let policy = PricingPolicy::default();
        let at = policy.totals(Money::from_major(1000, Currency::INR)).unwrap();
        assert_eq!(at.shipping_price.amount_minor, 10_000);

        let above = policy.totals(Money::new(100_001, Currency::INR)).unwrap();
        assert!(above.shipping_price.is_zero());
    }

    #[test]
    fn test_tax_rounds_to_paise() {
        let totals = PricingPolicy::default()
            .totals(Money::new(123_457, Currency::INR))
            .unwrap();
        // 1234.57 * 0.18 = 222.2226
        assert_eq!(totals.tax_price.amount_minor, 22_222);
        assert!(totals.is_consistent());
    }
}
