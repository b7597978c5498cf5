//! Order types and the status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{StockAdjustment, VariantKey};
use crate::checkout::{OrderTotals, ShippingInfo};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::Money;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created at checkout, waiting for the payment callback.
    #[default]
    PendingPayment,
    /// Payment verified; stock taken.
    Paid,
    /// Being prepared.
    Packed,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before shipping.
    Cancelled,
    /// Sent back after delivery.
    Returned,
    /// Money returned to the customer.
    Refunded,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 8] = [
        OrderStatus::PendingPayment,
        OrderStatus::Paid,
        OrderStatus::Packed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Returned,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::Packed => "packed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }

    /// Check if order can be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::PendingPayment | OrderStatus::Paid | OrderStatus::Packed
        )
    }

    /// Whether the order's revenue counts (not undone by cancel, return or refund).
    pub fn counts_as_revenue(&self) -> bool {
        !matches!(
            self,
            OrderStatus::Cancelled | OrderStatus::Returned | OrderStatus::Refunded
        )
    }

    /// Whether goods were sold (paid and not undone).
    pub fn is_sold(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Packed | OrderStatus::Shipped | OrderStatus::Delivered
        )
    }

    /// Whether `self -> next` is an allowed transition.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (*self, next) {
            (from, to) if from == to => false,
            (Cancelled | Refunded, _) => false,
            (_, Refunded) => true,
            (Delivered, Returned) => true,
            (Delivered, _) => false,
            (from, Cancelled) => from.can_cancel(),
            (_, Delivered) => true,
            (Returned, _) => false,
            (PendingPayment, Paid) => true,
            (Paid, Packed) => true,
            (Paid | Packed, Shipped) => true,
            _ => false,
        }
    }

    /// Fail with `InvalidTransition` unless `self -> next` is allowed.
    pub fn ensure_transition(&self, next: OrderStatus) -> Result<(), CommerceError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CommerceError::InvalidTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CommerceError::ValidationError(format!("unknown order status: {s}")))
    }
}

/// Payment status recorded on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Succeeded,
}

/// Payment reference stored on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaymentInfo {
    /// Gateway payment intent ID.
    pub intent_id: Option<String>,
    /// Gateway payment ID, set on confirmation.
    pub payment_id: Option<String>,
    pub status: PaymentStatus,
}

/// A purchased line, captured at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    /// Product title at time of order.
    pub title: String,
    pub variant: VariantKey,
    pub quantity: i64,
    /// Unit price at time of order.
    pub unit_price: Money,
    pub image: Option<String>,
}

impl OrderItem {
    /// unit price * quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price.try_multiply(self.quantity)
    }
}

/// An order. Items and prices are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    items: Vec<OrderItem>,
    pub shipping_info: ShippingInfo,
    totals: OrderTotals,
    pub payment: PaymentInfo,
    pub status: OrderStatus,
    /// Set while the order holds stock taken from the ledger.
    pub stock_committed: bool,
    /// Optimistic concurrency version, bumped on every save.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Create an order in `pending_payment`.
    pub fn new(
        user_id: UserId,
        items: Vec<OrderItem>,
        shipping_info: ShippingInfo,
        totals: OrderTotals,
    ) -> Self {
        Self {
            id: OrderId::generate(),
            user_id,
            items,
            shipping_info,
            totals,
            payment: PaymentInfo::default(),
            status: OrderStatus::PendingPayment,
            stock_committed: false,
            version: 0,
            created_at: Utc::now(),
            paid_at: None,
            delivered_at: None,
            cancelled_at: None,
            refunded_at: None,
        }
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    pub fn total_price(&self) -> Money {
        self.totals.total_price
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Ledger lines that take this order's stock.
    pub fn stock_decrements(&self) -> Vec<StockAdjustment> {
        self.items
            .iter()
            .map(|i| StockAdjustment::decrement(i.product_id.clone(), i.variant.clone(), i.quantity))
            .collect()
    }

    /// Ledger lines that give this order's stock back.
    pub fn stock_restorations(&self) -> Vec<StockAdjustment> {
        self.items
            .iter()
            .map(|i| StockAdjustment::increment(i.product_id.clone(), i.variant.clone(), i.quantity))
            .collect()
    }

    /// Move to `next`, stamping the matching timestamp.
    pub fn transition(&mut self, next: OrderStatus, at: DateTime<Utc>) -> Result<(), CommerceError> {
        self.status.ensure_transition(next)?;
        match next {
            OrderStatus::Paid => self.paid_at = Some(at),
            OrderStatus::Delivered => self.delivered_at = Some(at),
            OrderStatus::Cancelled => self.cancelled_at = Some(at),
            OrderStatus::Refunded => self.refunded_at = Some(at),
            _ => {}
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_order_status_can_cancel() {
        assert!(PendingPayment.can_cancel());
        assert!(Paid.can_cancel());
        assert!(Packed.can_cancel());
        assert!(!Shipped.can_cancel());
        assert!(!Delivered.can_cancel());
    }

    #[test]
    fn test_forward_fulfilment() {
        assert!(PendingPayment.can_transition_to(Paid));
        assert!(Paid.can_transition_to(Packed));
        assert!(Paid.can_transition_to(Shipped));
        assert!(Packed.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(!Shipped.can_transition_to(Packed));
        assert!(!PendingPayment.can_transition_to(Packed));
    }

    #[test]
    fn test_delivered_moves_to_returned_or_refunded() {
        assert!(Delivered.can_transition_to(Returned));
        assert!(Delivered.can_transition_to(Refunded));
        for next in [PendingPayment, Paid, Packed, Shipped, Cancelled] {
            assert!(!Delivered.can_transition_to(next), "delivered -> {next}");
        }
    }

    #[test]
    fn test_returned_can_be_redelivered() {
        assert!(Returned.can_transition_to(Delivered));
        for next in [PendingPayment, Paid, Packed, Shipped, Cancelled] {
            assert!(!Returned.can_transition_to(next), "returned -> {next}");
        }
    }

    #[test]
    fn test_terminal_states() {
        for next in OrderStatus::ALL {
            assert!(!Cancelled.can_transition_to(next));
            assert!(!Refunded.can_transition_to(next));
        }
    }

    #[test]
    fn test_refund_from_non_terminal() {
        for from in [PendingPayment, Paid, Packed, Shipped, Delivered, Returned] {
            assert!(from.can_transition_to(Refunded), "{from} -> refunded");
        }
    }

    #[test]
    fn test_ensure_transition_reports_both_states() {
        let err = Delivered.ensure_transition(Paid).unwrap_err();
        assert_eq!(
            err,
            CommerceError::InvalidTransition {
                from: "delivered".into(),
                to: "paid".into()
            }
        );
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_transition_stamps_timestamps() {
        use crate::money::Currency;
        let totals = crate::checkout::PricingPolicy::default()
            .totals(Money::from_major(100, Currency::INR))
            .unwrap();
        let info = ShippingInfo::new("1 Main St", "Delhi", "110001", "India", "9999999999");
        let mut order = Order::new(UserId::new("u1"), Vec::new(), info, totals);
        let now = Utc::now();

        order.transition(Paid, now).unwrap();
        assert_eq!(order.paid_at, Some(now));
        order.transition(Delivered, now).unwrap();
        assert_eq!(order.delivered_at, Some(now));
        assert!(order.transition(Cancelled, now).is_err());
        assert_eq!(order.status, Delivered);
    }
}
