//! Order Workflow: checkout, payment confirmation, cancellation, refunds and
//! fulfilment updates.
//!
//! Stock is taken from the ledger only when payment is confirmed and given
//! back only by an order that took it (`stock_committed`). Every order write
//! is a version compare-and-swap; when the write loses, any stock batch
//! applied for it is reversed before the error is returned.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::catalog::{AdjustmentReason, InventoryAdjustment, StockBatch, StockLedger};
use crate::checkout::{AdminStats, Order, OrderItem, OrderStatus, PaymentStatus, PricingPolicy, ShippingInfo};
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::{Currency, Money};
use crate::payment::{PaymentGateway, PaymentIntent};
use crate::principal::Principal;
use crate::repository::{CartRepository, OrderRepository, ProductRepository};

/// Signed payment callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub intent_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// A created order and the intent the client pays against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub payment_intent: PaymentIntent,
}

/// Drives orders through their lifecycle.
pub struct OrderWorkflow {
    products: Arc<dyn ProductRepository>,
    ledger: Arc<dyn StockLedger>,
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    gateway: Arc<dyn PaymentGateway>,
    pricing: PricingPolicy,
    currency: Currency,
}

impl OrderWorkflow {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        ledger: Arc<dyn StockLedger>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            products,
            ledger,
            carts,
            orders,
            gateway,
            pricing: PricingPolicy::default(),
            currency: Currency::default(),
        }
    }

    pub fn with_pricing(mut self, pricing: PricingPolicy) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Snapshot the caller's cart into a `pending_payment` order and open a
    /// payment intent for its total.
    pub async fn checkout(
        &self,
        principal: &Principal,
        shipping_info: ShippingInfo,
    ) -> Result<CheckoutReceipt, CommerceError> {
        shipping_info.validate()?;
        let cart = self.carts.load_cart(&principal.user_id).await?;
        if cart.is_empty() {
            return Err(CommerceError::CartEmpty);
        }

        let mut items = Vec::with_capacity(cart.entries.len());
        for entry in &cart.entries {
            let Some(product) = self.products.get_product(&entry.product_id).await? else {
                warn!(
                    user_id = %principal.user_id,
                    product_id = %entry.product_id,
                    "Skipping cart entry for removed product"
                );
                continue;
            };
            let stock = product.variant(&entry.variant).map_or(0, |v| v.stock);
            if stock < entry.quantity {
                return Err(CommerceError::InsufficientStock {
                    product: product.title.clone(),
                    requested: entry.quantity,
                    available: stock,
                });
            }
            items.push(OrderItem {
                product_id: product.id.clone(),
                title: product.title.clone(),
                variant: entry.variant.clone(),
                quantity: entry.quantity,
                unit_price: product.final_price(),
                image: product.main_image().map(str::to_string),
            });
        }
        if items.is_empty() {
            return Err(CommerceError::CartEmpty);
        }

        let line_totals = items
            .iter()
            .map(OrderItem::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        let subtotal = Money::try_sum(line_totals.iter(), self.currency)?;
        let totals = self.pricing.totals(subtotal)?;

        let mut order = Order::new(principal.user_id.clone(), items, shipping_info, totals);
        let intent = self
            .gateway
            .create_intent(order.total_price(), order.id.as_str())
            .await?;
        order.payment.intent_id = Some(intent.id.clone());
        self.orders.insert_order(&order).await?;

        info!(
            order_id = %order.id,
            user_id = %order.user_id,
            intent_id = %intent.id,
            gateway = self.gateway.name(),
            total = order.total_price().amount_minor,
            "Order created"
        );
        Ok(CheckoutReceipt {
            order,
            payment_intent: intent,
        })
    }

    /// Verify a payment callback, take the order's stock and mark it paid.
    pub async fn verify_payment(
        &self,
        principal: &Principal,
        confirmation: &PaymentConfirmation,
    ) -> Result<Order, CommerceError> {
        let mut order = self
            .orders
            .find_by_intent(&confirmation.intent_id)
            .await?
            .ok_or_else(|| CommerceError::NotFound {
                entity: "Order",
                id: format!("payment intent {}", confirmation.intent_id),
            })?;
        principal.ensure_access(&order.user_id, "this order")?;

        if !self.gateway.verify_signature(
            &confirmation.intent_id,
            &confirmation.payment_id,
            &confirmation.signature,
        ) {
            warn!(
                order_id = %order.id,
                intent_id = %confirmation.intent_id,
                "Payment signature rejected"
            );
            return Err(CommerceError::VerificationFailed);
        }
        order.status.ensure_transition(OrderStatus::Paid)?;

        let batch = StockBatch::new(order.stock_decrements(), AdjustmentReason::Sale)
            .with_reference(order.id.as_str());
        let applied = match self.ledger.apply(batch).await {
            Ok(applied) => applied,
            Err(err) => {
                if let CommerceError::InsufficientStock { .. } = err {
                    warn!(
                        order_id = %order.id,
                        payment_id = %confirmation.payment_id,
                        error = %err,
                        "Paid order cannot be fulfilled from stock, manual refund needed"
                    );
                }
                return Err(err);
            }
        };

        order.stock_committed = true;
        order.payment.payment_id = Some(confirmation.payment_id.clone());
        order.payment.status = PaymentStatus::Succeeded;
        order.transition(OrderStatus::Paid, Utc::now())?;
        let saved = self.save_with_compensation(&order, &applied).await?;

        if let Err(err) = self.carts.clear_cart(&saved.user_id).await {
            error!(order_id = %saved.id, user_id = %saved.user_id, error = %err, "Failed to clear cart after payment");
        }
        info!(order_id = %saved.id, payment_id = %confirmation.payment_id, "Order paid");
        Ok(saved)
    }

    /// The caller's orders, newest first.
    pub async fn my_orders(&self, principal: &Principal) -> Result<Vec<Order>, CommerceError> {
        self.orders.orders_for_user(&principal.user_id).await
    }

    /// One order, visible to its owner and admins.
    pub async fn order(&self, principal: &Principal, id: &OrderId) -> Result<Order, CommerceError> {
        let order = self.load(id).await?;
        principal.ensure_access(&order.user_id, "this order")?;
        Ok(order)
    }

    /// Cancel an order that has not shipped.
    pub async fn cancel_order(
        &self,
        principal: &Principal,
        id: &OrderId,
    ) -> Result<Order, CommerceError> {
        let order = self.load(id).await?;
        principal.ensure_access(&order.user_id, "this order")?;
        self.cancel(order).await
    }

    /// Refund an order (admin).
    pub async fn refund_order(
        &self,
        principal: &Principal,
        id: &OrderId,
    ) -> Result<Order, CommerceError> {
        principal.ensure_admin()?;
        let order = self.load(id).await?;
        self.refund(order).await
    }

    /// Move an order to `next` (admin).
    ///
    /// `cancelled` and `refunded` run the cancel and refund flows. `paid` is
    /// only reachable through payment verification.
    pub async fn update_status(
        &self,
        principal: &Principal,
        id: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, CommerceError> {
        principal.ensure_admin()?;
        let mut order = self.load(id).await?;
        match next {
            OrderStatus::Cancelled => self.cancel(order).await,
            OrderStatus::Refunded => self.refund(order).await,
            OrderStatus::Paid | OrderStatus::PendingPayment => {
                Err(CommerceError::InvalidTransition {
                    from: order.status.as_str().to_string(),
                    to: next.as_str().to_string(),
                })
            }
            _ => {
                let from = order.status;
                order.transition(next, Utc::now())?;
                let saved = self.orders.save_order(&order).await?;
                info!(order_id = %saved.id, from = %from, to = %next, "Order status updated");
                Ok(saved)
            }
        }
    }

    /// Every order, newest first (admin).
    pub async fn all_orders(&self, principal: &Principal) -> Result<Vec<Order>, CommerceError> {
        principal.ensure_admin()?;
        self.orders.all_orders().await
    }

    /// Dashboard figures over all orders and products (admin).
    pub async fn admin_stats(&self, principal: &Principal) -> Result<AdminStats, CommerceError> {
        principal.ensure_admin()?;
        let orders = self.orders.all_orders().await?;
        let products = self.products.list_products().await?;
        AdminStats::compute(&orders, &products, self.currency, Utc::now())
    }

    async fn load(&self, id: &OrderId) -> Result<Order, CommerceError> {
        self.orders
            .get_order(id)
            .await?
            .ok_or_else(|| CommerceError::order_not_found(id.as_str()))
    }

    async fn cancel(&self, mut order: Order) -> Result<Order, CommerceError> {
        order.status.ensure_transition(OrderStatus::Cancelled)?;
        let applied = self
            .release_stock(&mut order, AdjustmentReason::Cancellation)
            .await?;
        order.transition(OrderStatus::Cancelled, Utc::now())?;
        let saved = self.save_with_compensation(&order, &applied).await?;
        info!(order_id = %saved.id, restored_lines = applied.len(), "Order cancelled");
        Ok(saved)
    }

    async fn refund(&self, mut order: Order) -> Result<Order, CommerceError> {
        order.status.ensure_transition(OrderStatus::Refunded)?;
        let applied = self.release_stock(&mut order, AdjustmentReason::Refund).await?;
        order.transition(OrderStatus::Refunded, Utc::now())?;
        let saved = self.save_with_compensation(&order, &applied).await?;
        info!(order_id = %saved.id, restored_lines = applied.len(), "Order refunded");
        Ok(saved)
    }

    /// Give back the order's stock if it holds any.
    async fn release_stock(
        &self,
        order: &mut Order,
        reason: AdjustmentReason,
    ) -> Result<Vec<InventoryAdjustment>, CommerceError> {
        if !order.stock_committed {
            return Ok(Vec::new());
        }
        let batch = StockBatch::new(order.stock_restorations(), reason)
            .with_reference(order.id.as_str())
            .skipping_missing();
        let applied = self.ledger.apply(batch).await?;
        order.stock_committed = false;
        Ok(applied)
    }

    /// Save the order; if the save fails, undo the stock batch applied for it.
    async fn save_with_compensation(
        &self,
        order: &Order,
        applied: &[InventoryAdjustment],
    ) -> Result<Order, CommerceError> {
        match self.orders.save_order(order).await {
            Ok(saved) => Ok(saved),
            Err(err) => {
                if !applied.is_empty() {
                    let undo = StockBatch::compensation(applied, Some(order.id.to_string()));
                    match self.ledger.apply(undo).await {
                        Ok(_) => warn!(order_id = %order.id, error = %err, "Order save failed, stock change reversed"),
                        Err(undo_err) => error!(
                            order_id = %order.id,
                            error = %err,
                            undo_error = %undo_err,
                            "Order save failed and stock change could not be reversed"
                        ),
                    }
                }
                Err(err)
            }
        }
    }
}
