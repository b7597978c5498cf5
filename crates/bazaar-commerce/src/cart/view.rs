//! Cart contents resolved against the current catalog.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartEntry};
use crate::catalog::{Product, VariantKey};
use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use crate::money::{Currency, Money};

/// A cart ready for display: prices and stock are read at view time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartView {
    pub owner: UserId,
    pub lines: Vec<CartLine>,
    /// Sum of quantities over all entries.
    pub item_count: i64,
    /// Sum of line totals over resolvable entries.
    pub subtotal: Money,
}

/// One cart entry with its current product data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub variant: VariantKey,
    pub quantity: i64,
    /// False when the product or variant no longer exists.
    pub available: bool,
    pub title: Option<String>,
    pub image: Option<String>,
    pub unit_price: Option<Money>,
    pub line_total: Option<Money>,
    /// Current stock of the variant (0 when unavailable).
    pub available_stock: i64,
    /// Whether current stock covers the entry's quantity.
    pub in_stock: bool,
}

impl CartLine {
    fn resolve(entry: &CartEntry, product: Option<&Product>) -> Result<Self, CommerceError> {
        let variant = product.and_then(|p| p.variant(&entry.variant).map(|v| (p, v)));
        match variant {
            Some((product, variant)) => {
                let unit_price = product.final_price();
                Ok(Self {
                    product_id: entry.product_id.clone(),
                    variant: entry.variant.clone(),
                    quantity: entry.quantity,
                    available: true,
                    title: Some(product.title.clone()),
                    image: product.main_image().map(str::to_string),
                    unit_price: Some(unit_price),
                    line_total: Some(unit_price.try_multiply(entry.quantity)?),
                    available_stock: variant.stock,
                    in_stock: variant.can_fulfill(entry.quantity),
                })
            }
            None => Ok(Self {
                product_id: entry.product_id.clone(),
                variant: entry.variant.clone(),
                quantity: entry.quantity,
                available: false,
                title: product.map(|p| p.title.clone()),
                image: None,
                unit_price: None,
                line_total: None,
                available_stock: 0,
                in_stock: false,
            }),
        }
    }
}

impl CartView {
    /// Resolve every entry with `lookup`, keeping cart order.
    pub fn build<'a>(
        cart: &Cart,
        currency: Currency,
        lookup: impl Fn(&ProductId) -> Option<&'a Product>,
    ) -> Result<Self, CommerceError> {
        let lines = cart
            .entries
            .iter()
            .map(|entry| CartLine::resolve(entry, lookup(&entry.product_id)))
            .collect::<Result<Vec<_>, _>>()?;
        let subtotal = Money::try_sum(lines.iter().filter_map(|l| l.line_total.as_ref()), currency)?;

        Ok(Self {
            owner: cart.owner.clone(),
            item_count: cart.item_count(),
            lines,
            subtotal,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
