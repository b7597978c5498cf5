//! Product and variant types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Maximum length of a product title.
pub const MAX_TITLE_LEN: usize = 100;

/// A (size, color) combination of a product, the unit of stock tracking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantKey {
    /// Size label (e.g., "M").
    pub size: String,
    /// Color label (e.g., "Red").
    pub color: String,
}

impl VariantKey {
    pub fn new(size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            color: color.into(),
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.size, self.color)
    }
}

/// A sellable variant and its stock counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Size label.
    pub size: String,
    /// Color label.
    pub color: String,
    /// Stock keeping unit, unique within the product.
    pub sku: String,
    /// Units available for sale. Never negative.
    pub stock: i64,
}

impl ProductVariant {
    pub fn new(key: VariantKey, sku: impl Into<String>, stock: i64) -> Self {
        Self {
            size: key.size,
            color: key.color,
            sku: sku.into(),
            stock,
        }
    }

    /// The variant's (size, color) key.
    pub fn key(&self) -> VariantKey {
        VariantKey::new(self.size.clone(), self.color.clone())
    }

    /// Whether this variant matches the given key.
    pub fn matches(&self, key: &VariantKey) -> bool {
        self.size == key.size && self.color == key.color
    }

    /// Check if a specific quantity is available.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// A product image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Public URL.
    pub url: String,
    /// Identifier at the media host.
    #[serde(default)]
    pub public_id: String,
    /// Whether this is the main image.
    #[serde(default)]
    pub is_main: bool,
}

/// A product in the catalog. Owns the stock counters of its variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Brand name.
    #[serde(default)]
    pub brand: String,
    /// Category name (e.g., "Outerwear").
    #[serde(default)]
    pub category: String,
    /// List price.
    pub price: Money,
    /// Sale price; only honoured when strictly between zero and `price`.
    #[serde(default)]
    pub discount_price: Option<Money>,
    /// Variants with their stock counters.
    pub variants: Vec<ProductVariant>,
    /// Images; the first is used in cart and order snapshots.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Creation time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with no variants.
    pub fn new(title: impl Into<String>, price: Money) -> Self {
        let title = title.into();
        Self {
            id: ProductId::generate(),
            slug: slugify(&title),
            title,
            description: String::new(),
            brand: String::new(),
            category: String::new(),
            price,
            discount_price: None,
            variants: Vec::new(),
            images: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Builder-style variant addition.
    pub fn with_variant(mut self, key: VariantKey, sku: impl Into<String>, stock: i64) -> Self {
        self.variants.push(ProductVariant::new(key, sku, stock));
        self
    }

    /// Builder-style category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder-style image.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        let is_main = self.images.is_empty();
        self.images.push(ProductImage {
            url: url.into(),
            public_id: String::new(),
            is_main,
        });
        self
    }

    /// The price a customer pays: the discount price when it is a real discount.
    pub fn final_price(&self) -> Money {
        match self.discount_price {
            Some(discount)
                if discount.is_positive() && discount.amount_minor < self.price.amount_minor =>
            {
                discount
            }
            _ => self.price,
        }
    }

    /// Find a variant by key.
    pub fn variant(&self, key: &VariantKey) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.matches(key))
    }

    /// Find a variant by key, mutably.
    pub fn variant_mut(&mut self, key: &VariantKey) -> Option<&mut ProductVariant> {
        self.variants.iter_mut().find(|v| v.matches(key))
    }

    /// URL of the main image, falling back to the first image.
    pub fn main_image(&self) -> Option<&str> {
        self.images
            .iter()
            .find(|i| i.is_main)
            .or_else(|| self.images.first())
            .map(|i| i.url.as_str())
    }

    /// Sum of stock across variants.
    pub fn total_stock(&self) -> i64 {
        self.variants.iter().map(|v| v.stock).sum()
    }

    /// Validate the product before it is stored.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CommerceError::ValidationError("product title is required".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(CommerceError::ValidationError(format!(
                "product title cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }
        if !self.price.is_positive() {
            return Err(CommerceError::ValidationError("price must be positive".into()));
        }
        if let Some(discount) = self.discount_price {
            if discount.currency != self.price.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.price.currency.code().to_string(),
                    got: discount.currency.code().to_string(),
                });
            }
        }
        if self.variants.is_empty() {
            return Err(CommerceError::ValidationError(
                "product needs at least one variant".into(),
            ));
        }

        let mut keys = HashSet::new();
        let mut skus = HashSet::new();
        for variant in &self.variants {
            if variant.stock < 0 {
                return Err(CommerceError::ValidationError(format!(
                    "stock for {} cannot be negative",
                    variant.key()
                )));
            }
            if variant.sku.trim().is_empty() {
                return Err(CommerceError::ValidationError(format!(
                    "variant {} needs a sku",
                    variant.key()
                )));
            }
            if !keys.insert(variant.key()) {
                return Err(CommerceError::ValidationError(format!(
                    "duplicate variant {}",
                    variant.key()
                )));
            }
            if !skus.insert(variant.sku.as_str()) {
                return Err(CommerceError::ValidationError(format!(
                    "duplicate sku {}",
                    variant.sku
                )));
            }
        }
        Ok(())
    }

    /// Fail with `CurrencyMismatch` unless the product is priced in the
    /// store currency.
    pub fn ensure_currency(&self, currency: Currency) -> Result<(), CommerceError> {
        let prices = std::iter::once(&self.price).chain(self.discount_price.as_ref());
        for price in prices {
            if price.currency != currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: price.currency.code().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Lowercase, alphanumeric words joined by '-'.
pub fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn hoodie() -> Product {
        Product::new("Heavy Hoodie", Money::from_major(2499, Currency::INR))
            .with_variant(VariantKey::new("M", "Black"), "HH-M-BLK", 5)
            .with_variant(VariantKey::new("L", "Black"), "HH-L-BLK", 3)
    }

    #[test]
    fn test_product_creation() {
        let product = hoodie();
        assert_eq!(product.slug, "heavy-hoodie");
        assert_eq!(product.total_stock(), 8);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_final_price_uses_real_discount_only() {
        let mut product = hoodie();
        assert_eq!(product.final_price(), product.price);

        product.discount_price = Some(Money::from_major(1999, Currency::INR));
        assert_eq!(product.final_price().amount_minor, 199_900);

        product.discount_price = Some(Money::from_major(2999, Currency::INR));
        assert_eq!(product.final_price(), product.price);

        product.discount_price = Some(Money::zero(Currency::INR));
        assert_eq!(product.final_price(), product.price);
    }

    #[test]
    fn test_variant_lookup() {
        let product = hoodie();
        let key = VariantKey::new("L", "Black");
        assert_eq!(product.variant(&key).unwrap().sku, "HH-L-BLK");
        assert!(product.variant(&VariantKey::new("S", "Black")).is_none());
    }

    #[test]
    fn test_validation_rejects_duplicates() {
        let product = hoodie().with_variant(VariantKey::new("M", "Black"), "HH-M-2", 1);
        assert!(product.validate().is_err());

        let product = hoodie().with_variant(VariantKey::new("S", "Black"), "HH-M-BLK", 1);
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_negative_stock() {
        let product = hoodie().with_variant(VariantKey::new("S", "Black"), "HH-S-BLK", -1);
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_ensure_currency() {
        let product = hoodie();
        assert!(product.ensure_currency(Currency::INR).is_ok());
        assert!(matches!(
            product.ensure_currency(Currency::USD),
            Err(CommerceError::CurrencyMismatch { .. })
        ));

        let mut discounted = hoodie();
        discounted.discount_price = Some(Money::from_major(10, Currency::USD));
        assert!(discounted.ensure_currency(Currency::INR).is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Oversized Tee (Washed)  "), "oversized-tee-washed");
    }
}
