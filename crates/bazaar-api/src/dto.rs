//! Request and response bodies.
//!
//! Request field names follow the storefront client (`productId`,
//! `shippingInfo`, `razorpay_order_id`); responses use the domain types'
//! own serialization. Product prices are taken in minor units.

use serde::{Deserialize, Serialize};

use bazaar_commerce::cart::GuestEntry;
use bazaar_commerce::catalog::{Product, StockLevel, VariantKey};
use bazaar_commerce::checkout::{OrderStatus, PaymentConfirmation, ShippingInfo};
use bazaar_commerce::{CommerceError, Currency, Money, ProductId};

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantBody {
    pub size: String,
    pub color: String,
}

impl VariantBody {
    fn into_key(self) -> Result<VariantKey, CommerceError> {
        variant_key(self.size, self.color)
    }
}

fn variant_key(size: String, color: String) -> Result<VariantKey, CommerceError> {
    let (size, color) = (size.trim(), color.trim());
    if size.is_empty() || color.is_empty() {
        return Err(CommerceError::ValidationError(
            "variant size and color are required".into(),
        ));
    }
    Ok(VariantKey::new(size, color))
}

fn product_id(raw: String) -> Result<ProductId, CommerceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CommerceError::ValidationError("productId is required".into()));
    }
    Ok(ProductId::new(raw))
}

/// `POST /cart/add`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub variant: VariantBody,
    pub quantity: i64,
}

impl AddToCartRequest {
    pub fn into_parts(self) -> Result<(ProductId, VariantKey, i64), CommerceError> {
        if self.quantity < 1 {
            return Err(CommerceError::ValidationError(format!(
                "quantity must be at least 1, got {}",
                self.quantity
            )));
        }
        Ok((product_id(self.product_id)?, self.variant.into_key()?, self.quantity))
    }
}

/// `PATCH /cart/update`. A quantity of zero or less removes the entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub product_id: String,
    pub variant: VariantBody,
    pub quantity: i64,
}

impl UpdateCartItemRequest {
    pub fn into_parts(self) -> Result<(ProductId, VariantKey, i64), CommerceError> {
        Ok((product_id(self.product_id)?, self.variant.into_key()?, self.quantity))
    }
}

/// `DELETE /cart/remove`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

impl RemoveFromCartRequest {
    pub fn into_parts(self) -> Result<(ProductId, VariantKey), CommerceError> {
        Ok((product_id(self.product_id)?, variant_key(self.size, self.color)?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestCartItem {
    #[serde(alias = "productId")]
    pub product: String,
    pub variant: VariantBody,
    pub quantity: i64,
}

/// `POST /cart/merge`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCartRequest {
    #[serde(default)]
    pub guest_cart: Vec<GuestCartItem>,
}

impl MergeCartRequest {
    /// Entries without a product or variant are dropped here; quantity and
    /// availability are judged by the merge itself.
    pub fn into_entries(self) -> Vec<GuestEntry> {
        self.guest_cart
            .into_iter()
            .filter_map(|item| {
                let product_id = product_id(item.product).ok()?;
                let variant = item.variant.into_key().ok()?;
                Some(GuestEntry {
                    product_id,
                    variant,
                    quantity: item.quantity,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfoBody {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

/// `POST /orders/checkout`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_info: ShippingInfoBody,
}

impl CheckoutRequest {
    pub fn into_shipping_info(self) -> Result<ShippingInfo, CommerceError> {
        let body = self.shipping_info;
        let info = ShippingInfo::new(
            body.address.trim(),
            body.city.trim(),
            body.postal_code.trim(),
            body.country.trim(),
            body.phone.trim(),
        );
        info.validate()?;
        Ok(info)
    }
}

/// `POST /orders/payment-verification`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentVerificationRequest {
    #[serde(alias = "razorpay_order_id")]
    pub intent_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

impl PaymentVerificationRequest {
    pub fn into_confirmation(self) -> Result<PaymentConfirmation, CommerceError> {
        if [&self.intent_id, &self.payment_id, &self.signature]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(CommerceError::ValidationError(
                "intent id, payment id and signature are required".into(),
            ));
        }
        Ok(PaymentConfirmation {
            intent_id: self.intent_id,
            payment_id: self.payment_id,
            signature: self.signature,
        })
    }
}

/// `PATCH /orders/admin/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn status(&self) -> Result<OrderStatus, CommerceError> {
        self.status.trim().parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariantBody {
    pub size: String,
    pub color: String,
    pub sku: String,
    pub stock: i64,
}

/// `POST /products` and `PUT /products/{id}`. Prices are in minor units of
/// the store currency.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    pub price: i64,
    #[serde(default)]
    pub discount_price: Option<i64>,
    #[serde(default)]
    pub images: Vec<String>,
    pub variants: Vec<ProductVariantBody>,
}

impl ProductRequest {
    pub fn into_product(self, currency: Currency) -> Result<Product, CommerceError> {
        let mut product = Product::new(self.title.trim(), Money::new(self.price, currency))
            .with_category(self.category.trim());
        product.description = self.description;
        product.brand = self.brand.trim().to_string();
        product.discount_price = self.discount_price.map(|amount| Money::new(amount, currency));
        for url in self.images {
            product = product.with_image(url);
        }
        for variant in self.variants {
            let key = variant_key(variant.size, variant.color)?;
            product = product.with_variant(key, variant.sku.trim(), variant.stock);
        }
        product.validate()?;
        Ok(product)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockLevelBody {
    pub size: String,
    pub color: String,
    pub stock: i64,
}

/// `PATCH /products/{id}/stock`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStockRequest {
    pub variants: Vec<StockLevelBody>,
}

impl UpdateStockRequest {
    pub fn into_levels(self) -> Result<Vec<StockLevel>, CommerceError> {
        if self.variants.is_empty() {
            return Err(CommerceError::ValidationError(
                "please provide variants to update stock".into(),
            ));
        }
        self.variants
            .into_iter()
            .map(|level| {
                Ok(StockLevel {
                    variant: variant_key(level.size, level.color)?,
                    stock: level.stock,
                })
            })
            .collect()
    }
}

/// `POST /products/{id}/stock/adjust`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustStockRequest {
    pub size: String,
    pub color: String,
    pub delta: i64,
}

impl AdjustStockRequest {
    pub fn into_parts(self) -> Result<(VariantKey, i64), CommerceError> {
        Ok((variant_key(self.size, self.color)?, self.delta))
    }
}

/// Stock of one variant after an adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockResponse {
    pub product_id: ProductId,
    pub variant: VariantKey,
    pub stock: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_validation() {
        let body: AddToCartRequest = serde_json::from_str(
            r#"{"productId":"p1","variant":{"size":"M","color":"Red"},"quantity":2}"#,
        )
        .unwrap();
        let (id, variant, qty) = body.into_parts().unwrap();
        assert_eq!(id, ProductId::new("p1"));
        assert_eq!(variant, VariantKey::new("M", "Red"));
        assert_eq!(qty, 2);

        let zero: AddToCartRequest = serde_json::from_str(
            r#"{"productId":"p1","variant":{"size":"M","color":"Red"},"quantity":0}"#,
        )
        .unwrap();
        assert_eq!(zero.into_parts().unwrap_err().kind(), "ValidationError");

        let blank: AddToCartRequest = serde_json::from_str(
            r#"{"productId":" ","variant":{"size":"M","color":"Red"},"quantity":1}"#,
        )
        .unwrap();
        assert!(blank.into_parts().is_err());
    }

    #[test]
    fn test_merge_drops_malformed_entries() {
        let body: MergeCartRequest = serde_json::from_str(
            r#"{"guestCart":[
                {"product":"p1","variant":{"size":"M","color":"Red"},"quantity":3},
                {"productId":"p2","variant":{"size":"L","color":"Blue"},"quantity":1},
                {"product":"","variant":{"size":"M","color":"Red"},"quantity":1}
            ]}"#,
        )
        .unwrap();
        let entries = body.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].product_id, ProductId::new("p2"));

        let empty: MergeCartRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.into_entries().is_empty());
    }

    #[test]
    fn test_payment_field_aliases() {
        let body: PaymentVerificationRequest = serde_json::from_str(
            r#"{"razorpay_order_id":"order_1","razorpay_payment_id":"pay_1","razorpay_signature":"ab"}"#,
        )
        .unwrap();
        let confirmation = body.into_confirmation().unwrap();
        assert_eq!(confirmation.intent_id, "order_1");
        assert_eq!(confirmation.payment_id, "pay_1");
    }

    #[test]
    fn test_status_parse() {
        let ok = UpdateStatusRequest { status: "shipped".into() };
        assert_eq!(ok.status().unwrap(), OrderStatus::Shipped);
        let bad = UpdateStatusRequest { status: "lost".into() };
        assert!(bad.status().is_err());
    }

    #[test]
    fn test_product_request() {
        let body: ProductRequest = serde_json::from_str(
            r#"{"title":" Linen Shirt ","category":"Tops","price":149900,"discountPrice":129900,
                "images":["https://cdn.example.com/shirt.jpg"],
                "variants":[{"size":"M","color":"White","sku":"LS-M-W","stock":6}]}"#,
        )
        .unwrap();
        let product = body.into_product(Currency::INR).unwrap();
        assert_eq!(product.title, "Linen Shirt");
        assert_eq!(product.final_price().amount_minor, 129_900);
        assert_eq!(product.total_stock(), 6);
        assert_eq!(product.main_image(), Some("https://cdn.example.com/shirt.jpg"));

        let no_variants: ProductRequest =
            serde_json::from_str(r#"{"title":"Cap","price":100,"variants":[]}"#).unwrap();
        assert_eq!(
            no_variants.into_product(Currency::INR).unwrap_err().kind(),
            "ValidationError"
        );
    }

    #[test]
    fn test_stock_request_validation() {
        let body: UpdateStockRequest = serde_json::from_str(
            r#"{"variants":[{"size":"M","color":"White","stock":9}]}"#,
        )
        .unwrap();
        let levels = body.into_levels().unwrap();
        assert_eq!(levels[0].variant, VariantKey::new("M", "White"));
        assert_eq!(levels[0].stock, 9);

        let empty: UpdateStockRequest = serde_json::from_str(r#"{"variants":[]}"#).unwrap();
        assert!(empty.into_levels().is_err());

        let blank = AdjustStockRequest {
            size: "".into(),
            color: "White".into(),
            delta: 1,
        };
        assert!(blank.into_parts().is_err());
    }

    #[test]
    fn test_checkout_requires_address() {
        let body: CheckoutRequest = serde_json::from_str(
            r#"{"shippingInfo":{"address":"","city":"Delhi","postalCode":"110001","country":"India","phone":"9999999999"}}"#,
        )
        .unwrap();
        assert_eq!(body.into_shipping_info().unwrap_err().kind(), "ValidationError");
    }
}
