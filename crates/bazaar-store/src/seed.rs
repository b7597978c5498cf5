//! Catalog seeding from a JSON product list.

use std::path::Path;
use tracing::info;

use bazaar_commerce::catalog::Product;
use bazaar_commerce::Currency;

use crate::{MemoryStore, StoreError};

/// Parse a JSON array of products priced in `currency`.
pub fn parse_catalog(json: &str, currency: Currency) -> Result<Vec<Product>, StoreError> {
    let products: Vec<Product> = serde_json::from_str(json)?;
    for product in &products {
        product.validate()?;
        product.ensure_currency(currency)?;
    }
    Ok(products)
}

/// Read and parse a catalog file.
pub async fn load_catalog(path: &Path, currency: Currency) -> Result<Vec<Product>, StoreError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
    parse_catalog(&json, currency)
}

impl MemoryStore {
    /// Load a catalog file into the store. Every product must be priced in
    /// `currency`.
    pub async fn seed_from_file(&self, path: &Path, currency: Currency) -> Result<usize, StoreError> {
        let products = load_catalog(path, currency).await?;
        let count = self.seed(products).await?;
        info!(path = %path.display(), products = count, currency = currency.code(), "Catalog seeded");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::repository::ProductRepository;

    const CATALOG: &str = r#"[
        {
            "id": "hoodie-01",
            "title": "Heavy Hoodie",
            "slug": "heavy-hoodie",
            "category": "Outerwear",
            "price": { "amount_minor": 249900, "currency": "INR" },
            "discount_price": { "amount_minor": 199900, "currency": "INR" },
            "variants": [
                { "size": "M", "color": "Black", "sku": "HH-M-BLK", "stock": 12 },
                { "size": "L", "color": "Black", "sku": "HH-L-BLK", "stock": 4 }
            ],
            "images": [{ "url": "https://cdn.example.com/hoodie.jpg" }]
        }
    ]"#;

    #[tokio::test]
    async fn test_seed_catalog() {
        let store = MemoryStore::new();
        let count = store
            .seed(parse_catalog(CATALOG, Currency::INR).unwrap())
            .await
            .unwrap();
        assert_eq!(count, 1);

        let products = store.list_products().await.unwrap();
        assert_eq!(products[0].final_price().amount_minor, 199_900);
        assert_eq!(products[0].total_stock(), 16);
        assert_eq!(products[0].main_image(), Some("https://cdn.example.com/hoodie.jpg"));
    }

    #[test]
    fn test_invalid_catalog_rejected() {
        assert!(parse_catalog("{", Currency::INR).is_err());
        let no_variants = r#"[{
            "id": "p1", "title": "Cap", "slug": "cap",
            "price": { "amount_minor": 100, "currency": "INR" },
            "variants": []
        }]"#;
        assert!(matches!(
            parse_catalog(no_variants, Currency::INR),
            Err(StoreError::Invalid(_))
        ));
    }

    #[test]
    fn test_foreign_currency_rejected() {
        let err = parse_catalog(CATALOG, Currency::USD).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invalid(bazaar_commerce::CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_seed_from_file() {
        let path = std::env::temp_dir().join(format!("bazaar-seed-{}.json", std::process::id()));
        tokio::fs::write(&path, CATALOG).await.unwrap();

        let store = MemoryStore::new();
        assert_eq!(store.seed_from_file(&path, Currency::INR).await.unwrap(), 1);
        assert!(store.seed_from_file(&path, Currency::USD).await.is_err());
        assert_eq!(store.list_products().await.unwrap().len(), 1);

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(
            store.seed_from_file(&path, Currency::INR).await,
            Err(StoreError::Io { .. })
        ));
    }
}
