//! Catalog service against the in-memory store.

use std::sync::Arc;

use bazaar_commerce::prelude::*;
use bazaar_store::MemoryStore;

fn medium() -> VariantKey {
    VariantKey::new("M", "Olive")
}

fn large() -> VariantKey {
    VariantKey::new("L", "Olive")
}

async fn setup() -> (Arc<MemoryStore>, CatalogService, ProductId) {
    let store = Arc::new(MemoryStore::new());
    let catalog = CatalogService::new(store.clone(), store.clone(), Currency::INR);
    let jacket = Product::new("Field Jacket", Money::from_major(3200, Currency::INR))
        .with_category("Outerwear")
        .with_variant(medium(), "FJ-M-O", 4)
        .with_variant(large(), "FJ-L-O", 2);
    let id = jacket.id.clone();
    catalog
        .create_product(&Principal::admin("root"), jacket)
        .await
        .unwrap();
    (store, catalog, id)
}

#[tokio::test]
async fn test_create_requires_admin_and_store_currency() {
    let (_, catalog, _) = setup().await;
    let tee = || {
        Product::new("Tee", Money::from_major(500, Currency::INR)).with_variant(medium(), "T-M", 1)
    };

    let err = catalog
        .create_product(&Principal::customer("alice"), tee())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "Forbidden");

    let dollars = Product::new("Tee", Money::from_major(5, Currency::USD)).with_variant(medium(), "T-M", 1);
    let err = catalog
        .create_product(&Principal::admin("root"), dollars)
        .await
        .unwrap_err();
    assert!(matches!(err, CommerceError::CurrencyMismatch { .. }));

    let created = catalog.create_product(&Principal::admin("root"), tee()).await.unwrap();
    let err = catalog
        .create_product(&Principal::admin("root"), created)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert_eq!(catalog.list_products().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_keeps_identity() {
    let (_, catalog, id) = setup().await;
    let original = catalog.product(&id).await.unwrap();

    let edited = Product::new("Field Jacket II", Money::from_major(2900, Currency::INR))
        .with_variant(medium(), "FJ-M-O", 4);
    let saved = catalog
        .update_product(&Principal::admin("root"), &id, edited)
        .await
        .unwrap();

    assert_eq!(saved.id, id);
    assert_eq!(saved.created_at, original.created_at);
    assert_eq!(catalog.product(&id).await.unwrap().title, "Field Jacket II");

    let err = catalog
        .update_product(&Principal::admin("root"), &ProductId::new("gone"), saved)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_update_stock_sets_levels_all_or_nothing() {
    let (store, catalog, id) = setup().await;
    let admin = Principal::admin("root");

    let product = catalog
        .update_stock(
            &admin,
            &id,
            vec![
                StockLevel { variant: medium(), stock: 10 },
                StockLevel { variant: large(), stock: 0 },
            ],
        )
        .await
        .unwrap();
    assert_eq!(product.variant(&medium()).unwrap().stock, 10);
    assert_eq!(product.variant(&large()).unwrap().stock, 0);

    let err = catalog
        .update_stock(
            &admin,
            &id,
            vec![
                StockLevel { variant: medium(), stock: 1 },
                StockLevel { variant: VariantKey::new("XL", "Olive"), stock: 1 },
            ],
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "NotFound");
    assert_eq!(store.available(&id, &medium()).await.unwrap(), 10);

    let err = catalog
        .update_stock(&admin, &id, vec![StockLevel { variant: medium(), stock: -1 }])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert!(catalog.update_stock(&admin, &id, Vec::new()).await.is_err());
}

#[tokio::test]
async fn test_adjust_stock_goes_through_ledger() {
    let (_, catalog, id) = setup().await;
    let admin = Principal::admin("root");

    assert_eq!(catalog.adjust_stock(&admin, &id, &large(), 5).await.unwrap(), 7);
    assert_eq!(catalog.adjust_stock(&admin, &id, &large(), -7).await.unwrap(), 0);

    let err = catalog.adjust_stock(&admin, &id, &large(), -1).await.unwrap_err();
    assert!(matches!(err, CommerceError::InsufficientStock { available: 0, .. }));
    assert!(catalog.adjust_stock(&admin, &id, &large(), 0).await.is_err());
    assert!(catalog
        .adjust_stock(&admin, &id, &large(), i64::MIN)
        .await
        .is_err());

    let err = catalog
        .adjust_stock(&Principal::customer("alice"), &id, &large(), 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "Forbidden");
}

#[tokio::test]
async fn test_stock_history_lists_corrections() {
    let (_, catalog, id) = setup().await;
    let admin = Principal::admin("root");
    catalog.adjust_stock(&admin, &id, &medium(), -1).await.unwrap();

    let history = catalog.stock_history(&admin, &id).await.unwrap();
    // two seeded variants, then the adjustment
    assert_eq!(history.len(), 3);
    let last = history.last().unwrap();
    assert_eq!(last.quantity_change, -1);
    assert_eq!(last.stock_after, 3);
    assert_eq!(last.reason, AdjustmentReason::Correction);

    let err = catalog
        .stock_history(&admin, &ProductId::new("gone"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
