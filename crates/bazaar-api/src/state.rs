//! Shared handler state.

use std::sync::Arc;

use bazaar_auth::TokenIssuer;
use bazaar_commerce::cart::CartService;
use bazaar_commerce::catalog::CatalogService;
use bazaar_commerce::checkout::OrderWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub carts: Arc<CartService>,
    pub orders: Arc<OrderWorkflow>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(
        catalog: CatalogService,
        carts: CartService,
        orders: OrderWorkflow,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            carts: Arc::new(carts),
            orders: Arc::new(orders),
            tokens: Arc::new(tokens),
        }
    }
}
