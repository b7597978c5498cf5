//! Admin dashboard figures.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::catalog::Product;
use crate::checkout::{Order, OrderStatus};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Products with less total stock than this are flagged.
pub const LOW_STOCK_PRODUCT_THRESHOLD: i64 = 20;
/// Variants with less stock than this are flagged.
pub const LOW_STOCK_VARIANT_THRESHOLD: i64 = 5;
/// Number of best sellers reported.
pub const TOP_PRODUCTS_LIMIT: usize = 10;
/// Days covered by the sales graph.
pub const SALES_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    /// Sum of totals over orders not cancelled, returned or refunded.
    pub total_revenue: Money,
    pub total_orders: usize,
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
    pub total_products: usize,
    pub total_stock: i64,
    pub low_stock_products: usize,
    pub sales_last_7_days: Vec<DailySales>,
    pub category_sales: Vec<CategorySales>,
    pub top_products: Vec<TopProduct>,
    pub low_stock_variants: Vec<LowStockVariant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sales: Money,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: String,
    pub units: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub title: String,
    pub image: Option<String>,
    pub units_sold: i64,
    pub revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockVariant {
    pub product_id: ProductId,
    pub title: String,
    pub size: String,
    pub color: String,
    pub sku: String,
    pub stock: i64,
}

impl AdminStats {
    /// Compute every figure from a snapshot of orders and products.
    pub fn compute(
        orders: &[Order],
        products: &[Product],
        currency: Currency,
        now: DateTime<Utc>,
    ) -> Result<Self, CommerceError> {
        let counted: Vec<&Order> = orders
            .iter()
            .filter(|o| o.status.counts_as_revenue())
            .collect();

        let total_revenue =
            Money::try_sum(counted.iter().map(|o| &o.totals().total_price), currency)?;

        let mut orders_by_status = BTreeMap::new();
        for order in orders {
            *orders_by_status.entry(order.status).or_insert(0) += 1;
        }

        let window_start = now - Duration::days(SALES_WINDOW_DAYS);
        let mut by_day: BTreeMap<NaiveDate, (Money, usize)> = BTreeMap::new();
        for order in counted.iter().filter(|o| o.created_at >= window_start) {
            let day = by_day
                .entry(order.created_at.date_naive())
                .or_insert((Money::zero(currency), 0));
            day.0 = day.0.try_add(&order.total_price())?;
            day.1 += 1;
        }
        let sales_last_7_days = by_day
            .into_iter()
            .map(|(date, (sales, orders))| DailySales { date, sales, orders })
            .collect();

        let catalog: HashMap<&ProductId, &Product> = products.iter().map(|p| (&p.id, p)).collect();
        let mut categories: BTreeMap<String, (i64, Money)> = BTreeMap::new();
        for item in counted.iter().flat_map(|o| o.items()) {
            let Some(product) = catalog.get(&item.product_id) else {
                continue;
            };
            let name = if product.category.is_empty() {
                "Uncategorized".to_string()
            } else {
                product.category.clone()
            };
            let entry = categories.entry(name).or_insert((0, Money::zero(currency)));
            entry.0 += item.quantity;
            entry.1 = entry.1.try_add(&item.line_total()?)?;
        }
        let category_sales = categories
            .into_iter()
            .map(|(category, (units, revenue))| CategorySales {
                category,
                units,
                revenue,
            })
            .collect();

        let top_products = top_products(orders, currency)?;

        let low_stock_variants = products
            .iter()
            .flat_map(|p| {
                p.variants
                    .iter()
                    .filter(|v| v.stock < LOW_STOCK_VARIANT_THRESHOLD)
                    .map(move |v| LowStockVariant {
                        product_id: p.id.clone(),
                        title: p.title.clone(),
                        size: v.size.clone(),
                        color: v.color.clone(),
                        sku: v.sku.clone(),
                        stock: v.stock,
                    })
            })
            .collect();

        Ok(Self {
            total_revenue,
            total_orders: orders.len(),
            orders_by_status,
            total_products: products.len(),
            total_stock: products.iter().map(Product::total_stock).sum(),
            low_stock_products: products
                .iter()
                .filter(|p| p.total_stock() < LOW_STOCK_PRODUCT_THRESHOLD)
                .count(),
            sales_last_7_days,
            category_sales,
            top_products,
            low_stock_variants,
        })
    }
}

/// Best sellers by units over sold orders; ties broken by product ID.
fn top_products(orders: &[Order], currency: Currency) -> Result<Vec<TopProduct>, CommerceError> {
    let mut sold: HashMap<&ProductId, TopProduct> = HashMap::new();
    for item in orders
        .iter()
        .filter(|o| o.status.is_sold())
        .flat_map(|o| o.items())
    {
        let entry = sold.entry(&item.product_id).or_insert_with(|| TopProduct {
            product_id: item.product_id.clone(),
            title: item.title.clone(),
            image: item.image.clone(),
            units_sold: 0,
            revenue: Money::zero(currency),
        });
        entry.units_sold += item.quantity;
        entry.revenue = entry.revenue.try_add(&item.line_total()?)?;
    }

    let mut ranked: Vec<TopProduct> = sold.into_values().collect();
    ranked.sort_by(|a, b| {
        b.units_sold
            .cmp(&a.units_sold)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    ranked.truncate(TOP_PRODUCTS_LIMIT);
    Ok(ranked)
}
