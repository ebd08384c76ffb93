//! Revenue rankings by category and by product, plus the recent sales list.

use std::collections::HashMap;

use crate::record::SaleRecord;

/// How many products the top-products ranking shows by default.
pub const DEFAULT_TOP_PRODUCTS: usize = 5;

/// How many entries the recent sales list shows.
pub const RECENT_SALES_COUNT: usize = 5;

/// Total revenue attributed to one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRevenue {
    /// Category name as it appears on the records.
    pub name: String,
    /// Summed revenue for the category.
    pub value: f64,
}

/// Aggregated sales figures for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    /// Product display name.
    pub product: String,
    /// Summed revenue across all of the product's records.
    pub total_revenue: f64,
    /// Summed unit count across all of the product's records.
    pub total_sold: u32,
    /// The category from the product's most recent record in input order.
    pub category: String,
}

/// Sums revenue per category, sorted by revenue descending.
///
/// Categories that tie on revenue keep their first-appearance order, so the
/// ranking is stable across repeated calls on the same input.
pub fn aggregate_by_category(records: &[SaleRecord]) -> Vec<CategoryRevenue> {
    let mut totals: Vec<CategoryRevenue> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index_by_name.get(record.category.as_str()) {
            Some(&index) => totals[index].value += record.amount,
            None => {
                index_by_name.insert(&record.category, totals.len());
                totals.push(CategoryRevenue {
                    name: record.category.clone(),
                    value: record.amount,
                });
            }
        }
    }

    totals.sort_by(|a, b| b.value.total_cmp(&a.value));
    totals
}

/// Sums revenue and unit counts per product, sorted by revenue descending
/// and truncated to the top `limit`.
///
/// Ties keep first-appearance order. Each product reports the category of
/// its last record in input order.
pub fn aggregate_by_product(records: &[SaleRecord], limit: usize) -> Vec<ProductStats> {
    let mut stats: Vec<ProductStats> = Vec::new();
    let mut index_by_product: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match index_by_product.get(record.product.as_str()) {
            Some(&index) => {
                let entry = &mut stats[index];
                entry.total_revenue += record.amount;
                entry.total_sold += record.quantity;
                entry.category = record.category.clone();
            }
            None => {
                index_by_product.insert(&record.product, stats.len());
                stats.push(ProductStats {
                    product: record.product.clone(),
                    total_revenue: record.amount,
                    total_sold: record.quantity,
                    category: record.category.clone(),
                });
            }
        }
    }

    stats.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    stats.truncate(limit);
    stats
}

/// The `limit` most recent sales, newest first.
pub fn recent_sales(records: &[SaleRecord], limit: usize) -> Vec<SaleRecord> {
    let mut sorted: Vec<SaleRecord> = records.to_vec();
    sorted.sort_by_key(|record| std::cmp::Reverse(record.date));
    sorted.truncate(limit);
    sorted
}
