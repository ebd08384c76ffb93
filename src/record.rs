//! The sale record domain model and helpers derived from a record set.

use time::Date;

/// One normalized sales transaction line.
///
/// Records are produced by the [loader](crate::loader), which guarantees that
/// `amount` equals `quantity * price` and that `date` parsed successfully.
/// The aggregation pipeline trusts both invariants and never recomputes them.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    /// Unique identifier, opaque to the pipeline.
    pub id: String,
    /// Product display name.
    pub product: String,
    /// Category name, treated as an opaque string for grouping.
    pub category: String,
    /// Calendar date of the sale (day granularity).
    pub date: Date,
    /// Number of units sold.
    pub quantity: u32,
    /// Unit price.
    pub price: f64,
    /// Total line revenue, derived upstream as `quantity * price`.
    pub amount: f64,
    /// The purchasing customer. `None` means the customer is unknown and the
    /// record is excluded from distinct-customer counts.
    pub customer: Option<String>,
}

/// Returns the unique categories present in `records`, sorted alphabetically.
///
/// Used to populate the category select in the filter bar. The "All" sentinel
/// is not included here; callers prepend it where needed.
pub fn unique_categories(records: &[SaleRecord]) -> Vec<String> {
    let mut categories: Vec<String> = records
        .iter()
        .map(|record| record.category.clone())
        .collect();
    categories.sort_unstable();
    categories.dedup();
    categories
}

/// Returns the earliest and latest sale dates in `records`, or `None` when
/// the record set is empty.
pub fn date_bounds(records: &[SaleRecord]) -> Option<(Date, Date)> {
    let first = records.iter().map(|record| record.date).min()?;
    let last = records.iter().map(|record| record.date).max()?;
    Some((first, last))
}
