//! Filtering of sale records by free-text search, category, and date range.

use time::Date;

use crate::record::SaleRecord;

/// The category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// The filter settings held by the filter bar.
///
/// Inactive predicates (empty search, the "All" category, an unset date
/// bound) are skipped; a record must pass every active predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Case-insensitive substring query matched against product, category,
    /// and customer.
    pub search: String,
    /// Exact category to match, or [ALL_CATEGORIES] for no constraint.
    pub category: String,
    /// Inclusive lower date bound. `None` means unbounded.
    pub date_from: Option<Date>,
    /// Inclusive upper date bound. `None` means unbounded.
    pub date_to: Option<Date>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL_CATEGORIES.to_owned(),
            date_from: None,
            date_to: None,
        }
    }
}

impl FilterState {
    /// Whether any predicate is active.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || self.category != ALL_CATEGORIES
            || self.date_from.is_some()
            || self.date_to.is_some()
    }
}

/// Returns the records that pass every active predicate in `filters`.
///
/// The input order is preserved; records are only removed, never reordered.
/// An inverted date range (`date_from` after `date_to`) yields the empty
/// intersection rather than an error.
pub fn filter_records(records: &[SaleRecord], filters: &FilterState) -> Vec<SaleRecord> {
    records
        .iter()
        .filter(|record| matches_filters(record, filters))
        .cloned()
        .collect()
}

fn matches_filters(record: &SaleRecord, filters: &FilterState) -> bool {
    if !filters.search.is_empty() {
        let query = filters.search.to_lowercase();
        let customer = record
            .customer
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();

        let matches_search = record.product.to_lowercase().contains(&query)
            || record.category.to_lowercase().contains(&query)
            || customer.contains(&query);

        if !matches_search {
            return false;
        }
    }

    if filters.category != ALL_CATEGORIES && record.category != filters.category {
        return false;
    }

    if let Some(from) = filters.date_from {
        if record.date < from {
            return false;
        }
    }

    if let Some(to) = filters.date_to {
        if record.date > to {
            return false;
        }
    }

    true
}
