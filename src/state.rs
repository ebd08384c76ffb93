//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use crate::{
    filter::ALL_CATEGORIES,
    record::{SaleRecord, unique_categories},
};

/// The state of the web server.
///
/// The record set is immutable once loaded; handlers share it by reference
/// count and run the aggregation pipeline over it per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The sale records produced by the data loader.
    pub records: Arc<Vec<SaleRecord>>,

    /// The category options for the filter bar: "All" followed by every
    /// category present in the records, sorted alphabetically.
    pub categories: Arc<Vec<String>>,
}

impl AppState {
    /// Create a new [AppState] from a loaded record set.
    pub fn new(records: Vec<SaleRecord>) -> Self {
        let mut categories = vec![ALL_CATEGORIES.to_owned()];
        categories.extend(unique_categories(&records));

        Self {
            records: Arc::new(records),
            categories: Arc::new(categories),
        }
    }
}
