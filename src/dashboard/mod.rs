//! Dashboard module
//!
//! Provides the sales analytics overview page: trend metric cards, revenue
//! charts, product and category rankings, and the filtered sales table.
//! The aggregation submodules are pure functions over loaded sale records.

pub mod aggregation;
mod cards;
mod charts;
mod handlers;
pub mod metrics;
pub mod ranking;
mod tables;

pub use handlers::{
    DashboardQuery, SortDirection, SortField, TimeRange, get_dashboard_content,
    get_dashboard_page,
};
