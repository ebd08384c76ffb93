//! Trend metrics comparing the last 30 days of sales against the 30 days
//! before that.

use std::collections::HashSet;

use time::{Date, Duration};

use crate::record::SaleRecord;

/// Direction of a metric's movement between the two comparison windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// The metric held steady or grew.
    Up,
    /// The metric shrank.
    Down,
}

/// A headline metric with its change against the previous 30-day window.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// The metric's value over the current window.
    pub current: f64,
    /// Absolute percent change against the previous window.
    pub change: f64,
    /// Whether the metric moved up or down.
    pub trend: Trend,
}

/// The four headline metrics shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendMetrics {
    /// Total revenue.
    pub revenue: Metric,
    /// Number of orders.
    pub orders: Metric,
    /// Average revenue per order.
    pub avg_order_value: Metric,
    /// Number of distinct named customers.
    pub customers: Metric,
}

/// Computes the four headline metrics for `records` as of `today`.
///
/// The current window is the inclusive 30 days ending at `today`; the
/// previous window is the 30 days before that, excluding the shared boundary
/// day. Passing the reference date in keeps the result stable for a given
/// input, so every metric on one dashboard render agrees on "now".
pub fn compute_trend_metrics(records: &[SaleRecord], today: Date) -> TrendMetrics {
    let window_start = today - Duration::days(30);
    let previous_start = today - Duration::days(60);

    let current: Vec<&SaleRecord> = records
        .iter()
        .filter(|record| record.date >= window_start && record.date <= today)
        .collect();
    let previous: Vec<&SaleRecord> = records
        .iter()
        .filter(|record| record.date >= previous_start && record.date < window_start)
        .collect();

    TrendMetrics {
        revenue: metric(total_revenue(&current), total_revenue(&previous)),
        orders: metric(current.len() as f64, previous.len() as f64),
        avg_order_value: metric(average_order_value(&current), average_order_value(&previous)),
        customers: metric(
            distinct_customers(&current) as f64,
            distinct_customers(&previous) as f64,
        ),
    }
}

/// Percent change from `previous` to `current`, or 0 when there is no
/// previous value to compare against.
///
/// Returning 0 for an empty baseline keeps the result finite; a division by
/// zero here would surface as NaN in every downstream formatter.
pub fn safe_percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

fn metric(current: f64, previous: f64) -> Metric {
    let change = safe_percent_change(current, previous);
    Metric {
        current,
        change: change.abs(),
        trend: if change >= 0.0 { Trend::Up } else { Trend::Down },
    }
}

fn total_revenue(records: &[&SaleRecord]) -> f64 {
    records.iter().map(|record| record.amount).sum()
}

fn average_order_value(records: &[&SaleRecord]) -> f64 {
    if records.is_empty() {
        0.0
    } else {
        total_revenue(records) / records.len() as f64
    }
}

fn distinct_customers(records: &[&SaleRecord]) -> usize {
    records
        .iter()
        .filter_map(|record| record.customer.as_deref())
        .filter(|customer| !customer.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::record::test_utils::{create_test_record, record_on};

    use super::{Trend, compute_trend_metrics, safe_percent_change};

    const TODAY: time::Date = date!(2024 - 03 - 31);

    #[test]
    fn doubled_revenue_reports_one_hundred_percent_up() {
        // 1000 in the current window, 500 in the previous one.
        let records = vec![
            record_on(date!(2024 - 03 - 15), 600.0),
            record_on(date!(2024 - 03 - 20), 400.0),
            record_on(date!(2024 - 02 - 10), 500.0),
        ];

        let metrics = compute_trend_metrics(&records, TODAY);

        assert_eq!(metrics.revenue.current, 1000.0);
        assert_eq!(metrics.revenue.change, 100.0);
        assert_eq!(metrics.revenue.trend, Trend::Up);
    }

    #[test]
    fn empty_previous_window_reports_zero_change() {
        let records = vec![record_on(date!(2024 - 03 - 15), 250.0)];

        let metrics = compute_trend_metrics(&records, TODAY);

        assert_eq!(metrics.revenue.change, 0.0);
        assert_eq!(metrics.revenue.trend, Trend::Up);
        assert_eq!(metrics.orders.change, 0.0);
        assert_eq!(metrics.avg_order_value.change, 0.0);
        assert_eq!(metrics.customers.change, 0.0);
    }

    #[test]
    fn decline_reports_absolute_change_with_down_trend() {
        let records = vec![
            record_on(date!(2024 - 03 - 15), 50.0),
            record_on(date!(2024 - 02 - 10), 200.0),
        ];

        let metrics = compute_trend_metrics(&records, TODAY);

        assert_eq!(metrics.revenue.change, 75.0);
        assert_eq!(metrics.revenue.trend, Trend::Down);
    }

    #[test]
    fn window_boundaries_split_at_thirty_days() {
        // Exactly 30 days back belongs to the current window, 31 days back to
        // the previous one, and 61 days back to neither.
        let records = vec![
            record_on(TODAY - time::Duration::days(30), 10.0),
            record_on(TODAY - time::Duration::days(31), 20.0),
            record_on(TODAY - time::Duration::days(61), 40.0),
        ];

        let metrics = compute_trend_metrics(&records, TODAY);

        assert_eq!(metrics.revenue.current, 10.0);
        assert_eq!(metrics.orders.current, 1.0);
        // Change computed against the 20.0 record only.
        assert_eq!(metrics.revenue.change, 50.0);
        assert_eq!(metrics.revenue.trend, Trend::Down);
    }

    #[test]
    fn customers_counts_distinct_named_customers_only() {
        let records = vec![
            create_test_record(
                "1",
                "A",
                "Sports",
                date!(2024 - 03 - 10),
                1,
                10.0,
                Some("Ada"),
            ),
            create_test_record(
                "2",
                "B",
                "Sports",
                date!(2024 - 03 - 11),
                1,
                10.0,
                Some("Ada"),
            ),
            create_test_record(
                "3",
                "C",
                "Sports",
                date!(2024 - 03 - 12),
                1,
                10.0,
                Some("Grace"),
            ),
            create_test_record("4", "D", "Sports", date!(2024 - 03 - 13), 1, 10.0, None),
        ];

        let metrics = compute_trend_metrics(&records, TODAY);

        assert_eq!(metrics.customers.current, 2.0);
    }

    #[test]
    fn average_order_value_of_no_orders_is_zero() {
        let metrics = compute_trend_metrics(&[], TODAY);

        assert_eq!(metrics.avg_order_value.current, 0.0);
        assert_eq!(metrics.avg_order_value.change, 0.0);
    }

    #[test]
    fn percent_change_never_divides_by_zero() {
        assert_eq!(safe_percent_change(100.0, 0.0), 0.0);
        assert_eq!(safe_percent_change(0.0, 0.0), 0.0);
        assert_eq!(safe_percent_change(150.0, 100.0), 50.0);
        assert_eq!(safe_percent_change(50.0, 100.0), -50.0);
    }
}
