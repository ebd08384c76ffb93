//! Card components for the dashboard's headline metrics.
//!
//! Renders the four trend metric cards (revenue, orders, average order
//! value, customers) with an arrow and percent change against the previous
//! 30-day window.

use maud::{Markup, html};

use crate::{
    dashboard::metrics::{Metric, Trend, TrendMetrics},
    html::{format_currency, format_currency_rounded},
};

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// Renders the grid of headline metric cards.
pub(super) fn metric_cards_view(metrics: &TrendMetrics) -> Markup {
    html! {
        section class="w-full mx-auto mb-4" {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4" {
                (metric_card("Total Revenue", format_currency(metrics.revenue.current), &metrics.revenue))
                (metric_card("Orders", format!("{:.0}", metrics.orders.current), &metrics.orders))
                (metric_card("Avg Order Value", format_currency_rounded(metrics.avg_order_value.current), &metrics.avg_order_value))
                (metric_card("Customers", format!("{:.0}", metrics.customers.current), &metrics.customers))
            }
        }
    }
}

/// Renders a single metric card with its trend indicator.
fn metric_card(title: &str, value: String, metric: &Metric) -> Markup {
    let (arrow, trend_style) = match metric.trend {
        Trend::Up => ("↑", "text-green-600 dark:text-green-400"),
        Trend::Down => ("↓", "text-red-600 dark:text-red-400"),
    };

    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-4 shadow-md
                   hover:shadow-lg transition-shadow"
        {
            h4 class="text-sm font-medium text-gray-600 dark:text-gray-400 mb-1" {
                (title)
            }

            div class="text-3xl font-bold mb-1" {
                (value)
            }

            div class={"text-sm font-medium " (trend_style)} {
                (arrow) " " (format_percentage(metric.change)) "%"
                span class="text-gray-600 dark:text-gray-400 font-normal" {
                    " vs previous 30 days"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_metrics() -> TrendMetrics {
        let up = Metric {
            current: 1000.0,
            change: 100.0,
            trend: Trend::Up,
        };
        let down = Metric {
            current: 12.0,
            change: 25.0,
            trend: Trend::Down,
        };

        TrendMetrics {
            revenue: up.clone(),
            orders: down,
            avg_order_value: up.clone(),
            customers: up,
        }
    }

    #[test]
    fn renders_all_four_cards() {
        let html = metric_cards_view(&test_metrics()).into_string();

        assert!(html.contains("Total Revenue"));
        assert!(html.contains("Orders"));
        assert!(html.contains("Avg Order Value"));
        assert!(html.contains("Customers"));
    }

    #[test]
    fn upward_trend_shows_up_arrow_in_green() {
        let html = metric_cards_view(&test_metrics()).into_string();

        assert!(html.contains("↑"));
        assert!(html.contains("text-green-600"));
    }

    #[test]
    fn downward_trend_shows_down_arrow_in_red() {
        let html = metric_cards_view(&test_metrics()).into_string();

        assert!(html.contains("↓"));
        assert!(html.contains("text-red-600"));
    }

    #[test]
    fn revenue_is_formatted_as_currency() {
        let html = metric_cards_view(&test_metrics()).into_string();

        assert!(html.contains("$1,000.00"));
    }

    #[test]
    fn format_percentage_avoids_negative_zero() {
        assert_eq!(format_percentage(0.0), "0");
        assert_eq!(format_percentage(-0.4), "0");
        assert_eq!(format_percentage(100.0), "100");
        assert_eq!(format_percentage(25.4), "25");
    }
}
