//! Chart generation and rendering for the dashboard.
//!
//! Builds two ECharts visualizations from the aggregation pipeline's output:
//! - **Revenue Over Time**: bar chart of bucketed revenue (week/month/quarter)
//! - **Revenue by Category**: donut chart of per-category revenue
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::{aggregation::ChartPoint, ranking::CategoryRevenue},
    html::HeadElement,
};

/// The chart slice color for a category, with a gray fallback for categories
/// outside the known set.
fn category_color(category: &str) -> &'static str {
    match category {
        "Electronics" => "#3B82F6",
        "Clothing" => "#10B981",
        "Food & Beverage" => "#F59E0B",
        "Home & Garden" => "#8B5CF6",
        "Sports" => "#EC4899",
        _ => "#6B7280",
    }
}

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
fn init_script(charts: &[DashboardChart]) -> String {
    charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The chart initialization script for the initial full-page render.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        init_script(charts)
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// The chart initialization script as inline markup for htmx partial swaps.
///
/// htmx executes script elements in swapped content, so the partial carries
/// its own initialization rather than relying on the head script, which only
/// runs on the initial page load.
pub(super) fn charts_inline_script(charts: &[DashboardChart]) -> Markup {
    html!( script { (PreEscaped(init_script(charts))) } )
}

pub(super) fn revenue_chart(points: &[ChartPoint], subtitle: &str) -> Chart {
    let labels: Vec<String> = points.iter().map(|point| point.date.clone()).collect();
    let values: Vec<f64> = points.iter().map(|point| point.revenue).collect();

    Chart::new()
        .title(Title::new().text("Revenue Over Time").subtext(subtitle))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Revenue").data(values))
}

pub(super) fn category_chart(categories: &[CategoryRevenue]) -> Chart {
    let palette: Vec<Color> = categories
        .iter()
        .map(|category| Color::from(category_color(&category.name)))
        .collect();
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|category| (category.value, category.name.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Revenue by Category"))
        .color(palette)
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .series(
            Pie::new()
                .name("Revenue")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::dashboard::{aggregation::ChartPoint, ranking::CategoryRevenue};

    use super::{
        DashboardChart, category_chart, category_color, charts_inline_script, revenue_chart,
    };

    #[test]
    fn known_categories_have_fixed_colors() {
        assert_eq!(category_color("Electronics"), "#3B82F6");
        assert_eq!(category_color("Sports"), "#EC4899");
    }

    #[test]
    fn unknown_categories_fall_back_to_gray() {
        assert_eq!(category_color("Stationery"), "#6B7280");
    }

    #[test]
    fn revenue_chart_serializes_labels_in_order() {
        let points = vec![
            ChartPoint {
                date: "Jan 2024".to_owned(),
                revenue: 100.0,
                label: "January 2024".to_owned(),
            },
            ChartPoint {
                date: "Feb 2024".to_owned(),
                revenue: 50.0,
                label: "February 2024".to_owned(),
            },
        ];

        let options = revenue_chart(&points, "By month").to_string();

        let jan = options.find("Jan 2024").unwrap();
        let feb = options.find("Feb 2024").unwrap();
        assert!(jan < feb);
    }

    #[test]
    fn category_chart_includes_every_category() {
        let categories = vec![
            CategoryRevenue {
                name: "Electronics".to_owned(),
                value: 900.0,
            },
            CategoryRevenue {
                name: "Clothing".to_owned(),
                value: 100.0,
            },
        ];

        let options = category_chart(&categories).to_string();

        assert!(options.contains("Electronics"));
        assert!(options.contains("Clothing"));
        assert!(options.contains("#3B82F6"));
    }

    #[test]
    fn inline_script_initializes_each_container() {
        let charts = [
            DashboardChart {
                id: "revenue-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "category-chart",
                options: "{}".to_owned(),
            },
        ];

        let markup = charts_inline_script(&charts).into_string();

        assert!(markup.contains("revenue-chart"));
        assert!(markup.contains("category-chart"));
    }
}
