//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for displaying and filtering the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - The query types the filter bar submits

use std::cmp::Ordering;

use axum::extract::{Query, State};
use maud::{Markup, html};
use serde::{Deserialize, Deserializer, de};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::{
    AppState,
    dashboard::{
        aggregation::{ChartPoint, group_by_month, group_by_quarter, group_by_week},
        cards::metric_cards_view,
        charts::{
            DashboardChart, category_chart, charts_inline_script, charts_script, charts_view,
            revenue_chart,
        },
        metrics::{TrendMetrics, compute_trend_metrics},
        ranking::{
            DEFAULT_TOP_PRODUCTS, ProductStats, RECENT_SALES_COUNT, aggregate_by_category,
            aggregate_by_product, recent_sales,
        },
        tables::{
            DEFAULT_ROWS_PER_PAGE, SalesTableState, recent_sales_view, sales_table,
            top_products_view,
        },
    },
    endpoints,
    filter::{ALL_CATEGORIES, FilterState, filter_records},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, base},
    navigation::NavBar,
    record::SaleRecord,
};

/// The bucketing granularity of the revenue chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeRange {
    /// Sunday-started weeks.
    #[default]
    Week,
    /// Calendar months.
    Month,
    /// Calendar quarters.
    Quarter,
}

impl TimeRange {
    /// The value submitted by the range select.
    fn as_query_value(self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Quarter => "quarter",
        }
    }

    /// The option text shown in the range select.
    fn label(self) -> &'static str {
        match self {
            TimeRange::Week => "Weekly",
            TimeRange::Month => "Monthly",
            TimeRange::Quarter => "Quarterly",
        }
    }

    /// The revenue chart subtitle for this granularity.
    fn subtitle(self) -> &'static str {
        match self {
            TimeRange::Week => "By week",
            TimeRange::Month => "By month",
            TimeRange::Quarter => "By quarter",
        }
    }

    fn group(self, records: &[SaleRecord]) -> Vec<ChartPoint> {
        match self {
            TimeRange::Week => group_by_week(records),
            TimeRange::Month => group_by_month(records),
            TimeRange::Quarter => group_by_quarter(records),
        }
    }
}

const TIME_RANGES: [TimeRange; 3] = [TimeRange::Week, TimeRange::Month, TimeRange::Quarter];

/// The sales table column to order by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    /// Sale date, the initial ordering.
    #[default]
    Date,
    /// Product name.
    Product,
    /// Category name.
    Category,
    /// Customer name, with anonymous sales sorting as an empty name.
    Customer,
    /// Units sold.
    Quantity,
    /// Line total.
    Amount,
}

impl SortField {
    /// The value submitted by the table sort controls.
    pub(super) fn as_query_value(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Product => "product",
            SortField::Category => "category",
            SortField::Customer => "customer",
            SortField::Quantity => "quantity",
            SortField::Amount => "amount",
        }
    }

    fn compare(self, a: &SaleRecord, b: &SaleRecord) -> Ordering {
        match self {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Product => a.product.cmp(&b.product),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Customer => a
                .customer
                .as_deref()
                .unwrap_or_default()
                .cmp(b.customer.as_deref().unwrap_or_default()),
            SortField::Quantity => a.quantity.cmp(&b.quantity),
            SortField::Amount => a.amount.total_cmp(&b.amount),
        }
    }
}

/// The direction the sales table is ordered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first, so the default date sort shows the newest sales.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The value submitted by the table sort controls.
    pub(super) fn as_query_value(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Sorts records by `field` in `direction`.
///
/// The sort is stable, so records that compare equal keep their filtered
/// order.
fn sort_records(records: &mut [SaleRecord], field: SortField, direction: SortDirection) {
    records.sort_by(|a, b| match direction {
        SortDirection::Ascending => field.compare(a, b),
        SortDirection::Descending => field.compare(b, a),
    });
}

/// The filter bar fields, as submitted in the query string.
///
/// Browsers submit empty strings for untouched date inputs, so the date
/// fields treat the empty string the same as an absent parameter.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Free-text search over product, category, and customer.
    #[serde(default)]
    pub search: String,
    /// The selected category, or absent/"All" for no constraint.
    #[serde(default)]
    pub category: Option<String>,
    /// Inclusive lower date bound.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_from: Option<Date>,
    /// Inclusive upper date bound.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date_to: Option<Date>,
    /// The revenue chart granularity.
    #[serde(default)]
    pub range: TimeRange,
    /// The sales table sort column.
    #[serde(default)]
    pub sort: SortField,
    /// The sales table sort direction.
    #[serde(default)]
    pub dir: SortDirection,
    /// The sales table page number, starting from 1.
    pub page: Option<u64>,
    /// The number of sales table rows per page.
    pub per_page: Option<u64>,
}

impl DashboardQuery {
    fn filter_state(&self) -> FilterState {
        FilterState {
            search: self.search.clone(),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| ALL_CATEGORIES.to_owned()),
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = Option::deserialize(deserializer)?;

    match text.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => {
            let format = format_description!("[year]-[month]-[day]");
            Date::parse(text, &format)
                .map(Some)
                .map_err(de::Error::custom)
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    metrics: TrendMetrics,
    charts: [DashboardChart; 2],
    top_products: Vec<ProductStats>,
    recent: Vec<SaleRecord>,
    table: SalesTableState,
}

/// Display the sales analytics dashboard.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Markup {
    let today = OffsetDateTime::now_utc().date();
    let data = build_dashboard_data(&state.records, &query, today);

    dashboard_view(
        NavBar::new(endpoints::DASHBOARD_VIEW),
        &state.categories,
        &query,
        &data,
    )
}

/// Render the dashboard content partial for htmx filter updates.
pub async fn get_dashboard_content(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Markup {
    let today = OffsetDateTime::now_utc().date();
    let data = build_dashboard_data(&state.records, &query, today);

    dashboard_content(&data)
}

/// Runs the aggregation pipeline over the filtered records.
///
/// Every section of the dashboard derives from the same filtered set and the
/// same reference date, so one render is always internally consistent.
fn build_dashboard_data(
    records: &[SaleRecord],
    query: &DashboardQuery,
    today: Date,
) -> DashboardData {
    let filter_state = query.filter_state();
    let filters_active = filter_state.is_active();
    let mut filtered = filter_records(records, &filter_state);

    let metrics = compute_trend_metrics(&filtered, today);
    let revenue_series = query.range.group(&filtered);
    let categories = aggregate_by_category(&filtered);
    let top_products = aggregate_by_product(&filtered, DEFAULT_TOP_PRODUCTS);
    let recent = recent_sales(&filtered, RECENT_SALES_COUNT);

    let charts = [
        DashboardChart {
            id: "revenue-chart",
            options: revenue_chart(&revenue_series, query.range.subtitle()).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(&categories).to_string(),
        },
    ];

    // The table sorts after aggregation so ranking ties keep the record
    // order the filter preserved.
    sort_records(&mut filtered, query.sort, query.dir);
    let table = paginate_rows(filtered, query, filters_active);

    DashboardData {
        metrics,
        charts,
        top_products,
        recent,
        table,
    }
}

/// Slices the sorted rows down to the requested page.
///
/// An out-of-range page number is clamped rather than rejected, so narrowing
/// the filters can never strand the table on an empty page.
fn paginate_rows(
    rows: Vec<SaleRecord>,
    query: &DashboardQuery,
    filters_active: bool,
) -> SalesTableState {
    let per_page = query.per_page.unwrap_or(DEFAULT_ROWS_PER_PAGE).max(1);
    let total = rows.len();
    let page_count = (total as u64).div_ceil(per_page).max(1);
    let page = query.page.unwrap_or(1).clamp(1, page_count);

    let start = ((page - 1) * per_page) as usize;
    let rows = rows
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    SalesTableState {
        rows,
        total,
        page,
        page_count,
        per_page,
        sort: query.sort,
        dir: query.dir,
        filters_active,
    }
}

/// Renders the full dashboard page.
fn dashboard_view(
    nav_bar: NavBar<'_>,
    categories: &[String],
    query: &DashboardQuery,
    data: &DashboardData,
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (filter_bar(categories, query))

            div id="dashboard-content" class="w-full"
            {
                (dashboard_content(data))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(
            "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js".to_owned(),
        ),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// Renders the dashboard content (cards, charts, rankings, table).
///
/// This is also the htmx partial: the filter bar targets `#dashboard-content`
/// and swaps this markup in without a full page reload.
fn dashboard_content(data: &DashboardData) -> Markup {
    html!(
        (metric_cards_view(&data.metrics))

        (charts_view(&data.charts))
        (charts_inline_script(&data.charts))

        div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full mb-4"
        {
            (top_products_view(&data.top_products))
            (recent_sales_view(&data.recent))
        }

        (sales_table(&data.table))
    )
}

/// Renders the filter bar form.
///
/// Any change re-requests the content partial; typing in the search box is
/// debounced rather than firing per keystroke.
fn filter_bar(categories: &[String], query: &DashboardQuery) -> Markup {
    html!(
        form
            id="filter-bar"
            hx-get=(endpoints::DASHBOARD_CONTENT)
            hx-target="#dashboard-content"
            hx-swap="innerHTML"
            hx-trigger="change, keyup delay:300ms from:find input[name='search']"
            class="w-full bg-gray-50 dark:bg-gray-800 p-4 rounded-lg mb-4
                grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-5 gap-4"
        {
            div {
                label for="search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="text"
                    name="search"
                    id="search"
                    placeholder="Product, category, or customer"
                    value=(query.search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @let selected = query.category.as_deref().unwrap_or(ALL_CATEGORIES);
                    @for category in categories {
                        option value=(category) selected[category.as_str() == selected] {
                            (category)
                        }
                    }
                }
            }

            div {
                label for="date_from" class=(FORM_LABEL_STYLE) { "From" }
                input
                    type="date"
                    name="date_from"
                    id="date_from"
                    value=(query.date_from.map(|date| date.to_string()).unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div {
                label for="date_to" class=(FORM_LABEL_STYLE) { "To" }
                input
                    type="date"
                    name="date_to"
                    id="date_to"
                    value=(query.date_to.map(|date| date.to_string()).unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div {
                label for="range" class=(FORM_LABEL_STYLE) { "Granularity" }
                select name="range" id="range" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for range in TIME_RANGES {
                        option value=(range.as_query_value()) selected[range == query.range] {
                            (range.label())
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::extract::{Query, State};
    use scraper::{Html, Selector};
    use time::{Duration, macros::date};

    use crate::{AppState, record::test_utils::create_test_record};

    use super::{
        DashboardQuery, SortDirection, SortField, TimeRange, get_dashboard_content,
        get_dashboard_page, sort_records,
    };

    fn test_state() -> AppState {
        AppState::new(vec![
            create_test_record(
                "1",
                "Laptop",
                "Electronics",
                date!(2024 - 01 - 10),
                1,
                1200.0,
                Some("Ada Lovelace"),
            ),
            create_test_record(
                "2",
                "Running Shoes",
                "Sports",
                date!(2024 - 02 - 05),
                2,
                80.0,
                Some("Grace Hopper"),
            ),
            create_test_record(
                "3",
                "Headphones",
                "Electronics",
                date!(2024 - 03 - 20),
                1,
                150.0,
                None,
            ),
        ])
    }

    #[tokio::test]
    async fn dashboard_page_renders_charts_cards_and_table() {
        let markup = get_dashboard_page(
            State(test_state()),
            Query(DashboardQuery::default()),
        )
        .await;

        let html = Html::parse_document(&markup.into_string());
        assert_valid_html(&html);

        assert_element_exists(&html, "#revenue-chart");
        assert_element_exists(&html, "#category-chart");
        assert_element_exists(&html, "#dashboard-content");
        assert_element_exists(&html, "table");
        assert_element_exists(&html, "form input[name='search']");
    }

    #[tokio::test]
    async fn category_select_lists_all_plus_each_category() {
        let markup = get_dashboard_page(
            State(test_state()),
            Query(DashboardQuery::default()),
        )
        .await;

        let html = Html::parse_document(&markup.into_string());
        let selector = Selector::parse("select[name='category'] option").unwrap();
        let options: Vec<String> = html
            .select(&selector)
            .map(|option| option.text().collect())
            .collect();

        assert_eq!(options, vec!["All", "Electronics", "Sports"]);
    }

    #[tokio::test]
    async fn content_partial_respects_category_filter() {
        let query = DashboardQuery {
            category: Some("Electronics".to_owned()),
            ..Default::default()
        };

        let markup = get_dashboard_content(State(test_state()), Query(query)).await;
        let html = Html::parse_document(&markup.into_string());

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);

        let text = markup_text(&html);
        assert!(text.contains("Laptop"));
        assert!(!text.contains("Running Shoes"));
    }

    #[tokio::test]
    async fn content_partial_carries_chart_init_script() {
        let markup =
            get_dashboard_content(State(test_state()), Query(DashboardQuery::default())).await;

        let text = markup.into_string();
        assert!(text.contains("echarts.init"));
        assert!(text.contains("revenue-chart"));
    }

    fn many_records_state(count: u32) -> AppState {
        let records = (1..=count)
            .map(|number| {
                create_test_record(
                    &number.to_string(),
                    &format!("Product {number}"),
                    "Electronics",
                    date!(2024 - 01 - 01) + Duration::days(number as i64),
                    1,
                    10.0,
                    None,
                )
            })
            .collect();

        AppState::new(records)
    }

    async fn table_row_products(state: AppState, query: DashboardQuery) -> Vec<String> {
        let markup = get_dashboard_content(State(state), Query(query)).await;
        let html = Html::parse_document(&markup.into_string());

        let cell_selector = Selector::parse("tbody tr td:nth-child(2)").unwrap();
        html.select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn table_defaults_to_newest_sales_first() {
        let products = table_row_products(test_state(), DashboardQuery::default()).await;

        assert_eq!(products, vec!["Headphones", "Running Shoes", "Laptop"]);
    }

    #[tokio::test]
    async fn table_sorts_by_the_requested_column_and_direction() {
        let query = DashboardQuery {
            sort: SortField::Amount,
            dir: SortDirection::Ascending,
            ..Default::default()
        };

        let products = table_row_products(test_state(), query).await;

        // Amounts are 150, 160, and 1200.
        assert_eq!(products, vec!["Headphones", "Running Shoes", "Laptop"]);

        let reversed = DashboardQuery {
            sort: SortField::Amount,
            ..Default::default()
        };
        let products = table_row_products(test_state(), reversed).await;

        assert_eq!(products, vec!["Laptop", "Running Shoes", "Headphones"]);
    }

    #[tokio::test]
    async fn second_page_shows_the_remaining_rows() {
        let query = DashboardQuery {
            sort: SortField::Quantity,
            dir: SortDirection::Ascending,
            page: Some(2),
            ..Default::default()
        };

        let markup = get_dashboard_content(State(many_records_state(12)), Query(query)).await;
        let html = Html::parse_document(&markup.into_string());

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);

        let text: String = html.root_element().text().collect();
        assert!(text.contains("Showing 11 to 12 of 12 results"));

        let pager_selector = Selector::parse("nav.pagination").unwrap();
        assert!(html.select(&pager_selector).next().is_some());
    }

    #[tokio::test]
    async fn out_of_range_page_clamps_to_the_last_page() {
        let query = DashboardQuery {
            page: Some(99),
            ..Default::default()
        };

        let markup = get_dashboard_content(State(many_records_state(12)), Query(query)).await;
        let html = Html::parse_document(&markup.into_string());

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);
    }

    #[tokio::test]
    async fn content_partial_marks_active_filters() {
        let query = DashboardQuery {
            category: Some("Electronics".to_owned()),
            ..Default::default()
        };

        let filtered = get_dashboard_content(State(test_state()), Query(query)).await;
        assert!(filtered.into_string().contains("Filtered"));

        let unfiltered =
            get_dashboard_content(State(test_state()), Query(DashboardQuery::default())).await;
        assert!(!unfiltered.into_string().contains("Filtered"));
    }

    #[test]
    fn sorting_missing_customers_uses_an_empty_name() {
        let mut records = vec![
            create_test_record("1", "A", "Sports", date!(2024 - 01 - 01), 1, 10.0, Some("Ada")),
            create_test_record("2", "B", "Sports", date!(2024 - 01 - 02), 1, 10.0, None),
        ];

        sort_records(&mut records, SortField::Customer, SortDirection::Ascending);

        assert_eq!(records[0].id, "2");
        assert_eq!(records[1].id, "1");
    }

    #[test]
    fn empty_date_strings_deserialize_to_none() {
        let query: DashboardQuery =
            serde_html_form::from_str("search=&category=All&date_from=&date_to=").unwrap();

        assert_eq!(query.date_from, None);
        assert_eq!(query.date_to, None);
        assert_eq!(query.search, "");
        assert_eq!(query.category.as_deref(), Some("All"));
    }

    #[test]
    fn dates_and_range_deserialize_when_present() {
        let query: DashboardQuery =
            serde_html_form::from_str("date_from=2024-01-01&date_to=2024-03-31&range=quarter")
                .unwrap();

        assert_eq!(query.date_from, Some(date!(2024 - 01 - 01)));
        assert_eq!(query.date_to, Some(date!(2024 - 03 - 31)));
        assert_eq!(query.range, TimeRange::Quarter);
    }

    #[test]
    fn range_defaults_to_week() {
        let query: DashboardQuery = serde_html_form::from_str("").unwrap();

        assert_eq!(query.range, TimeRange::Week);
    }

    #[test]
    fn sort_and_paging_params_deserialize() {
        let query: DashboardQuery =
            serde_html_form::from_str("sort=amount&dir=asc&page=2&per_page=25").unwrap();

        assert_eq!(query.sort, SortField::Amount);
        assert_eq!(query.dir, SortDirection::Ascending);
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, Some(25));
    }

    #[test]
    fn sort_defaults_to_date_descending() {
        let query: DashboardQuery = serde_html_form::from_str("").unwrap();

        assert_eq!(query.sort, SortField::Date);
        assert_eq!(query.dir, SortDirection::Descending);
        assert_eq!(query.page, None);
        assert_eq!(query.per_page, None);
    }

    fn markup_text(html: &Html) -> String {
        html.root_element().text().collect()
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[track_caller]
    fn assert_element_exists(html: &Html, selector: &str) {
        let parsed = Selector::parse(selector).unwrap();
        assert!(
            html.select(&parsed).next().is_some(),
            "No element matching '{}' found",
            selector
        );
    }
}
