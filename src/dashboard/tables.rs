//! Table and list views for dashboard data display.

use maud::{Markup, html};

use crate::{
    dashboard::{SortDirection, SortField, ranking::ProductStats},
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    record::SaleRecord,
};

const UNKNOWN_CUSTOMER_LABEL: &str = "Unknown Customer";

/// How many table rows a page holds when the query does not say.
pub(super) const DEFAULT_ROWS_PER_PAGE: u64 = 10;

/// The page sizes offered by the rows-per-page select.
const ROWS_PER_PAGE_OPTIONS: [u64; 4] = [10, 25, 50, 100];

/// The maximum number of numbered page buttons to show at once.
const MAX_PAGE_LINKS: u64 = 5;

const PAGE_BUTTON_STYLE: &str = "px-3 py-2 rounded-sm text-sm font-medium \
    text-blue-600 hover:underline disabled:text-gray-400 \
    disabled:no-underline dark:disabled:text-gray-500";

const CURRENT_PAGE_BUTTON_STYLE: &str =
    "px-3 py-2 rounded-sm text-sm font-medium text-white bg-blue-600";

/// One page of sales table rows plus the sort and paging state the table
/// controls re-submit.
pub(super) struct SalesTableState {
    /// The rows on the current page, already sorted.
    pub rows: Vec<SaleRecord>,
    /// How many records passed the filters across all pages.
    pub total: usize,
    /// The current page number, starting from 1.
    pub page: u64,
    /// How many pages the filtered records span.
    pub page_count: u64,
    /// The number of rows per page.
    pub per_page: u64,
    /// The column the rows are sorted by.
    pub sort: SortField,
    /// The direction the rows are sorted in.
    pub dir: SortDirection,
    /// Whether any filter predicate is active.
    pub filters_active: bool,
}

/// Renders the top products ranking.
pub(super) fn top_products_view(products: &[ProductStats]) -> Markup {
    html! {
        div class="bg-white dark:bg-gray-800 rounded-lg shadow-md p-4" {
            h3 class="text-xl font-semibold mb-4" { "Top Products" }

            @if products.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" {
                    "No sales match the current filters."
                }
            } @else {
                ol class="space-y-3" {
                    @for (rank, product) in products.iter().enumerate() {
                        li class="flex items-center justify-between" {
                            div class="flex items-center gap-3 min-w-0" {
                                span
                                    class="flex h-8 w-8 shrink-0 items-center justify-center
                                        rounded-full bg-blue-100 text-sm font-bold text-blue-800
                                        dark:bg-blue-900 dark:text-blue-300"
                                {
                                    (rank + 1)
                                }

                                div class="min-w-0" {
                                    p class="font-medium truncate" title=(product.product) {
                                        (product.product)
                                    }
                                    p class="text-sm text-gray-600 dark:text-gray-400" {
                                        (product.total_sold) " sold · "
                                        span class=(CATEGORY_BADGE_STYLE) { (product.category) }
                                    }
                                }
                            }

                            span class="font-semibold whitespace-nowrap" {
                                (format_currency(product.total_revenue))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the recent sales list, newest first.
pub(super) fn recent_sales_view(sales: &[SaleRecord]) -> Markup {
    html! {
        div class="bg-white dark:bg-gray-800 rounded-lg shadow-md p-4" {
            h3 class="text-xl font-semibold mb-4" { "Recent Sales" }

            @if sales.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" {
                    "No sales match the current filters."
                }
            } @else {
                ul class="space-y-3" {
                    @for sale in sales {
                        li class="flex items-center justify-between" {
                            div class="min-w-0" {
                                p class="font-medium truncate" { (sale.product) }
                                p class="text-sm text-gray-600 dark:text-gray-400" {
                                    (sale.customer.as_deref().unwrap_or(UNKNOWN_CUSTOMER_LABEL))
                                    " · " (sale.date)
                                }
                            }

                            span class="font-semibold whitespace-nowrap" {
                                (format_currency(sale.amount))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders one page of the filtered sales data table, with sortable column
/// headers and page controls.
pub(super) fn sales_table(table: &SalesTableState) -> Markup {
    html! {
        div class="w-full" {
            div class="flex items-center justify-between mb-4" {
                h3 class="text-xl font-semibold" {
                    "Sales Data"
                    span class="text-sm font-normal text-gray-600 dark:text-gray-400" {
                        " (" (table.total) " records)"
                    }
                    @if table.filters_active {
                        " "
                        span class=(CATEGORY_BADGE_STYLE) { "Filtered" }
                    }
                }

                div class="flex items-center gap-2" {
                    label
                        for="per_page"
                        class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "Show:"
                    }
                    select
                        name="per_page"
                        id="per_page"
                        hx-get=(endpoints::DASHBOARD_CONTENT)
                        hx-target="#dashboard-content"
                        hx-swap="innerHTML"
                        hx-include="#filter-bar"
                        hx-vals=(sort_params(table.sort, table.dir))
                        class="p-2 rounded text-sm text-gray-900 dark:text-white
                            bg-gray-50 dark:bg-gray-700 border border-gray-300
                            dark:border-gray-600"
                    {
                        @for count in ROWS_PER_PAGE_OPTIONS {
                            option value=(count) selected[count == table.per_page] { (count) }
                        }
                    }
                }
            }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            (sort_header("Date", SortField::Date, table))
                            (sort_header("Product", SortField::Product, table))
                            (sort_header("Category", SortField::Category, table))
                            (sort_header("Customer", SortField::Customer, table))
                            (sort_header("Qty", SortField::Quantity, table))
                            (sort_header("Amount", SortField::Amount, table))
                        }
                    }
                    tbody {
                        @if table.rows.is_empty() {
                            tr class=(TABLE_ROW_STYLE) {
                                td colspan="6" class={(TABLE_CELL_STYLE) " text-center"} {
                                    "No sales match the current filters."
                                }
                            }
                        }

                        @for record in &table.rows {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (record.date) }
                                td class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                                    (record.product)
                                }
                                td class=(TABLE_CELL_STYLE) {
                                    span class=(CATEGORY_BADGE_STYLE) { (record.category) }
                                }
                                td class=(TABLE_CELL_STYLE) {
                                    (record.customer.as_deref().unwrap_or(UNKNOWN_CUSTOMER_LABEL))
                                }
                                td class=(TABLE_CELL_STYLE) { (record.quantity) }
                                td class={(TABLE_CELL_STYLE) " font-semibold"} {
                                    (format_currency(record.amount))
                                }
                            }
                        }
                    }
                }
            }

            @if table.page_count > 1 {
                (pager(table))
            }
        }
    }
}

/// Renders a column header that re-sorts the table when clicked.
///
/// Clicking the active column flips its direction; clicking any other column
/// sorts by it ascending. Sorting keeps the current page, which the handler
/// clamps if the page count changed.
fn sort_header(label: &str, field: SortField, table: &SalesTableState) -> Markup {
    let is_active = table.sort == field;
    let next_dir = if is_active && table.dir == SortDirection::Ascending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    let icon = match (is_active, table.dir) {
        (false, _) => "↕",
        (true, SortDirection::Ascending) => "↑",
        (true, SortDirection::Descending) => "↓",
    };
    let icon_style = if is_active {
        "text-xs text-blue-600"
    } else {
        "text-xs text-gray-400"
    };

    html! {
        th scope="col" class=(TABLE_CELL_STYLE) {
            button
                type="button"
                hx-get=(endpoints::DASHBOARD_CONTENT)
                hx-target="#dashboard-content"
                hx-swap="innerHTML"
                hx-include="#filter-bar"
                hx-vals=(table_params(field, next_dir, table.page, table.per_page))
                class="flex items-center gap-2 uppercase"
            {
                (label)
                span class=(icon_style) { (icon) }
            }
        }
    }
}

/// Renders the page controls, shown only when the rows span multiple pages.
fn pager(table: &SalesTableState) -> Markup {
    let first_row = (table.page - 1) * table.per_page + 1;
    let last_row = (table.page * table.per_page).min(table.total as u64);

    html! {
        nav class="pagination flex items-center justify-between px-2 py-4" {
            span class="text-sm text-gray-600 dark:text-gray-400" {
                "Showing " (first_row) " to " (last_row) " of " (table.total) " results"
            }

            ul class="pagination flex items-center gap-1" {
                li {
                    (page_button(
                        "Previous",
                        table.page.saturating_sub(1),
                        table.page == 1,
                        false,
                        table,
                    ))
                }

                @for number in page_numbers(table.page, table.page_count) {
                    li {
                        (page_button(
                            &number.to_string(),
                            number,
                            false,
                            number == table.page,
                            table,
                        ))
                    }
                }

                li {
                    (page_button(
                        "Next",
                        table.page + 1,
                        table.page == table.page_count,
                        false,
                        table,
                    ))
                }
            }
        }
    }
}

fn page_button(
    label: &str,
    page: u64,
    disabled: bool,
    is_current: bool,
    table: &SalesTableState,
) -> Markup {
    let style = if is_current {
        CURRENT_PAGE_BUTTON_STYLE
    } else {
        PAGE_BUTTON_STYLE
    };

    html! {
        button
            type="button"
            disabled[disabled]
            aria-current=[is_current.then_some("page")]
            hx-get=(endpoints::DASHBOARD_CONTENT)
            hx-target="#dashboard-content"
            hx-swap="innerHTML"
            hx-include="#filter-bar"
            hx-vals=(table_params(table.sort, table.dir, page, table.per_page))
            class=(style)
        {
            (label)
        }
    }
}

/// The numbered page buttons to offer: a window of up to [MAX_PAGE_LINKS]
/// pages centered on the current page and clamped at either end.
fn page_numbers(current_page: u64, page_count: u64) -> Vec<u64> {
    if page_count <= MAX_PAGE_LINKS {
        (1..=page_count).collect()
    } else if current_page <= 3 {
        (1..=MAX_PAGE_LINKS).collect()
    } else if current_page >= page_count - 2 {
        (page_count - MAX_PAGE_LINKS + 1..=page_count).collect()
    } else {
        (current_page - 2..=current_page + 2).collect()
    }
}

/// The extra query parameters a table control submits alongside the filter
/// form, as an hx-vals JSON object.
fn table_params(sort: SortField, dir: SortDirection, page: u64, per_page: u64) -> String {
    format!(
        r#"{{"sort": "{}", "dir": "{}", "page": {page}, "per_page": {per_page}}}"#,
        sort.as_query_value(),
        dir.as_query_value()
    )
}

/// Like [table_params], but without a page number so the handler falls back
/// to the first page. Used by the rows-per-page select, which submits its own
/// value.
fn sort_params(sort: SortField, dir: SortDirection) -> String {
    format!(
        r#"{{"sort": "{}", "dir": "{}"}}"#,
        sort.as_query_value(),
        dir.as_query_value()
    )
}
