//! Time bucketing of sale records into chart-ready revenue series.
//!
//! Provides three bucketing strategies (week, month, quarter) that turn a
//! flat record list into a chronologically sorted [ChartPoint] series.
//! Month bucketing fills gaps with zero-revenue buckets so the revenue chart
//! stays continuous; week and quarter bucketing stay sparse.

use std::collections::HashMap;

use time::{Date, Duration, Month};

use crate::record::{SaleRecord, date_bounds};

/// A single point in a revenue-over-time series.
///
/// The typed bucket key (week-start date, calendar month, year and quarter
/// number) is used internally for sorting and stripped before the point is
/// returned, so display labels are never re-parsed to recover ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Short display label for the x axis, e.g. "Jan 10" or "Q1 2024".
    pub date: String,
    /// Total revenue in the bucket.
    pub revenue: f64,
    /// Full bucket description for tooltips, e.g. "Week of Jan 10".
    pub label: String,
}

/// Buckets records by the Sunday-started week containing their date.
///
/// Only weeks with at least one record appear; there is no gap filling.
pub fn group_by_week(records: &[SaleRecord]) -> Vec<ChartPoint> {
    let mut totals: HashMap<Date, f64> = HashMap::new();

    for record in records {
        let week_start =
            record.date - Duration::days(record.date.weekday().number_days_from_sunday() as i64);
        *totals.entry(week_start).or_insert(0.0) += record.amount;
    }

    let mut weeks: Vec<(Date, f64)> = totals.into_iter().collect();
    weeks.sort_unstable_by_key(|(week_start, _)| *week_start);

    weeks
        .into_iter()
        .map(|(week_start, revenue)| {
            let date = format!("{} {}", month_abbrev(week_start.month()), week_start.day());
            ChartPoint {
                label: format!("Week of {date}"),
                date,
                revenue,
            }
        })
        .collect()
}

/// Buckets records by calendar month, pre-seeding every month between the
/// earliest and latest record date with zero revenue.
///
/// The dense seeding produces visible zero-value buckets for months without
/// sales. An empty input yields an empty series.
pub fn group_by_month(records: &[SaleRecord]) -> Vec<ChartPoint> {
    let Some((first, last)) = date_bounds(records) else {
        return Vec::new();
    };

    // Seed every month in the inclusive span, keyed by the first of the month.
    let mut totals: HashMap<Date, f64> = HashMap::new();
    let mut current = first.replace_day(1).unwrap();
    let end = last.replace_day(1).unwrap();

    while current <= end {
        totals.insert(current, 0.0);
        current = next_month(current);
    }

    for record in records {
        let month = record.date.replace_day(1).unwrap();
        *totals.entry(month).or_insert(0.0) += record.amount;
    }

    let mut months: Vec<(Date, f64)> = totals.into_iter().collect();
    months.sort_unstable_by_key(|(month, _)| *month);

    months
        .into_iter()
        .map(|(month, revenue)| ChartPoint {
            date: format!("{} {}", month_abbrev(month.month()), month.year()),
            revenue,
            label: format!("{} {}", month.month(), month.year()),
        })
        .collect()
}

/// Buckets records by calendar quarter.
///
/// Only quarters with at least one record appear; there is no gap filling.
/// Sorting uses the numeric `(year, quarter)` key rather than the label text.
pub fn group_by_quarter(records: &[SaleRecord]) -> Vec<ChartPoint> {
    let mut totals: HashMap<(i32, u8), f64> = HashMap::new();

    for record in records {
        *totals.entry(quarter_of(record.date)).or_insert(0.0) += record.amount;
    }

    let mut quarters: Vec<((i32, u8), f64)> = totals.into_iter().collect();
    quarters.sort_unstable_by_key(|(key, _)| *key);

    quarters
        .into_iter()
        .map(|((year, quarter), revenue)| {
            let label = format!("Q{quarter} {year}");
            ChartPoint {
                date: label.clone(),
                revenue,
                label,
            }
        })
        .collect()
}

/// The `(year, quarter)` containing `date`, with quarters numbered 1 to 4.
fn quarter_of(date: Date) -> (i32, u8) {
    (date.year(), (u8::from(date.month()) - 1) / 3 + 1)
}

/// The first day of the month after `month_start`.
fn next_month(month_start: Date) -> Date {
    let (year, month) = match month_start.month() {
        Month::December => (month_start.year() + 1, Month::January),
        month => (month_start.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1).unwrap()
}

/// Formats a month as its three-letter abbreviation, e.g. "Jan".
pub(crate) fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
