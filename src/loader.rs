//! Fetching and normalization of raw sale records from the mock sales API.
//!
//! [start_load] spawns a background task that downloads the raw JSON batch,
//! normalizes it into [SaleRecord]s, and reports staged progress over a
//! channel. The returned [LoadHandle] owns the task, so cancelling one load
//! can never affect another.

use serde::Deserialize;
use time::{Date, Month, macros::format_description};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::{Error, record::SaleRecord};

/// The mock API endpoint the server loads from when no other URL is given.
pub const DEFAULT_DATA_URL: &str = "https://api.mockaroo.com/api/c099b1d0?count=200&key=bab68140";

/// How many raw records are normalized between progress reports.
const TRANSFORM_CHUNK_SIZE: usize = 50;

/// One sale record as the mock API serves it, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSaleRecord {
    /// Numeric row id.
    pub id: i64,
    /// Product display name.
    pub product: String,
    /// Category name.
    pub category: String,
    /// Sale date as "M/D/YYYY" (or already ISO "YYYY-MM-DD").
    pub date: String,
    /// Number of units sold.
    pub quantity: u32,
    /// Unit price as a display string, e.g. "$1,234.56".
    pub price: String,
    /// Customer name; absent or empty for anonymous sales.
    #[serde(default)]
    pub customer: Option<String>,
}

/// The phase a load is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// Waiting on the HTTP response.
    Fetching,
    /// Decoding the JSON body.
    Parsing,
    /// Normalizing raw records chunk by chunk.
    Transforming,
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStage::Fetching => write!(f, "fetching"),
            LoadStage::Parsing => write!(f, "parsing"),
            LoadStage::Transforming => write!(f, "transforming"),
        }
    }
}

/// A progress report emitted while a load runs.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProgress {
    /// The phase the load is in.
    pub stage: LoadStage,
    /// Human-readable description of the phase.
    pub message: String,
    /// Overall completion percentage, when known.
    pub progress: Option<u8>,
}

/// Owner of a running load task.
///
/// Each call to [start_load] returns its own handle; cancelling this load has
/// no effect on any other in-flight load.
pub struct LoadHandle {
    task: JoinHandle<Result<Vec<SaleRecord>, Error>>,
}

impl LoadHandle {
    /// Stops the load task. A subsequent [LoadHandle::await_records] returns
    /// [Error::LoadCancelled].
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Waits for the load to finish and returns the normalized records.
    pub async fn await_records(self) -> Result<Vec<SaleRecord>, Error> {
        match self.task.await {
            Ok(result) => result,
            Err(join_error) if join_error.is_cancelled() => Err(Error::LoadCancelled),
            Err(join_error) => Err(Error::LoadFailed(join_error.to_string())),
        }
    }
}

/// Starts loading sale records from `url` in a background task.
///
/// Returns the handle owning the task and the channel progress reports
/// arrive on. Dropping the receiver only discards progress reports; the
/// load itself keeps running.
pub fn start_load(
    client: reqwest::Client,
    url: String,
) -> (LoadHandle, UnboundedReceiver<LoadProgress>) {
    let (tx, rx) = unbounded_channel();
    let task = tokio::spawn(run_load(client, url, tx));

    (LoadHandle { task }, rx)
}

async fn run_load(
    client: reqwest::Client,
    url: String,
    progress: UnboundedSender<LoadProgress>,
) -> Result<Vec<SaleRecord>, Error> {
    report(&progress, LoadStage::Fetching, "Fetching sales data", Some(10));

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|error| Error::LoadFailed(error.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::UnexpectedStatus(status.as_u16()));
    }

    report(&progress, LoadStage::Parsing, "Parsing response", Some(30));

    let raw_records: Vec<RawSaleRecord> = response
        .json()
        .await
        .map_err(|error| Error::LoadFailed(error.to_string()))?;

    let total = raw_records.len();
    let mut records = Vec::with_capacity(total);

    for (chunk_index, chunk) in raw_records.chunks(TRANSFORM_CHUNK_SIZE).enumerate() {
        records.extend(chunk.iter().filter_map(normalize_record));

        let processed = (chunk_index * TRANSFORM_CHUNK_SIZE + chunk.len()).min(total);
        // Transformation covers the 30-100% stretch of the overall load.
        let percent = 30 + (processed * 70 / total.max(1)) as u8;
        report(
            &progress,
            LoadStage::Transforming,
            &format!("Transformed {processed} of {total} records"),
            Some(percent),
        );

        // Let other tasks run between chunks.
        tokio::task::yield_now().await;
    }

    Ok(records)
}

fn report(
    progress: &UnboundedSender<LoadProgress>,
    stage: LoadStage,
    message: &str,
    percent: Option<u8>,
) {
    // A dropped receiver means nobody is watching progress, which is fine.
    let _ = progress.send(LoadProgress {
        stage,
        message: message.to_owned(),
        progress: percent,
    });
}

/// Normalizes one raw record, or drops it when its date cannot be parsed.
fn normalize_record(raw: &RawSaleRecord) -> Option<SaleRecord> {
    let Some(date) = parse_record_date(&raw.date) else {
        warn!(
            "dropping record {} with unparsable date {:?}",
            raw.id, raw.date
        );
        return None;
    };

    let price = parse_price(&raw.price);
    let customer = raw
        .customer
        .as_deref()
        .filter(|customer| !customer.is_empty())
        .map(str::to_owned);

    Some(SaleRecord {
        id: raw.id.to_string(),
        product: raw.product.clone(),
        category: raw.category.clone(),
        date,
        quantity: raw.quantity,
        price,
        amount: raw.quantity as f64 * price,
        customer,
    })
}

/// Parses a display price like "$1,234.56" into its numeric value.
///
/// Unparsable prices become 0.0 so a bad row cannot poison a whole batch.
fn parse_price(price: &str) -> f64 {
    price
        .replace(['$', ','], "")
        .trim()
        .parse()
        .unwrap_or(0.0)
}

/// Parses "M/D/YYYY" (no zero padding) or ISO "YYYY-MM-DD" dates.
fn parse_record_date(text: &str) -> Option<Date> {
    let mut parts = text.splitn(3, '/');
    if let (Some(month), Some(day), Some(year)) = (parts.next(), parts.next(), parts.next()) {
        let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
        let day = day.parse().ok()?;
        let year = year.parse().ok()?;

        return Date::from_calendar_date(year, month, day).ok();
    }

    let format = format_description!("[year]-[month]-[day]");
    Date::parse(text, &format).ok()
}
