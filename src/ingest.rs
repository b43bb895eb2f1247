//! Validation and enrichment of an uploaded sales ledger.
//!
//! The upload is a delimited text file (optionally gzip-compressed) with at
//! least the columns in [`REQUIRED_COLUMNS`]. Rows whose `Date` cannot be
//! parsed are dropped; every surviving row gets `Year`, `Month_Year` and
//! `Season`. A per-client, per-year count of distinct stores is derived
//! alongside.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::error::IngestError;
use crate::source::decompress_if_gzip;
use crate::table::{
    EnrichedTable, RawTransaction, StoreHistory, StoreHistoryTable, Transaction, group_key,
};

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Date",
    "Client_Name",
    "Store_ID",
    "Store_State",
    "Category",
    "Price_Band",
    "Quantity_Sold",
    "Customer_Service_Score",
    "Festival",
];

/// Date-only layouts tried in order; the first that parses wins.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%Y%m%d",
];

/// Layouts carrying a time of day, which is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Informational outcome of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub rows: usize,
    pub dropped_rows: usize,
    pub years: usize,
    pub first_year: i32,
    pub last_year: i32,
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Data processed successfully! Loaded {} transactions over {} years.",
            with_thousands(self.rows),
            self.years
        )
    }
}

/// Result of [`enrich`]: both tables are empty unless `status` is `Ok`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingestion {
    pub enriched: EnrichedTable,
    pub store_history: StoreHistoryTable,
    pub status: Result<IngestSummary, IngestError>,
}

/// Tables produced by [`try_enrich`].
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub enriched: EnrichedTable,
    pub store_history: StoreHistoryTable,
    pub summary: IngestSummary,
}

/// Parses and enriches `bytes`, turning any failure into a pair of empty
/// tables plus the error in `status`.
#[tracing::instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn enrich(bytes: &[u8]) -> Ingestion {
    match try_enrich(bytes) {
        Ok(ingested) => {
            info!(
                rows = ingested.summary.rows,
                years = ingested.summary.years,
                "{}",
                ingested.summary
            );
            Ingestion {
                enriched: ingested.enriched,
                store_history: ingested.store_history,
                status: Ok(ingested.summary),
            }
        }
        Err(e) => {
            error!(error = %e, "Ingestion failed");
            Ingestion {
                enriched: EnrichedTable::default(),
                store_history: StoreHistoryTable::default(),
                status: Err(e),
            }
        }
    }
}

pub fn try_enrich(bytes: &[u8]) -> Result<Ingested, IngestError> {
    let bytes = decompress_if_gzip(bytes).map_err(IngestError::parse)?;

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes.as_ref());

    let headers = rdr.headers().map_err(IngestError::parse)?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::parse("No columns to parse from file"));
    }

    let columns = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut dropped_rows = 0usize;

    for result in rdr.records() {
        let record = result.map_err(IngestError::parse)?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(IngestError::Parse(format!(
                "Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }

        match parse_date(columns.cell(&record, columns.date)) {
            Some(date) => rows.push(Transaction::enrich(date, columns.raw(&record))),
            None => dropped_rows += 1,
        }
    }

    if dropped_rows > 0 {
        warn!(dropped_rows, "Dropped rows with unparseable dates");
    }

    let enriched = EnrichedTable::new(rows);
    let store_history = store_history(&enriched);
    debug!(store_history_rows = store_history.len(), "Store history built");

    let (first_year, last_year) = enriched.year_range().unwrap_or_default();
    let summary = IngestSummary {
        rows: enriched.len(),
        dropped_rows,
        years: enriched.distinct_years(),
        first_year,
        last_year,
    };

    Ok(Ingested {
        enriched,
        store_history,
        summary,
    })
}

/// Positions of the required columns in the header row.
struct ColumnIndex {
    date: usize,
    client_name: usize,
    store_id: usize,
    store_state: usize,
    category: usize,
    price_band: usize,
    quantity_sold: usize,
    customer_service_score: usize,
    festival: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, IngestError> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns(missing));
        }

        let at = |name: &str| position(name).unwrap_or_default();
        Ok(ColumnIndex {
            date: at("Date"),
            client_name: at("Client_Name"),
            store_id: at("Store_ID"),
            store_state: at("Store_State"),
            category: at("Category"),
            price_band: at("Price_Band"),
            quantity_sold: at("Quantity_Sold"),
            customer_service_score: at("Customer_Service_Score"),
            festival: at("Festival"),
        })
    }

    /// Short rows read as empty cells.
    fn cell<'r>(&self, record: &'r StringRecord, idx: usize) -> &'r str {
        record.get(idx).unwrap_or("")
    }

    fn raw(&self, record: &StringRecord) -> RawTransaction {
        let text = |idx| self.cell(record, idx).to_string();
        RawTransaction {
            client_name: text(self.client_name),
            store_id: text(self.store_id),
            store_state: text(self.store_state),
            category: text(self.category),
            price_band: text(self.price_band),
            quantity_sold: parse_quantity(self.cell(record, self.quantity_sold)),
            customer_service_score: parse_score(self.cell(record, self.customer_service_score)),
            festival: text(self.festival),
        }
    }
}

/// Best-effort calendar parse of a `Date` cell.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Whole numbers, including `12.0`; anything else is a missing value.
fn parse_quantity(cell: &str) -> Option<i64> {
    let s = cell.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

fn parse_score(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Counts distinct `Store_ID`s per `(Client_Name, Year)`. Rows with a blank
/// client or store are not counted.
pub fn store_history(table: &EnrichedTable) -> StoreHistoryTable {
    let mut stores: BTreeMap<(&str, i32), BTreeSet<&str>> = BTreeMap::new();
    for tx in table.rows() {
        let (Some(client), Some(store)) = (group_key(&tx.client_name), group_key(&tx.store_id))
        else {
            continue;
        };
        stores.entry((client, tx.year)).or_default().insert(store);
    }

    StoreHistoryTable::new(
        stores
            .into_iter()
            .map(|((client, year), ids)| StoreHistory {
                client_name: client.to_string(),
                year,
                store_count: ids.len(),
            })
            .collect(),
    )
}

fn with_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
