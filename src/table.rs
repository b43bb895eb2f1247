//! In-memory tables produced by ingestion.
//!
//! Both tables are built once per upload and only read afterwards; filtering
//! produces a new table instead of touching the original.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::season::Season;

/// Selector value meaning "do not filter on this column".
pub const ALL: &str = "All";

/// A text cell as a grouping key. Blank cells are missing values and never
/// form a group of their own.
pub fn group_key(cell: &str) -> Option<&str> {
    (!cell.trim().is_empty()).then_some(cell)
}

/// One sales transaction after date parsing and enrichment.
///
/// Field names serialize to the ledger's column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Client_Name")]
    pub client_name: String,
    #[serde(rename = "Store_ID")]
    pub store_id: String,
    #[serde(rename = "Store_State")]
    pub store_state: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Price_Band")]
    pub price_band: String,
    /// `None` when the cell was empty or not an integer.
    #[serde(rename = "Quantity_Sold")]
    pub quantity_sold: Option<i64>,
    #[serde(rename = "Customer_Service_Score")]
    pub customer_service_score: Option<f64>,
    #[serde(rename = "Festival")]
    pub festival: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month_Year")]
    pub month_year: String,
    #[serde(rename = "Season")]
    pub season: Season,
}

/// Raw column values of one transaction, before the derived fields exist.
#[derive(Debug, Clone, Default)]
pub struct RawTransaction {
    pub client_name: String,
    pub store_id: String,
    pub store_state: String,
    pub category: String,
    pub price_band: String,
    pub quantity_sold: Option<i64>,
    pub customer_service_score: Option<f64>,
    pub festival: String,
}

impl Transaction {
    /// Attaches `Year`, `Month_Year` and `Season`, all taken from `date`.
    pub fn enrich(date: NaiveDate, raw: RawTransaction) -> Self {
        Transaction {
            date,
            client_name: raw.client_name,
            store_id: raw.store_id,
            store_state: raw.store_state,
            category: raw.category,
            price_band: raw.price_band,
            quantity_sold: raw.quantity_sold,
            customer_service_score: raw.customer_service_score,
            festival: raw.festival,
            year: date.year(),
            month_year: month_year(date),
            season: Season::from_month(date.month()),
        }
    }

    /// Quantity with missing cells counted as nothing sold.
    pub fn quantity(&self) -> i64 {
        self.quantity_sold.unwrap_or(0)
    }
}

/// `YYYY-MM`, zero padded so string order is calendar order.
pub fn month_year(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Equality filters chosen on the analytics page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub client: Option<String>,
    pub category: Option<String>,
}

impl Filter {
    /// Builds a filter from selector values, where [`ALL`] disables a column.
    pub fn from_selection(client: &str, category: &str) -> Self {
        let pick = |v: &str| (v != ALL).then(|| v.to_string());
        Filter {
            client: pick(client),
            category: pick(category),
        }
    }

    pub fn is_active(&self) -> bool {
        self.client.is_some() || self.category.is_some()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        let client_ok = self
            .client
            .as_deref()
            .is_none_or(|c| tx.client_name == c);
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| tx.category == c);
        client_ok && category_ok
    }
}

/// The canonical enriched transaction table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnrichedTable {
    rows: Vec<Transaction>,
}

impl EnrichedTable {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn filter(&self, filter: &Filter) -> EnrichedTable {
        if !filter.is_active() {
            return self.clone();
        }
        EnrichedTable::new(
            self.rows
                .iter()
                .filter(|tx| filter.matches(tx))
                .cloned()
                .collect(),
        )
    }

    /// Earliest and latest `Year`, `None` for an empty table.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.rows.iter().map(|tx| tx.year).min()?;
        let max = self.rows.iter().map(|tx| tx.year).max()?;
        Some((min, max))
    }

    pub fn distinct_years(&self) -> usize {
        self.rows.iter().map(|tx| tx.year).collect::<BTreeSet<_>>().len()
    }

    /// Distinct client names in sorted order.
    pub fn clients(&self) -> Vec<String> {
        sorted_distinct(self.rows.iter().map(|tx| tx.client_name.as_str()))
    }

    /// Distinct categories in sorted order.
    pub fn categories(&self) -> Vec<String> {
        sorted_distinct(self.rows.iter().map(|tx| tx.category.as_str()))
    }

    /// Distinct price bands in the order they first appear.
    pub fn price_band_order(&self) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        for band in self.rows.iter().filter_map(|tx| group_key(&tx.price_band)) {
            if !order.iter().any(|b| b == band) {
                order.push(band.to_string());
            }
        }
        order
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter_map(group_key)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Number of distinct stores a client traded through in one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreHistory {
    #[serde(rename = "Client_Name")]
    pub client_name: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Store_Count")]
    pub store_count: usize,
}

/// Per-client, per-year store counts, ordered by client then year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StoreHistoryTable {
    rows: Vec<StoreHistory>,
}

impl StoreHistoryTable {
    pub fn new(rows: Vec<StoreHistory>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[StoreHistory] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
