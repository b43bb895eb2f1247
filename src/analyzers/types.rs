//! Result rows returned by the aggregation functions.
//!
//! Field names serialize to the column names the charts bind to. The time
//! bucket is always exposed as `Bucket`; the chart labels it with the
//! selected time column.

use serde::Serialize;

use crate::analyzers::grain::Bucket;

/// Which end of a ranking to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Top,
    Bottom,
}

/// Summed quantity for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientTotal {
    #[serde(rename = "Client_Name")]
    pub client_name: String,
    #[serde(rename = "Quantity_Sold")]
    pub quantity_sold: i64,
}

/// Summed quantity for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity_Sold")]
    pub quantity_sold: i64,
}

/// Category volume in one bucket and its change against the category's
/// previous bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChange {
    #[serde(rename = "Bucket")]
    pub bucket: Bucket,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity_Sold")]
    pub quantity_sold: i64,
    #[serde(rename = "Sales_Change_%")]
    pub sales_change_pct: f64,
}

/// Distinct client count in one bucket and its change against the previous
/// bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientCountChange {
    #[serde(rename = "Bucket")]
    pub bucket: Bucket,
    #[serde(rename = "Client_Count")]
    pub client_count: usize,
    #[serde(rename = "Client_Change_%")]
    pub client_change_pct: f64,
}

/// Stores active in one year, summed over the selected clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearStores {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Store_Count")]
    pub store_count: usize,
}

/// Quantity for one `(Client_Name, bucket, Category)` combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TasteLeaf {
    #[serde(rename = "Client_Name")]
    pub client_name: String,
    #[serde(rename = "Bucket")]
    pub bucket: Bucket,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity_Sold")]
    pub quantity_sold: i64,
}

/// A node of the taste treemap; `value` is the sum over its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreemapNode {
    pub label: String,
    pub value: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreemapNode>,
}

/// Flat leaves plus the nested tree along `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TasteBreakdown {
    /// Column names from the outermost to the innermost level.
    pub path: Vec<String>,
    pub leaves: Vec<TasteLeaf>,
    pub tree: Vec<TreemapNode>,
}

/// Average service score against total volume for one client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRisk {
    #[serde(rename = "Client_Name")]
    pub client_name: String,
    /// `None` when none of the client's rows carried a score.
    #[serde(rename = "Avg_Service_Score")]
    pub avg_service_score: Option<f64>,
    #[serde(rename = "Total_Sales")]
    pub total_sales: i64,
}

/// Category volume in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryVolume {
    #[serde(rename = "Bucket")]
    pub bucket: Bucket,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity_Sold")]
    pub quantity_sold: i64,
}

/// Price band volume in one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBandVolume {
    #[serde(rename = "Price_Band")]
    pub price_band: String,
    #[serde(rename = "Bucket")]
    pub bucket: Bucket,
    #[serde(rename = "Quantity_Sold")]
    pub quantity_sold: i64,
}

/// Price band volumes with the band order the chart must follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBandPreference {
    pub band_order: Vec<String>,
    pub rows: Vec<PriceBandVolume>,
}
