//! Descriptive statistics for the uploader summary page.

use serde::Serialize;
use std::collections::HashSet;

use crate::analyzers::utility::{mean, sample_stddev};
use crate::table::{EnrichedTable, Transaction};

/// Headline metrics of a loaded ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_transactions: usize,
    /// `max(Year) - min(Year) + 1`, 0 for an empty table.
    pub time_span_years: i32,
    pub unique_clients: usize,
}

impl Overview {
    pub fn from_table(table: &EnrichedTable) -> Self {
        Overview {
            total_transactions: table.len(),
            time_span_years: table
                .year_range()
                .map_or(0, |(first, last)| last - first + 1),
            unique_clients: table.clients().len(),
        }
    }
}

/// Count, mean, spread and range of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    #[serde(rename = "Variable")]
    pub variable: String,
    #[serde(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Average")]
    pub average: Option<f64>,
    #[serde(rename = "Std Dev")]
    pub std_dev: Option<f64>,
    #[serde(rename = "Min Value")]
    pub min: Option<f64>,
    #[serde(rename = "Max Value")]
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Summarises the present values; missing ones are not counted.
    pub fn describe(variable: &str, values: &[f64]) -> Self {
        let average = mean(values);
        NumericSummary {
            variable: variable.to_string(),
            count: values.len(),
            average,
            std_dev: average.and_then(|m| sample_stddev(values, m)),
            min: values.iter().copied().reduce(f64::min),
            max: values.iter().copied().reduce(f64::max),
        }
    }
}

/// Type and completeness of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnQuality {
    #[serde(rename = "Column Name")]
    pub column: String,
    #[serde(rename = "Data Type")]
    pub data_type: String,
    #[serde(rename = "Non-Null Count")]
    pub non_null: usize,
    #[serde(rename = "Unique Values")]
    pub unique: usize,
    #[serde(rename = "Missing Values")]
    pub missing: usize,
}

/// Summaries for `Quantity_Sold`, `Customer_Service_Score` and `Year`.
pub fn numeric_summary(table: &EnrichedTable) -> Vec<NumericSummary> {
    let rows = table.rows();
    let quantity: Vec<f64> = rows
        .iter()
        .filter_map(|tx| tx.quantity_sold.map(|q| q as f64))
        .collect();
    let score: Vec<f64> = rows
        .iter()
        .filter_map(|tx| tx.customer_service_score)
        .collect();
    let year: Vec<f64> = rows.iter().map(|tx| tx.year as f64).collect();

    vec![
        NumericSummary::describe("Quantity_Sold", &quantity),
        NumericSummary::describe("Customer_Service_Score", &score),
        NumericSummary::describe("Year", &year),
    ]
}

type Cell = fn(&Transaction) -> Option<String>;

fn text(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Column name, type name and cell extractor, in table order.
const COLUMNS: &[(&str, &str, Cell)] = &[
    ("Date", "date", |tx| Some(tx.date.to_string())),
    ("Client_Name", "text", |tx| text(&tx.client_name)),
    ("Store_ID", "text", |tx| text(&tx.store_id)),
    ("Store_State", "text", |tx| text(&tx.store_state)),
    ("Category", "text", |tx| text(&tx.category)),
    ("Price_Band", "text", |tx| text(&tx.price_band)),
    ("Quantity_Sold", "integer", |tx| tx.quantity_sold.map(|q| q.to_string())),
    ("Customer_Service_Score", "float", |tx| {
        tx.customer_service_score.map(|s| s.to_string())
    }),
    ("Festival", "text", |tx| text(&tx.festival)),
    ("Year", "integer", |tx| Some(tx.year.to_string())),
    ("Month_Year", "text", |tx| Some(tx.month_year.clone())),
    ("Season", "text", |tx| Some(tx.season.label().to_string())),
];

/// Non-null, unique and missing counts for every column. Empty text cells
/// count as missing.
pub fn data_quality(table: &EnrichedTable) -> Vec<ColumnQuality> {
    COLUMNS
        .iter()
        .map(|(column, data_type, cell)| {
            let present: Vec<String> = table.rows().iter().filter_map(|tx| cell(tx)).collect();
            let unique = present.iter().collect::<HashSet<_>>().len();
            ColumnQuality {
                column: column.to_string(),
                data_type: data_type.to_string(),
                non_null: present.len(),
                unique,
                missing: table.len() - present.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::tx;

    fn sample() -> EnrichedTable {
        let mut missing = tx("2024-03-01", "B", "Rings", "Low", 0);
        missing.quantity_sold = None;
        missing.customer_service_score = None;
        missing.festival = String::new();

        EnrichedTable::new(vec![
            tx("2022-01-01", "A", "Rings", "Low", 2),
            tx("2023-01-01", "A", "Chains", "High", 4),
            missing,
        ])
    }

    #[test]
    fn test_overview() {
        let overview = Overview::from_table(&sample());
        assert_eq!(overview.total_transactions, 3);
        assert_eq!(overview.time_span_years, 3);
        assert_eq!(overview.unique_clients, 2);
        assert_eq!(Overview::from_table(&EnrichedTable::default()).time_span_years, 0);
    }

    #[test]
    fn test_numeric_summary_skips_missing() {
        let summary = numeric_summary(&sample());
        let qty = &summary[0];
        assert_eq!(qty.variable, "Quantity_Sold");
        assert_eq!(qty.count, 2);
        assert_eq!(qty.average, Some(3.0));
        assert_eq!(qty.min, Some(2.0));
        assert_eq!(qty.max, Some(4.0));
        assert!((qty.std_dev.unwrap() - 2f64.sqrt()).abs() < 1e-12);

        let year = &summary[2];
        assert_eq!(year.count, 3);
        assert_eq!(year.average, Some(2023.0));
    }

    #[test]
    fn test_describe_single_and_empty() {
        let one = NumericSummary::describe("x", &[7.0]);
        assert_eq!(one.std_dev, None);
        assert_eq!(one.min, Some(7.0));

        let none = NumericSummary::describe("x", &[]);
        assert_eq!(none.count, 0);
        assert_eq!(none.average, None);
        assert_eq!(none.max, None);
    }

    #[test]
    fn test_data_quality_counts() {
        let quality = data_quality(&sample());
        assert_eq!(quality.len(), 12);

        let by_name = |name: &str| quality.iter().find(|q| q.column == name).unwrap();
        let qty = by_name("Quantity_Sold");
        assert_eq!((qty.non_null, qty.missing, qty.unique), (2, 1, 2));

        let festival = by_name("Festival");
        assert_eq!((festival.non_null, festival.missing), (2, 1));

        let clients = by_name("Client_Name");
        assert_eq!((clients.unique, clients.missing), (2, 0));
        assert_eq!(by_name("Season").data_type, "text");
    }
}
