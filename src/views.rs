//! Page builders.
//!
//! Each page reads the session's tables, runs the aggregations it needs and
//! pairs every result with its chart specification. Which table an
//! aggregation sees (full or filtered) is decided here.

use serde::Serialize;
use tracing::{debug, warn};

use crate::analyzers::types::{
    CategoryChange, CategoryTotal, CategoryVolume, ClientCountChange, ClientTotal,
    PriceBandPreference, ServiceRisk, TasteBreakdown, YearStores,
};
use crate::analyzers::{
    Direction, RANK_LIMIT, TimeGrain, category_sales_change, client_count_change,
    price_band_preference, production_trend, rank_categories_by_quantity,
    rank_clients_by_quantity, service_risk, store_count_by_year, taste_breakdown, taste_path,
};
use crate::chart::{BarMode, ChartSpec};
use crate::error::NoData;
use crate::ingest::IngestSummary;
use crate::session::Session;
use crate::stats::{ColumnQuality, NumericSummary, Overview, data_quality, numeric_summary};
use crate::table::{ALL, Filter};

/// Field every time-series row uses for its bucket.
const BUCKET: &str = "Bucket";

/// A chart and the rows behind it, or a warning when there are none.
#[derive(Debug, Clone, Serialize)]
pub struct Panel<T> {
    pub chart: ChartSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> Panel<T> {
    fn new(chart: ChartSpec, result: Result<T, NoData>, warning: &str) -> Self {
        match result {
            Ok(data) => Panel {
                chart,
                data: Some(data),
                warning: None,
            },
            Err(NoData) => {
                debug!(title = %chart.title, "Panel has no data");
                Panel {
                    chart,
                    data: None,
                    warning: Some(warning.to_string()),
                }
            }
        }
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

/// Uploader page: what was loaded and how complete it is.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub overview: Overview,
    pub top_clients: Vec<ClientTotal>,
    pub numeric_summary: Vec<NumericSummary>,
    pub data_quality: Vec<ColumnQuality>,
}

impl SummaryView {
    #[tracing::instrument(skip_all)]
    pub fn build(session: &Session) -> Result<Self, NoData> {
        let table = session.get_enriched_table();
        let top_clients = rank_clients_by_quantity(table, Direction::Top, RANK_LIMIT)?;

        Ok(SummaryView {
            message: session.summary().map(IngestSummary::to_string),
            overview: Overview::from_table(table),
            top_clients,
            numeric_summary: numeric_summary(table),
            data_quality: data_quality(table),
        })
    }
}

/// Details page: best and worst clients and categories over the full ledger.
#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub top_clients: Vec<ClientTotal>,
    pub bottom_clients: Vec<ClientTotal>,
    pub top_categories: Vec<CategoryTotal>,
    pub bottom_categories: Vec<CategoryTotal>,
}

impl DetailsView {
    #[tracing::instrument(skip_all)]
    pub fn build(session: &Session) -> Result<Self, NoData> {
        let table = session.get_enriched_table();
        Ok(DetailsView {
            top_clients: rank_clients_by_quantity(table, Direction::Top, RANK_LIMIT)?,
            bottom_clients: rank_clients_by_quantity(table, Direction::Bottom, RANK_LIMIT)?,
            top_categories: rank_categories_by_quantity(table, Direction::Top, RANK_LIMIT)?,
            bottom_categories: rank_categories_by_quantity(table, Direction::Bottom, RANK_LIMIT)?,
        })
    }
}

/// User choices on the analytics page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub grain: TimeGrain,
    /// A client name or [`ALL`].
    pub client: String,
    /// A category or [`ALL`].
    pub category: String,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            grain: TimeGrain::default(),
            client: ALL.to_string(),
            category: ALL.to_string(),
        }
    }
}

impl Selection {
    pub fn filter(&self) -> Filter {
        Filter::from_selection(&self.client, &self.category)
    }
}

/// Analytics page: seven panels answering the nine dashboard questions.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsView {
    pub time_aggregation: String,
    pub time_column: String,
    pub client_options: Vec<String>,
    pub category_options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub category_sales_change: Panel<Vec<CategoryChange>>,
    pub client_count_change: Panel<Vec<ClientCountChange>>,
    pub store_count: Panel<Vec<YearStores>>,
    pub taste: Panel<TasteBreakdown>,
    pub service_risk: Panel<Vec<ServiceRisk>>,
    pub production_trend: Panel<Vec<CategoryVolume>>,
    pub price_band_preference: Panel<PriceBandPreference>,
}

impl AnalyticsView {
    #[tracing::instrument(skip_all, fields(grain = %selection.grain, client = %selection.client, category = %selection.category))]
    pub fn build(session: &Session, selection: &Selection) -> Result<Self, NoData> {
        let full = session.get_enriched_table();
        if full.is_empty() {
            return Err(NoData);
        }

        let filter = selection.filter();
        let filtered = full.filter(&filter);
        let warning = if filtered.is_empty() && filter.is_active() {
            warn!("No rows match the selected filters");
            Some(NoData.to_string())
        } else {
            None
        };

        let grain = selection.grain;
        let label = grain.label();
        let time_col = grain.column();
        let client_selected = filter.client.is_some();

        let category_sales_change = Panel::new(
            ChartSpec::line(
                format!("Q1: Category Sales % Change ({label} over {label})"),
                BUCKET,
                "Sales_Change_%",
            )
            .color("Category")
            .label(BUCKET, time_col)
            .hover(&["Category", "Quantity_Sold", "Sales_Change_%"]),
            category_sales_change(&filtered, grain),
            "Cannot calculate Category Sales Change. Please adjust filters.",
        );

        let client_count_change = Panel::new(
            ChartSpec::bar(
                format!("Q3: Client Count Change % ({label})"),
                BUCKET,
                "Client_Change_%",
            )
            .color("Client_Change_%")
            .label(BUCKET, time_col)
            .hover(&["Client_Count"]),
            client_count_change(full, grain),
            "Cannot calculate Client Count Change.",
        );

        let store_count = Panel::new(
            ChartSpec::bar(
                "Q2: Total Stores Active (Yearly - Filtered by Client)",
                "Year",
                "Store_Count",
            )
            .hover(&["Store_Count"]),
            store_count_by_year(session.get_store_history(), filter.client.as_deref()),
            "Store history data is not available.",
        );

        let path: Vec<String> = taste_path(grain, client_selected)
            .into_iter()
            .map(|col| if col == time_col { BUCKET.to_string() } else { col })
            .collect();
        let taste = Panel::new(
            ChartSpec::treemap(
                format!("Q4/Q5/Q6: Client Taste and Needs Breakdown ({label})"),
                &path,
                "Quantity_Sold",
            )
            .color("Quantity_Sold")
            .label(BUCKET, time_col)
            .hover(&["Client_Name", "Category", "Quantity_Sold"]),
            taste_breakdown(&filtered, grain, client_selected),
            "Cannot calculate Client Taste. Please adjust filters.",
        );

        let service_risk = Panel::new(
            ChartSpec::scatter(
                "Q7: Service Score vs. Total Sales (Identify High Risk Clients)",
                "Avg_Service_Score",
                "Total_Sales",
            )
            .size("Total_Sales")
            .color("Client_Name")
            .label("Avg_Service_Score", "Average Service Score (Lower is Riskier)")
            .hover(&["Client_Name", "Avg_Service_Score", "Total_Sales"]),
            service_risk(full),
            "Cannot calculate Service Risk.",
        );

        let production_trend = Panel::new(
            ChartSpec::bar(
                format!("Q8: Jewellery Making Volume by Category ({label})"),
                BUCKET,
                "Quantity_Sold",
            )
            .color("Category")
            .barmode(BarMode::Stack)
            .label(BUCKET, time_col)
            .label("Quantity_Sold", "Total Pieces (Inferred Production)")
            .hover(&["Category", "Quantity_Sold"]),
            production_trend(&filtered, grain),
            "Cannot calculate Jewellery Making Trend. Please adjust filters.",
        );

        let band_order = full.price_band_order();
        let price_band_preference = Panel::new(
            ChartSpec::bar(
                format!("Q9: Preferred Price Band by Client ({label})"),
                "Price_Band",
                "Quantity_Sold",
            )
            .color(BUCKET)
            .barmode(BarMode::Group)
            .label(BUCKET, time_col)
            .label("Quantity_Sold", "Total Quantity Sold")
            .category_order("Price_Band", band_order.clone())
            .hover(&["Price_Band", "Quantity_Sold"]),
            price_band_preference(&filtered, grain, &band_order),
            "Cannot calculate Preferred Price Range. Please adjust filters.",
        );

        let view = AnalyticsView {
            time_aggregation: label.to_string(),
            time_column: time_col.to_string(),
            client_options: with_all(full.clients()),
            category_options: with_all(full.categories()),
            warning,
            category_sales_change,
            client_count_change,
            store_count,
            taste,
            service_risk,
            production_trend,
            price_band_preference,
        };
        debug!(panels_with_data = view.panels_with_data(), "Analytics page built");
        Ok(view)
    }

    /// How many of the seven panels have rows to draw.
    pub fn panels_with_data(&self) -> usize {
        [
            self.category_sales_change.has_data(),
            self.client_count_change.has_data(),
            self.store_count.has_data(),
            self.taste.has_data(),
            self.service_risk.has_data(),
            self.production_trend.has_data(),
            self.price_band_preference.has_data(),
        ]
        .into_iter()
        .filter(|&has| has)
        .count()
    }
}

fn with_all(mut options: Vec<String>) -> Vec<String> {
    options.insert(0, ALL.to_string());
    options
}
