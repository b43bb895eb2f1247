//! Rendering and export of page views.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of the
//! result tables behind each page.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Debug;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::views::{AnalyticsView, DetailsView, Panel, SummaryView};

/// Writes a view to stdout using Rust's debug pretty-print format.
pub fn print_pretty(view: &impl Debug) {
    println!("{:#?}", view);
}

/// Writes a view to stdout as pretty-printed JSON.
pub fn print_json(view: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(view)?);
    Ok(())
}

/// Writes `rows` to a CSV file at `path`, header first, replacing any
/// existing file.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

fn write_into(dir: &Path, name: &str, rows: &[impl Serialize]) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.csv"));
    write_table(&path, rows)?;
    Ok(path)
}

pub fn export_summary(dir: &Path, view: &SummaryView) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let written = vec![
        write_into(dir, "top_clients", &view.top_clients)?,
        write_into(dir, "numeric_summary", &view.numeric_summary)?,
        write_into(dir, "data_quality", &view.data_quality)?,
    ];
    info!(dir = %dir.display(), files = written.len(), "Summary tables exported");
    Ok(written)
}

pub fn export_details(dir: &Path, view: &DetailsView) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let written = vec![
        write_into(dir, "top_clients", &view.top_clients)?,
        write_into(dir, "bottom_clients", &view.bottom_clients)?,
        write_into(dir, "top_categories", &view.top_categories)?,
        write_into(dir, "bottom_categories", &view.bottom_categories)?,
    ];
    info!(dir = %dir.display(), files = written.len(), "Details tables exported");
    Ok(written)
}

/// Exports every analytics panel that has data. The treemap is written as
/// its flat leaves.
pub fn export_analytics(dir: &Path, view: &AnalyticsView) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    fn panel_rows<T: Serialize>(
        dir: &Path,
        name: &str,
        panel: &Panel<Vec<T>>,
        written: &mut Vec<PathBuf>,
    ) -> Result<()> {
        if let Some(rows) = &panel.data {
            written.push(write_into(dir, name, rows)?);
        }
        Ok(())
    }

    panel_rows(dir, "q1_category_sales_change", &view.category_sales_change, &mut written)?;
    panel_rows(dir, "q3_client_count_change", &view.client_count_change, &mut written)?;
    panel_rows(dir, "q2_store_count", &view.store_count, &mut written)?;
    if let Some(taste) = &view.taste.data {
        written.push(write_into(dir, "q4_taste_breakdown", &taste.leaves)?);
    }
    panel_rows(dir, "q7_service_risk", &view.service_risk, &mut written)?;
    panel_rows(dir, "q8_production_trend", &view.production_trend, &mut written)?;
    if let Some(pref) = &view.price_band_preference.data {
        written.push(write_into(dir, "q9_price_band_preference", &pref.rows)?);
    }

    info!(dir = %dir.display(), files = written.len(), "Analytics tables exported");
    Ok(written)
}
