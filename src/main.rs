//! CLI entry point for the sales dashboard.
//!
//! Loads a sales ledger from a file or URL, then renders one dashboard
//! page: the upload summary, the client/category details, or the
//! analytics panels for a time aggregation and filter selection.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sales_dashboard::{
    analyzers::TimeGrain,
    output::{export_analytics, export_details, export_summary, print_json, print_pretty},
    session::Session,
    source::load_bytes,
    table::ALL,
    views::{AnalyticsView, DetailsView, Selection, SummaryView},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sales_dashboard")]
#[command(about = "Explore a jewellery sales ledger", long_about = None)]
struct Cli {
    /// CSV (optionally gzipped) file or URL holding the sales ledger
    #[arg(short, long, env = "SALES_DATA_FILE", default_value = "Sales Dataset.csv")]
    source: String,

    /// Directory to write the page's result tables to as CSV
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Print the page as JSON instead of debug output
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    page: Option<Page>,
}

#[derive(Subcommand)]
enum Page {
    /// Upload summary: overview, top clients, numeric summary, data quality
    Summary,
    /// Top and bottom clients and categories by quantity sold
    Details,
    /// Time-series and comparison panels
    Analytics {
        /// Time aggregation: Monthly, Yearly, Seasonal or Festival
        #[arg(short, long, default_value = "Monthly")]
        time: TimeGrain,

        /// Client to focus on, or "All"
        #[arg(short, long, default_value = ALL)]
        client: String,

        /// Category to focus on, or "All"
        #[arg(short = 'g', long, default_value = ALL)]
        category: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/sales_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sales_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("RUST_LOG")
                .from_env_lossy(),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .with_env_var("RUST_LOG_JSON")
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let bytes = load_bytes(&cli.source)?;
    let mut session = Session::new();
    match session.ingest(&bytes) {
        Ok(summary) => info!(source = %cli.source, "{summary}"),
        Err(e) => {
            error!(source = %cli.source, error = %e, "Upload rejected");
            return Err(e.into());
        }
    }

    match cli.page.unwrap_or(Page::Summary) {
        Page::Summary => {
            let view = SummaryView::build(&session)?;
            render(&view, cli.json)?;
            if let Some(dir) = &cli.export_dir {
                export_summary(dir, &view)?;
            }
        }
        Page::Details => {
            let view = DetailsView::build(&session)?;
            render(&view, cli.json)?;
            if let Some(dir) = &cli.export_dir {
                export_details(dir, &view)?;
            }
        }
        Page::Analytics {
            time,
            client,
            category,
        } => {
            let selection = Selection {
                grain: time,
                client,
                category,
            };
            let view = AnalyticsView::build(&session, &selection)?;
            render(&view, cli.json)?;
            if let Some(dir) = &cli.export_dir {
                export_analytics(dir, &view)?;
            }
        }
    }

    Ok(())
}

fn render<T: serde::Serialize + std::fmt::Debug>(view: &T, json: bool) -> Result<()> {
    if json {
        print_json(view)
    } else {
        print_pretty(view);
        Ok(())
    }
}
