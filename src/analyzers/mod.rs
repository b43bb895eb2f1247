//! Aggregations behind every table and chart of the dashboard.
//!
//! Each function reads an enriched table (or the store-history table),
//! answers one question and returns a small result table. None of them
//! mutate their input; an empty input yields [`NoData`](crate::error::NoData)
//! rather than an empty result.

pub mod change;
pub mod grain;
pub mod price;
pub mod production;
pub mod ranking;
pub mod service;
pub mod stores;
pub mod taste;
pub mod types;
pub mod utility;

pub use change::{category_sales_change, client_count_change};
pub use grain::{Bucket, TimeGrain};
pub use price::price_band_preference;
pub use production::production_trend;
pub use ranking::{RANK_LIMIT, rank_categories_by_quantity, rank_clients_by_quantity};
pub use service::service_risk;
pub use stores::store_count_by_year;
pub use taste::{taste_breakdown, taste_path};
pub use types::Direction;
