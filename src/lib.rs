pub mod analyzers;
pub mod chart;
pub mod error;
pub mod ingest;
pub mod output;
pub mod season;
pub mod session;
pub mod source;
pub mod stats;
pub mod table;
pub mod views;
