//! Time granularity used to bucket transactions on the analytics page.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::table::{Transaction, group_key};

/// Column a time series is grouped by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum TimeGrain {
    #[default]
    MonthYear,
    Year,
    Season,
    Festival,
}

impl TimeGrain {
    pub const ALL: [TimeGrain; 4] = [
        TimeGrain::MonthYear,
        TimeGrain::Year,
        TimeGrain::Season,
        TimeGrain::Festival,
    ];

    /// Name of the enriched-table column holding the bucket.
    pub fn column(&self) -> &'static str {
        match self {
            TimeGrain::MonthYear => "Month_Year",
            TimeGrain::Year => "Year",
            TimeGrain::Season => "Season",
            TimeGrain::Festival => "Festival",
        }
    }

    /// Selector label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            TimeGrain::MonthYear => "Monthly",
            TimeGrain::Year => "Yearly",
            TimeGrain::Season => "Seasonal",
            TimeGrain::Festival => "Festival",
        }
    }

    /// Bucket of `tx`, `None` when its `Festival` cell is blank.
    pub fn bucket(&self, tx: &Transaction) -> Option<Bucket> {
        let bucket = match self {
            TimeGrain::MonthYear => Bucket::Label(tx.month_year.clone()),
            TimeGrain::Year => Bucket::Year(tx.year),
            TimeGrain::Season => Bucket::Label(tx.season.label().to_string()),
            TimeGrain::Festival => Bucket::Label(group_key(&tx.festival)?.to_string()),
        };
        Some(bucket)
    }
}

impl FromStr for TimeGrain {
    type Err = String;

    /// Accepts either the selector label or the column name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TimeGrain::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(s) || g.column().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown time aggregation '{s}' (expected Monthly, Yearly, Seasonal or Festival)")
            })
    }
}

impl fmt::Display for TimeGrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One distinct value of the chosen time column.
///
/// Years order numerically, every other grain orders as text. A series only
/// ever holds one variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Bucket {
    Year(i32),
    Label(String),
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Year(y) => write!(f, "{y}"),
            Bucket::Label(s) => f.write_str(s),
        }
    }
}
