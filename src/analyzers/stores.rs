use std::collections::BTreeMap;

use crate::analyzers::types::YearStores;
use crate::error::NoData;
use crate::table::StoreHistoryTable;

/// Sums `Store_Count` per year from the store-history table, optionally for
/// a single client.
pub fn store_count_by_year(
    history: &StoreHistoryTable,
    client: Option<&str>,
) -> Result<Vec<YearStores>, NoData> {
    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for row in history.rows() {
        if client.is_some_and(|c| row.client_name != c) {
            continue;
        }
        *per_year.entry(row.year).or_default() += row.store_count;
    }

    if per_year.is_empty() {
        return Err(NoData);
    }

    Ok(per_year
        .into_iter()
        .map(|(year, store_count)| YearStores { year, store_count })
        .collect())
}
