//! Volume per category over time, read as the making (production) trend.

use std::collections::BTreeMap;

use crate::analyzers::grain::{Bucket, TimeGrain};
use crate::analyzers::types::CategoryVolume;
use crate::error::NoData;
use crate::table::{EnrichedTable, group_key};

pub fn production_trend(
    table: &EnrichedTable,
    grain: TimeGrain,
) -> Result<Vec<CategoryVolume>, NoData> {
    let volumes = volumes_by_bucket_and_category(table, grain);
    if volumes.is_empty() {
        return Err(NoData);
    }

    Ok(volumes
        .into_iter()
        .map(|((bucket, category), quantity_sold)| CategoryVolume {
            bucket,
            category,
            quantity_sold,
        })
        .collect())
}

/// Summed quantity keyed by `(bucket, Category)`, iterated bucket first.
/// Rows with a blank key are left out.
pub(crate) fn volumes_by_bucket_and_category(
    table: &EnrichedTable,
    grain: TimeGrain,
) -> BTreeMap<(Bucket, String), i64> {
    let mut volumes: BTreeMap<(Bucket, String), i64> = BTreeMap::new();
    for tx in table.rows() {
        let (Some(bucket), Some(category)) = (grain.bucket(tx), group_key(&tx.category)) else {
            continue;
        };
        *volumes
            .entry((bucket, category.to_string()))
            .or_default() += tx.quantity();
    }
    volumes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::tx;

    #[test]
    fn test_volumes_grouped_and_ordered() {
        let table = EnrichedTable::new(vec![
            tx("2024-02-01", "A", "Rings", "Low", 4),
            tx("2023-05-01", "A", "Rings", "Low", 1),
            tx("2023-06-01", "B", "Bangles", "Low", 2),
            tx("2023-07-01", "B", "Rings", "Low", 3),
        ]);

        let rows = production_trend(&table, TimeGrain::Year).unwrap();
        let got: Vec<_> = rows
            .iter()
            .map(|r| (r.bucket.clone(), r.category.as_str(), r.quantity_sold))
            .collect();
        assert_eq!(
            got,
            vec![
                (Bucket::Year(2023), "Bangles", 2),
                (Bucket::Year(2023), "Rings", 4),
                (Bucket::Year(2024), "Rings", 4),
            ]
        );
    }

    #[test]
    fn test_seasonal_buckets_order_by_label() {
        let table = EnrichedTable::new(vec![
            tx("2023-01-01", "A", "Rings", "Low", 1),
            tx("2023-04-01", "A", "Rings", "Low", 1),
            tx("2023-10-01", "A", "Rings", "Low", 1),
        ]);
        let rows = production_trend(&table, TimeGrain::Season).unwrap();
        let buckets: Vec<_> = rows.iter().map(|r| r.bucket.to_string()).collect();
        assert_eq!(buckets, vec!["Autumn/Festival", "Spring/Summer", "Winter"]);
    }

    #[test]
    fn test_empty_is_no_data() {
        assert_eq!(
            production_trend(&EnrichedTable::default(), TimeGrain::MonthYear),
            Err(NoData)
        );
    }
}
