//! Period-over-period percent change series.
//!
//! A bucket without a predecessor, or whose predecessor is zero, reports a
//! change of 0 so the charts never show gaps. This makes "no earlier data"
//! look the same as "no change".

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use crate::analyzers::grain::{Bucket, TimeGrain};
use crate::analyzers::production::volumes_by_bucket_and_category;
use crate::analyzers::types::{CategoryChange, ClientCountChange};
use crate::analyzers::utility::{pct_change, pct_changes};
use crate::error::NoData;
use crate::table::{EnrichedTable, group_key};

/// Quantity per `(bucket, Category)` with the change against the same
/// category's previous bucket. Rows are ordered by bucket, then category.
pub fn category_sales_change(
    table: &EnrichedTable,
    grain: TimeGrain,
) -> Result<Vec<CategoryChange>, NoData> {
    let volumes = volumes_by_bucket_and_category(table, grain);
    if volumes.is_empty() {
        return Err(NoData);
    }

    let mut previous: HashMap<String, i64> = HashMap::new();
    let mut out = Vec::new();

    for ((bucket, category), quantity_sold) in volumes {
        let sales_change_pct = previous
            .get(&category)
            .map_or(0.0, |&prev| pct_change(prev as f64, quantity_sold as f64));
        previous.insert(category.clone(), quantity_sold);

        out.push(CategoryChange {
            bucket,
            category,
            quantity_sold,
            sales_change_pct,
        });
    }

    debug!(grain = grain.column(), rows = out.len(), "Category sales change computed");
    Ok(out)
}

/// Distinct client count per bucket with the change against the previous
/// bucket. Meant for the full table whatever filters are active.
pub fn client_count_change(
    table: &EnrichedTable,
    grain: TimeGrain,
) -> Result<Vec<ClientCountChange>, NoData> {
    let mut clients: BTreeMap<Bucket, BTreeSet<&str>> = BTreeMap::new();
    for tx in table.rows() {
        let (Some(bucket), Some(client)) = (grain.bucket(tx), group_key(&tx.client_name)) else {
            continue;
        };
        clients.entry(bucket).or_default().insert(client);
    }
    if clients.is_empty() {
        return Err(NoData);
    }

    let counts: Vec<(Bucket, usize)> = clients
        .into_iter()
        .map(|(bucket, names)| (bucket, names.len()))
        .collect();
    let series: Vec<f64> = counts.iter().map(|(_, n)| *n as f64).collect();

    Ok(counts
        .into_iter()
        .zip(pct_changes(&series))
        .map(|((bucket, client_count), client_change_pct)| ClientCountChange {
            bucket,
            client_count,
            client_change_pct,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::tx;

    #[test]
    fn test_category_change_within_category() {
        let table = EnrichedTable::new(vec![
            tx("2022-01-10", "A", "Rings", "Low", 10),
            tx("2023-01-10", "A", "Rings", "Low", 20),
            tx("2024-01-10", "A", "Rings", "Low", 15),
        ]);

        let rows = category_sales_change(&table, TimeGrain::Year).unwrap();
        let pct: Vec<f64> = rows.iter().map(|r| r.sales_change_pct).collect();
        assert_eq!(pct, vec![0.0, 100.0, -25.0]);
        assert_eq!(rows[2].bucket, Bucket::Year(2024));
    }

    #[test]
    fn test_category_change_skips_buckets_a_category_is_absent_from() {
        let table = EnrichedTable::new(vec![
            tx("2023-01-10", "A", "Rings", "Low", 10),
            tx("2023-01-11", "A", "Chains", "Low", 4),
            tx("2023-02-10", "A", "Chains", "Low", 8),
            tx("2023-03-10", "A", "Rings", "Low", 5),
        ]);

        let rows = category_sales_change(&table, TimeGrain::MonthYear).unwrap();
        let got: Vec<_> = rows
            .iter()
            .map(|r| (r.bucket.to_string(), r.category.as_str(), r.sales_change_pct))
            .collect();
        assert_eq!(
            got,
            vec![
                ("2023-01".to_string(), "Chains", 0.0),
                ("2023-01".to_string(), "Rings", 0.0),
                ("2023-02".to_string(), "Chains", 100.0),
                ("2023-03".to_string(), "Rings", -50.0),
            ]
        );
    }

    #[test]
    fn test_category_change_from_zero_is_zero() {
        let table = EnrichedTable::new(vec![
            tx("2022-05-01", "A", "Rings", "Low", 0),
            tx("2023-05-01", "A", "Rings", "Low", 7),
        ]);
        let rows = category_sales_change(&table, TimeGrain::Year).unwrap();
        assert_eq!(rows[1].sales_change_pct, 0.0);
        assert!(rows.iter().all(|r| r.sales_change_pct.is_finite()));
    }

    #[test]
    fn test_client_count_change_global() {
        let table = EnrichedTable::new(vec![
            tx("2022-01-01", "A", "Rings", "Low", 1),
            tx("2022-02-01", "B", "Rings", "Low", 1),
            tx("2022-03-01", "A", "Rings", "Low", 1),
            tx("2023-01-01", "A", "Rings", "Low", 1),
            tx("2024-01-01", "A", "Rings", "Low", 1),
            tx("2024-01-01", "B", "Rings", "Low", 1),
            tx("2024-01-01", "C", "Chains", "Low", 1),
        ]);

        let rows = client_count_change(&table, TimeGrain::Year).unwrap();
        let got: Vec<_> = rows
            .iter()
            .map(|r| (r.bucket.clone(), r.client_count, r.client_change_pct))
            .collect();
        assert_eq!(
            got,
            vec![
                (Bucket::Year(2022), 2, 0.0),
                (Bucket::Year(2023), 1, -50.0),
                (Bucket::Year(2024), 3, 200.0),
            ]
        );
    }

    #[test]
    fn test_empty_is_no_data() {
        let empty = EnrichedTable::default();
        assert_eq!(category_sales_change(&empty, TimeGrain::Year), Err(NoData));
        assert_eq!(client_count_change(&empty, TimeGrain::Season), Err(NoData));
    }

    #[test]
    fn test_blank_festival_forms_no_bucket() {
        let mut blank = tx("2023-01-10", "B", "Rings", "Low", 8);
        blank.festival = String::new();
        let mut diwali = tx("2023-11-12", "A", "Rings", "Low", 3);
        diwali.festival = "Diwali".into();
        let table = EnrichedTable::new(vec![blank, diwali, tx("2023-02-01", "A", "Rings", "Low", 6)]);

        let rows = category_sales_change(&table, TimeGrain::Festival).unwrap();
        let buckets: Vec<_> = rows.iter().map(|r| r.bucket.to_string()).collect();
        assert_eq!(buckets, vec!["Diwali", "None"]);

        let counts = client_count_change(&table, TimeGrain::Festival).unwrap();
        assert!(counts.iter().all(|r| r.bucket != Bucket::Label(String::new())));
        assert_eq!(counts.len(), 2);
    }
}
