//! Preferred price band per time bucket.

use std::collections::BTreeMap;

use crate::analyzers::grain::{Bucket, TimeGrain};
use crate::analyzers::types::{PriceBandPreference, PriceBandVolume};
use crate::error::NoData;
use crate::table::{EnrichedTable, group_key};

/// Quantity per `(Price_Band, bucket)`.
///
/// `band_order` is the first-seen band order of the unfiltered table and is
/// returned unchanged, so the chart keeps the same band sequence whatever the
/// filters leave behind. Rows follow that order, then bucket order; a band
/// missing from `band_order` sorts after the known ones.
pub fn price_band_preference(
    table: &EnrichedTable,
    grain: TimeGrain,
    band_order: &[String],
) -> Result<PriceBandPreference, NoData> {
    let rank = |band: &str| {
        band_order
            .iter()
            .position(|b| b == band)
            .unwrap_or(band_order.len())
    };

    let mut sums: BTreeMap<(usize, String, Bucket), i64> = BTreeMap::new();
    for tx in table.rows() {
        let (Some(band), Some(bucket)) = (group_key(&tx.price_band), grain.bucket(tx)) else {
            continue;
        };
        *sums
            .entry((rank(band), band.to_string(), bucket))
            .or_default() += tx.quantity();
    }
    if sums.is_empty() {
        return Err(NoData);
    }

    Ok(PriceBandPreference {
        band_order: band_order.to_vec(),
        rows: sums
            .into_iter()
            .map(|((_, price_band, bucket), quantity_sold)| PriceBandVolume {
                price_band,
                bucket,
                quantity_sold,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Filter;
    use crate::table::tests::tx;

    fn sample() -> EnrichedTable {
        EnrichedTable::new(vec![
            tx("2023-01-01", "A", "Rings", "Low", 1),
            tx("2023-01-02", "B", "Rings", "High", 2),
            tx("2024-01-03", "A", "Chains", "Medium", 3),
            tx("2024-01-04", "A", "Rings", "High", 4),
            tx("2023-06-04", "A", "Rings", "Low", 5),
        ])
    }

    #[test]
    fn test_rows_follow_first_seen_band_order() {
        let table = sample();
        let order = table.price_band_order();
        assert_eq!(order, vec!["Low", "High", "Medium"]);

        let pref = price_band_preference(&table, TimeGrain::Year, &order).unwrap();
        let got: Vec<_> = pref
            .rows
            .iter()
            .map(|r| (r.price_band.as_str(), r.bucket.clone(), r.quantity_sold))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Low", Bucket::Year(2023), 6),
                ("High", Bucket::Year(2023), 2),
                ("High", Bucket::Year(2024), 4),
                ("Medium", Bucket::Year(2024), 3),
            ]
        );
    }

    #[test]
    fn test_band_order_survives_filtering() {
        let table = sample();
        let order = table.price_band_order();
        let chains = table.filter(&Filter::from_selection("All", "Chains"));

        let pref = price_band_preference(&chains, TimeGrain::Year, &order).unwrap();
        assert_eq!(pref.band_order, vec!["Low", "High", "Medium"]);
        assert_eq!(pref.rows.len(), 1);
        assert_eq!(pref.rows[0].price_band, "Medium");
    }

    #[test]
    fn test_unknown_band_sorts_last() {
        let table = EnrichedTable::new(vec![
            tx("2023-01-01", "A", "Rings", "Premium", 1),
            tx("2023-01-01", "A", "Rings", "Low", 1),
        ]);
        let order = vec!["Low".to_string()];
        let pref = price_band_preference(&table, TimeGrain::Year, &order).unwrap();
        let bands: Vec<_> = pref.rows.iter().map(|r| r.price_band.as_str()).collect();
        assert_eq!(bands, vec!["Low", "Premium"]);
    }

    #[test]
    fn test_empty_is_no_data() {
        assert_eq!(
            price_band_preference(&EnrichedTable::default(), TimeGrain::Year, &[]),
            Err(NoData)
        );
    }
}
