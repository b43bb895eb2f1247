//! Top and bottom performers by summed quantity.
//!
//! Groups keep the order in which their key first appears, and the sort is
//! stable, so equal totals stay in that order.

use std::collections::HashMap;
use tracing::debug;

use crate::analyzers::types::{CategoryTotal, ClientTotal, Direction};
use crate::error::NoData;
use crate::table::{EnrichedTable, Transaction, group_key};

/// Default number of rows in a ranking table.
pub const RANK_LIMIT: usize = 10;

pub fn rank_clients_by_quantity(
    table: &EnrichedTable,
    direction: Direction,
    n: usize,
) -> Result<Vec<ClientTotal>, NoData> {
    let ranked = rank_by(table, |tx| tx.client_name.as_str(), direction, n)?;
    Ok(ranked
        .into_iter()
        .map(|(client_name, quantity_sold)| ClientTotal {
            client_name,
            quantity_sold,
        })
        .collect())
}

pub fn rank_categories_by_quantity(
    table: &EnrichedTable,
    direction: Direction,
    n: usize,
) -> Result<Vec<CategoryTotal>, NoData> {
    let ranked = rank_by(table, |tx| tx.category.as_str(), direction, n)?;
    Ok(ranked
        .into_iter()
        .map(|(category, quantity_sold)| CategoryTotal {
            category,
            quantity_sold,
        })
        .collect())
}

fn rank_by<'a>(
    table: &'a EnrichedTable,
    key: impl Fn(&'a Transaction) -> &'a str,
    direction: Direction,
    n: usize,
) -> Result<Vec<(String, i64)>, NoData> {
    let mut totals = totals_in_first_seen_order(table.rows(), key);
    if totals.is_empty() {
        return Err(NoData);
    }
    match direction {
        Direction::Top => totals.sort_by(|a, b| b.1.cmp(&a.1)),
        Direction::Bottom => totals.sort_by(|a, b| a.1.cmp(&b.1)),
    }
    totals.truncate(n);
    debug!(?direction, n, returned = totals.len(), "Ranking computed");

    Ok(totals
        .into_iter()
        .map(|(k, total)| (k.to_string(), total))
        .collect())
}

fn totals_in_first_seen_order<'a>(
    rows: &'a [Transaction],
    key: impl Fn(&'a Transaction) -> &'a str,
) -> Vec<(&'a str, i64)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, i64)> = Vec::new();

    for tx in rows {
        let Some(k) = group_key(key(tx)) else {
            continue;
        };
        match index.get(k) {
            Some(&i) => totals[i].1 += tx.quantity(),
            None => {
                index.insert(k, totals.len());
                totals.push((k, tx.quantity()));
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::tx;

    fn sample() -> EnrichedTable {
        EnrichedTable::new(vec![
            tx("2023-01-01", "A", "Rings", "Low", 5),
            tx("2023-01-02", "B", "Bangles", "Low", 9),
            tx("2023-01-03", "C", "Rings", "Low", 5),
            tx("2023-01-04", "A", "Chains", "Low", 1),
            tx("2023-01-05", "D", "Chains", "Low", 2),
        ])
    }

    fn names(rows: &[ClientTotal]) -> Vec<&str> {
        rows.iter().map(|r| r.client_name.as_str()).collect()
    }

    #[test]
    fn test_top_clients_descending() {
        let top = rank_clients_by_quantity(&sample(), Direction::Top, 10).unwrap();
        assert_eq!(names(&top), vec!["B", "A", "C", "D"]);
        assert_eq!(top[0].quantity_sold, 9);
        assert_eq!(top[1].quantity_sold, 6);
    }

    #[test]
    fn test_bottom_clients_ascending_with_stable_ties() {
        let data = EnrichedTable::new(vec![
            tx("2023-01-01", "X", "Rings", "Low", 3),
            tx("2023-01-02", "Y", "Rings", "Low", 1),
            tx("2023-01-03", "Z", "Rings", "Low", 3),
        ]);
        let bottom = rank_clients_by_quantity(&data, Direction::Bottom, 10).unwrap();
        assert_eq!(names(&bottom), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_limit_applies() {
        let top = rank_clients_by_quantity(&sample(), Direction::Top, 2).unwrap();
        assert_eq!(names(&top), vec!["B", "A"]);
    }

    #[test]
    fn test_top_and_bottom_disjoint_with_many_clients() {
        let rows = (0..25)
            .map(|i| tx("2023-01-01", &format!("client-{i:02}"), "Rings", "Low", i * 3 + 1))
            .collect();
        let table = EnrichedTable::new(rows);

        let top = rank_clients_by_quantity(&table, Direction::Top, RANK_LIMIT).unwrap();
        let bottom = rank_clients_by_quantity(&table, Direction::Bottom, RANK_LIMIT).unwrap();

        assert_eq!(top.len(), 10);
        assert_eq!(bottom.len(), 10);
        assert!(top.iter().all(|t| !bottom.contains(t)));
    }

    #[test]
    fn test_categories_ranked() {
        let top = rank_categories_by_quantity(&sample(), Direction::Top, 10).unwrap();
        let cats: Vec<_> = top.iter().map(|c| (c.category.as_str(), c.quantity_sold)).collect();
        assert_eq!(cats, vec![("Rings", 10), ("Bangles", 9), ("Chains", 3)]);
    }

    #[test]
    fn test_missing_quantity_counts_as_zero() {
        let mut t = tx("2023-01-01", "A", "Rings", "Low", 0);
        t.quantity_sold = None;
        let table = EnrichedTable::new(vec![t, tx("2023-01-02", "A", "Rings", "Low", 4)]);

        let top = rank_clients_by_quantity(&table, Direction::Top, 10).unwrap();
        assert_eq!(top[0].quantity_sold, 4);
    }

    #[test]
    fn test_empty_table_is_no_data() {
        let empty = EnrichedTable::default();
        assert_eq!(rank_clients_by_quantity(&empty, Direction::Top, 10), Err(NoData));
        assert_eq!(rank_categories_by_quantity(&empty, Direction::Bottom, 10), Err(NoData));
    }

    #[test]
    fn test_blank_client_is_not_ranked() {
        let table = EnrichedTable::new(vec![
            tx("2023-01-01", "", "Rings", "Low", 50),
            tx("2023-01-02", "A", "Rings", "Low", 4),
            tx("2023-01-03", "  ", "Rings", "Low", 9),
        ]);

        let top = rank_clients_by_quantity(&table, Direction::Top, 10).unwrap();
        assert_eq!(names(&top), vec!["A"]);

        let only_blank = EnrichedTable::new(vec![tx("2023-01-01", "", "Rings", "Low", 1)]);
        assert_eq!(rank_clients_by_quantity(&only_blank, Direction::Top, 10), Err(NoData));
    }
}
