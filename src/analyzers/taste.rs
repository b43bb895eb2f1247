//! Client taste breakdown for the treemap view.
//!
//! Leaves are `(Client_Name, bucket, Category)` sums. The tree groups them
//! along `[bucket, Client_Name, Category]`, or `[bucket, Category]` when the
//! page is already narrowed to one client.

use std::collections::BTreeMap;

use crate::analyzers::grain::{Bucket, TimeGrain};
use crate::analyzers::types::{TasteBreakdown, TasteLeaf, TreemapNode};
use crate::error::NoData;
use crate::table::{EnrichedTable, group_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Time,
    Client,
    Category,
}

impl Level {
    fn key(&self, leaf: &TasteLeaf) -> Bucket {
        match self {
            Level::Time => leaf.bucket.clone(),
            Level::Client => Bucket::Label(leaf.client_name.clone()),
            Level::Category => Bucket::Label(leaf.category.clone()),
        }
    }

    fn column(&self, grain: TimeGrain) -> &'static str {
        match self {
            Level::Time => grain.column(),
            Level::Client => "Client_Name",
            Level::Category => "Category",
        }
    }
}

fn levels(client_selected: bool) -> &'static [Level] {
    if client_selected {
        &[Level::Time, Level::Category]
    } else {
        &[Level::Time, Level::Client, Level::Category]
    }
}

/// Column names of the treemap levels, outermost first.
pub fn taste_path(grain: TimeGrain, client_selected: bool) -> Vec<String> {
    levels(client_selected)
        .iter()
        .map(|l| l.column(grain).to_string())
        .collect()
}

pub fn taste_breakdown(
    table: &EnrichedTable,
    grain: TimeGrain,
    client_selected: bool,
) -> Result<TasteBreakdown, NoData> {
    let mut sums: BTreeMap<(String, Bucket, String), i64> = BTreeMap::new();
    for tx in table.rows() {
        let (Some(client), Some(bucket), Some(category)) = (
            group_key(&tx.client_name),
            grain.bucket(tx),
            group_key(&tx.category),
        ) else {
            continue;
        };
        *sums
            .entry((client.to_string(), bucket, category.to_string()))
            .or_default() += tx.quantity();
    }
    if sums.is_empty() {
        return Err(NoData);
    }

    let leaves: Vec<TasteLeaf> = sums
        .into_iter()
        .map(|((client_name, bucket, category), quantity_sold)| TasteLeaf {
            client_name,
            bucket,
            category,
            quantity_sold,
        })
        .collect();

    let path_levels = levels(client_selected);
    let refs: Vec<&TasteLeaf> = leaves.iter().collect();
    let tree = build_level(&refs, path_levels);

    Ok(TasteBreakdown {
        path: taste_path(grain, client_selected),
        leaves,
        tree,
    })
}

/// Groups `leaves` by the first level and recurses into the rest.
fn build_level(leaves: &[&TasteLeaf], levels: &[Level]) -> Vec<TreemapNode> {
    let Some((level, rest)) = levels.split_first() else {
        return Vec::new();
    };

    let mut groups: BTreeMap<Bucket, Vec<&TasteLeaf>> = BTreeMap::new();
    for &leaf in leaves {
        groups.entry(level.key(leaf)).or_default().push(leaf);
    }

    groups
        .into_iter()
        .map(|(key, members)| TreemapNode {
            label: key.to_string(),
            value: members.iter().map(|l| l.quantity_sold).sum(),
            children: build_level(&members, rest),
        })
        .collect()
}
