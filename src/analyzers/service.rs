use std::collections::BTreeMap;

use crate::analyzers::types::ServiceRisk;
use crate::analyzers::utility::mean;
use crate::error::NoData;
use crate::table::{EnrichedTable, group_key};

/// Average service score and total quantity per client, ordered by client.
///
/// Clients low on both axes are the ones most at risk of leaving.
pub fn service_risk(table: &EnrichedTable) -> Result<Vec<ServiceRisk>, NoData> {
    let mut per_client: BTreeMap<&str, (Vec<f64>, i64)> = BTreeMap::new();
    for tx in table.rows() {
        let Some(client) = group_key(&tx.client_name) else {
            continue;
        };
        let (scores, total) = per_client.entry(client).or_default();
        if let Some(score) = tx.customer_service_score {
            scores.push(score);
        }
        *total += tx.quantity();
    }
    if per_client.is_empty() {
        return Err(NoData);
    }

    Ok(per_client
        .into_iter()
        .map(|(client, (scores, total_sales))| ServiceRisk {
            client_name: client.to_string(),
            avg_service_score: mean(&scores),
            total_sales,
        })
        .collect())
}
