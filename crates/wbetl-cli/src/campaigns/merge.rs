//! Left-joins aggregated stats with campaign metadata and order totals.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::NaiveDate;
use wbetl_core::{CampaignMetadata, CampaignStatRow, ProductOrderFact, MARKETPLACE};
use wbetl_warehouse::CampaignDataRow;

/// Indexes `items` by `key`, keeping the first item per key.
fn first_by_key<'a, T, K, F>(items: &'a [T], what: &'static str, key: F) -> HashMap<K, &'a T>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut index = HashMap::with_capacity(items.len());
    let mut duplicates = 0usize;
    for item in items {
        match index.entry(key(item)) {
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
            Entry::Occupied(_) => duplicates += 1,
        }
    }
    if duplicates > 0 {
        tracing::warn!(duplicates, what, "duplicate join keys; keeping first occurrence");
    }
    index
}

/// One output row per aggregated stat row, in the same order.
///
/// Rows without metadata keep the campaign columns null; rows without an
/// order fact get zero order totals.
#[must_use]
pub fn merge(
    project: &str,
    stats: &[CampaignStatRow],
    metadata: &[CampaignMetadata],
    orders: &[ProductOrderFact],
) -> Vec<CampaignDataRow> {
    let campaigns = first_by_key(metadata, "campaign metadata", |m| m.advert_id);
    let order_facts: HashMap<(i64, NaiveDate), &ProductOrderFact> =
        first_by_key(orders, "order facts", |o| (o.nm_id, o.day));

    stats
        .iter()
        .map(|stat| {
            let campaign = campaigns.get(&stat.advert_id);
            let order = order_facts.get(&(stat.nm_id, stat.day));
            CampaignDataRow {
                nm_id: stat.nm_id,
                day: stat.day,
                name_product: stat.name.clone(),
                views: stat.views,
                clicks: stat.clicks,
                sum: stat.sum,
                atbs: stat.atbs,
                orders: stat.orders,
                shks: stat.shks,
                sum_price: stat.sum_price,
                advert_id: stat.advert_id,
                project: project.to_owned(),
                marketplace: MARKETPLACE.to_owned(),
                end_time: campaign.and_then(|c| c.end_time),
                create_time: campaign.and_then(|c| c.create_time),
                start_time: campaign.and_then(|c| c.start_time),
                name_campaign: campaign.and_then(|c| c.name.clone()),
                status: campaign.map(|c| c.status.clone()),
                campaign_type: campaign.map(|c| c.campaign_type.clone()),
                orders_count: order.map_or(0, |o| o.orders_count),
                orders_sum_rub: order.map_or(0.0, |o| o.orders_sum_rub),
                add_to_cart_count: order.map_or(0, |o| o.add_to_cart_count),
            }
        })
        .collect()
}
