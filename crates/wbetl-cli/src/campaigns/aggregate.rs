//! Collapses full-stats lines to one row per reporting group.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ValueEnum;
use wbetl_core::CampaignStatRow;

/// Key the stat lines are grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Grouping {
    /// (day, SKU); the campaign id is the first seen in the group.
    DaySku,
    /// (day, SKU, campaign).
    #[default]
    DaySkuCampaign,
}

type GroupKey = (NaiveDate, i64, Option<i64>);

#[derive(Default)]
struct Mean {
    total: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.total += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / f64::from(self.count))
    }
}

struct Group {
    row: CampaignStatRow,
    ctr: Mean,
    cpc: Mean,
    cr: Mean,
}

impl Group {
    fn start(row: &CampaignStatRow) -> Self {
        let mut group = Self {
            row: CampaignStatRow {
                name: None,
                views: 0,
                clicks: 0,
                sum: 0.0,
                atbs: 0,
                orders: 0,
                shks: 0,
                sum_price: 0.0,
                ctr: None,
                cpc: None,
                cr: None,
                ..row.clone()
            },
            ctr: Mean::default(),
            cpc: Mean::default(),
            cr: Mean::default(),
        };
        group.add(row);
        group
    }

    fn add(&mut self, row: &CampaignStatRow) {
        let acc = &mut self.row;
        acc.views += row.views;
        acc.clicks += row.clicks;
        acc.sum += row.sum;
        acc.atbs += row.atbs;
        acc.orders += row.orders;
        acc.shks += row.shks;
        acc.sum_price += row.sum_price;
        if acc.name.is_none() {
            acc.name.clone_from(&row.name);
        }
        self.ctr.push(row.ctr);
        self.cpc.push(row.cpc);
        self.cr.push(row.cr);
    }

    fn finish(mut self) -> CampaignStatRow {
        self.row.ctr = self.ctr.value();
        self.row.cpc = self.cpc.value();
        self.row.cr = self.cr.value();
        self.row
    }
}

/// One row per group, ordered by (day, nmId[, advertId]).
///
/// Counters and spend are summed; `ctr`, `cpc` and `cr` are averaged over
/// the lines that carry them. Aggregating the output again returns it
/// unchanged.
#[must_use]
pub fn aggregate(rows: &[CampaignStatRow], grouping: Grouping) -> Vec<CampaignStatRow> {
    let mut groups: BTreeMap<GroupKey, Group> = BTreeMap::new();

    for row in rows {
        let key = match grouping {
            Grouping::DaySku => (row.day, row.nm_id, None),
            Grouping::DaySkuCampaign => (row.day, row.nm_id, Some(row.advert_id)),
        };
        groups
            .entry(key)
            .and_modify(|group| group.add(row))
            .or_insert_with(|| Group::start(row));
    }

    groups.into_values().map(Group::finish).collect()
}
