//! Pure reshaping of decoded payloads into flat records.
//!
//! Nothing here fails: absent lists contribute no rows and absent counters
//! read as zero. Leaves whose date cannot be read are dropped with a warning.

use std::collections::HashSet;

use wbetl_core::{
    campaign_status_label, campaign_type_label, parse_day, parse_timestamp, CampaignMetadata,
    CampaignStatRow, FunnelCard, ProductOrderFact, RealizationRecord, WarehouseStock,
};

use crate::types::{
    AdvertInfo, CampaignStats, NmReportCard, ProductHistory, PromotionCountResponse,
    RealizationItem, RemainsItem,
};

/// Campaign ids listed by `/adv/v1/promotion/count`, first occurrence order.
/// Entries without an id are dropped with a warning.
#[must_use]
pub fn campaign_ids(response: &PromotionCountResponse) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut missing = 0usize;
    let ids = response
        .adverts
        .iter()
        .flat_map(|group| group.advert_list.iter())
        .map(|advert| advert.advert_id)
        .filter(|id| {
            if *id == 0 {
                missing += 1;
                return false;
            }
            seen.insert(*id)
        })
        .collect();
    if missing > 0 {
        tracing::warn!(dropped = missing, "dropping listed campaigns without an advertId");
    }
    ids
}

/// One row per (campaign, day, app, SKU). The campaign id is copied onto
/// every row.
#[must_use]
pub fn campaign_stat_rows(stats: &[CampaignStats]) -> Vec<CampaignStatRow> {
    let mut rows = Vec::new();

    for campaign in stats {
        for day in &campaign.days {
            let Some(date) = day.date.as_deref().and_then(parse_day) else {
                let dropped: usize = day.apps.iter().map(|app| app.nm.len()).sum();
                tracing::warn!(
                    advert_id = campaign.advert_id,
                    raw_date = ?day.date,
                    dropped,
                    "dropping stats with unreadable date"
                );
                continue;
            };

            for app in &day.apps {
                rows.extend(app.nm.iter().map(|nm| CampaignStatRow {
                    day: date,
                    nm_id: nm.nm_id,
                    advert_id: campaign.advert_id,
                    name: nm.name.clone(),
                    views: nm.views,
                    clicks: nm.clicks,
                    sum: nm.sum,
                    atbs: nm.atbs,
                    orders: nm.orders,
                    shks: nm.shks,
                    sum_price: nm.sum_price,
                    ctr: nm.ctr,
                    cpc: nm.cpc,
                    cr: nm.cr,
                }));
            }
        }
    }

    rows
}

/// Entries without an id are dropped with a warning.
#[must_use]
pub fn campaign_metadata(adverts: &[AdvertInfo]) -> Vec<CampaignMetadata> {
    let missing = adverts.iter().filter(|advert| advert.advert_id == 0).count();
    if missing > 0 {
        tracing::warn!(dropped = missing, "dropping campaign details without an advertId");
    }
    adverts
        .iter()
        .filter(|advert| advert.advert_id != 0)
        .map(|advert| CampaignMetadata {
            advert_id: advert.advert_id,
            name: advert.name.clone(),
            create_time: advert.create_time.as_deref().and_then(parse_day),
            start_time: advert.start_time.as_deref().and_then(parse_day),
            end_time: advert.end_time.as_deref().and_then(parse_day),
            status: campaign_status_label(advert.status).into_owned(),
            campaign_type: campaign_type_label(advert.advert_type).into_owned(),
        })
        .collect()
}

/// One row per detail card. `brandName` is upper-cased.
#[must_use]
pub fn funnel_cards(cards: &[NmReportCard]) -> Vec<FunnelCard> {
    cards
        .iter()
        .filter_map(|card| {
            let period = &card.statistics.selected_period;
            let Some(begin) = period.begin.as_deref().and_then(parse_timestamp) else {
                tracing::warn!(
                    nm_id = card.nm_id,
                    raw_begin = ?period.begin,
                    "dropping card with unreadable period"
                );
                return None;
            };
            Some(FunnelCard {
                nm_id: card.nm_id,
                vendor_code: card.vendor_code.clone().unwrap_or_default(),
                brand_name: card
                    .brand_name
                    .as_deref()
                    .unwrap_or_default()
                    .to_uppercase(),
                object_id: card.object.id,
                object_name: card.object.name.clone().unwrap_or_default(),
                begin,
                open_card_count: period.open_card_count,
                add_to_cart_count: period.add_to_cart_count,
                orders_count: period.orders_count,
                orders_sum_rub: period.orders_sum_rub,
                buyouts_count: period.buyouts_count,
                buyouts_sum_rub: period.buyouts_sum_rub,
                cancel_count: period.cancel_count,
                cancel_sum_rub: period.cancel_sum_rub,
                stocks_mp: card.stocks.stocks_mp,
                stocks_wb: card.stocks.stocks_wb,
            })
        })
        .collect()
}

/// One order fact per (SKU, history day).
#[must_use]
pub fn history_order_facts(history: &[ProductHistory]) -> Vec<ProductOrderFact> {
    let mut facts = Vec::new();

    for product in history {
        for entry in &product.history {
            let Some(day) = entry.dt.as_deref().and_then(parse_day) else {
                tracing::warn!(
                    nm_id = product.nm_id,
                    raw_date = ?entry.dt,
                    "dropping history entry with unreadable date"
                );
                continue;
            };
            facts.push(ProductOrderFact {
                nm_id: product.nm_id,
                day,
                orders_count: entry.orders_count,
                orders_sum_rub: entry.orders_sum_rub,
                add_to_cart_count: entry.add_to_cart_count,
            });
        }
    }

    facts
}

/// One row per (item, warehouse). `brand` is upper-cased, empty when absent.
#[must_use]
pub fn warehouse_stocks(items: &[RemainsItem]) -> Vec<WarehouseStock> {
    let mut rows = Vec::new();

    for item in items {
        let brand = item.brand.as_deref().unwrap_or_default().to_uppercase();
        rows.extend(item.warehouses.iter().map(|warehouse| WarehouseStock {
            warehouse_name: warehouse.warehouse_name.clone().unwrap_or_default(),
            quantity: warehouse.quantity,
            brand: brand.clone(),
            subject_name: item.subject_name.clone().unwrap_or_default(),
            vendor_code: item.vendor_code.clone().unwrap_or_default(),
            in_way_to_client: item.in_way_to_client,
            in_way_from_client: item.in_way_from_client,
            quantity_warehouses_full: item.quantity_warehouses_full,
        }));
    }

    rows
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

/// One record per realization line. Empty strings read as absent; dates keep
/// their wall-clock time with any offset dropped.
#[must_use]
pub fn realization_records(items: &[RealizationItem]) -> Vec<RealizationRecord> {
    items
        .iter()
        .map(|item| RealizationRecord {
            realizationreport_id: item.realizationreport_id,
            date_from: item.date_from.as_deref().and_then(parse_timestamp),
            date_to: item.date_to.as_deref().and_then(parse_timestamp),
            create_dt: item.create_dt.as_deref().and_then(parse_timestamp),
            currency_name: non_blank(item.currency_name.as_deref()),
            suppliercontract_code: non_blank(item.suppliercontract_code.as_deref()),
            rrd_id: item.rrd_id,
            gi_id: item.gi_id,
            dlv_prc: item.dlv_prc,
            fix_tariff_date_from: item.fix_tariff_date_from.as_deref().and_then(parse_timestamp),
            fix_tariff_date_to: item.fix_tariff_date_to.as_deref().and_then(parse_timestamp),
            subject_name: non_blank(item.subject_name.as_deref()),
            nm_id: item.nm_id,
            brand_name: non_blank(item.brand_name.as_deref()),
            sa_name: non_blank(item.sa_name.as_deref()),
            ts_name: non_blank(item.ts_name.as_deref()),
            barcode: non_blank(item.barcode.as_deref()),
            doc_type_name: non_blank(item.doc_type_name.as_deref()),
            quantity: item.quantity,
            retail_price: item.retail_price,
            retail_amount: item.retail_amount,
            sale_percent: item.sale_percent,
            commission_percent: item.commission_percent,
            office_name: non_blank(item.office_name.as_deref()),
            supplier_oper_name: non_blank(item.supplier_oper_name.as_deref()),
            order_dt: item.order_dt.as_deref().and_then(parse_timestamp),
            sale_dt: item.sale_dt.as_deref().and_then(parse_timestamp),
            rr_dt: item.rr_dt.as_deref().and_then(parse_timestamp),
            shk_id: item.shk_id,
            retail_price_withdisc_rub: item.retail_price_withdisc_rub,
            delivery_amount: item.delivery_amount,
            return_amount: item.return_amount,
            delivery_rub: item.delivery_rub,
            gi_box_type_name: non_blank(item.gi_box_type_name.as_deref()),
            product_discount_for_report: item.product_discount_for_report,
            supplier_promo: item.supplier_promo,
            rid: item.rid,
            ppvz_spp_prc: item.ppvz_spp_prc,
            ppvz_kvw_prc_base: item.ppvz_kvw_prc_base,
            ppvz_kvw_prc: item.ppvz_kvw_prc,
            sup_rating_prc_up: item.sup_rating_prc_up,
            is_kgvp_v2: item.is_kgvp_v2,
            ppvz_sales_commission: item.ppvz_sales_commission,
            ppvz_for_pay: item.ppvz_for_pay,
            ppvz_reward: item.ppvz_reward,
            acquiring_fee: item.acquiring_fee,
            acquiring_percent: item.acquiring_percent,
            payment_processing: non_blank(item.payment_processing.as_deref()),
            acquiring_bank: non_blank(item.acquiring_bank.as_deref()),
            ppvz_vw: item.ppvz_vw,
            ppvz_vw_nds: item.ppvz_vw_nds,
            ppvz_office_name: non_blank(item.ppvz_office_name.as_deref()),
            ppvz_office_id: item.ppvz_office_id,
            ppvz_supplier_id: item.ppvz_supplier_id,
            ppvz_supplier_name: non_blank(item.ppvz_supplier_name.as_deref()),
            ppvz_inn: non_blank(item.ppvz_inn.as_deref()),
            declaration_number: non_blank(item.declaration_number.as_deref()),
            bonus_type_name: non_blank(item.bonus_type_name.as_deref()),
            sticker_id: non_blank(item.sticker_id.as_deref()),
            site_country: non_blank(item.site_country.as_deref()),
            srv_dbs: item.srv_dbs,
            penalty: item.penalty,
            additional_payment: item.additional_payment,
            rebill_logistic_cost: item.rebill_logistic_cost,
            storage_fee: item.storage_fee,
            deduction: item.deduction,
            acceptance: item.acceptance,
            assembly_id: item.assembly_id,
            srid: non_blank(item.srid.as_deref()),
            report_type: item.report_type,
            is_legal_entity: item.is_legal_entity,
            trbx_id: non_blank(item.trbx_id.as_deref()),
            rebill_logistic_org: non_blank(item.rebill_logistic_org.as_deref()),
        })
        .collect()
}

#[cfg(test)]
#[path = "flatten_test.rs"]
mod tests;
