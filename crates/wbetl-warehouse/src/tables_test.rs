use chrono::{NaiveDate, TimeZone, Utc};
use wbetl_core::{FunnelCard, RealizationRecord, WarehouseStock};

use super::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Column names in the order they appear in the serialized row.
fn serialized_order<R: Serialize>(row: &R, columns: &[&str]) -> Vec<String> {
    let json = serde_json::to_string(row).unwrap();
    let mut found: Vec<(usize, String)> = columns
        .iter()
        .map(|c| {
            let pos = json
                .find(&format!("\"{c}\":"))
                .unwrap_or_else(|| panic!("column {c} missing from {json}"));
            (pos, (*c).to_owned())
        })
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, c)| c).collect()
}

pub(crate) fn campaign_row() -> CampaignDataRow {
    CampaignDataRow {
        nm_id: 555,
        day: day(2024, 12, 1),
        name_product: Some("Кофемолка".to_owned()),
        views: 1000,
        clicks: 40,
        sum: 350.5,
        atbs: 6,
        orders: 2,
        shks: 2,
        sum_price: 4200.0,
        advert_id: 777,
        project: "WB-GutenTech".to_owned(),
        marketplace: MARKETPLACE.to_owned(),
        end_time: None,
        create_time: Some(day(2024, 11, 2)),
        start_time: Some(day(2024, 11, 3)),
        name_campaign: Some("Осень".to_owned()),
        status: Some("Идут показы".to_owned()),
        campaign_type: Some("Аукцион".to_owned()),
        orders_count: 3,
        orders_sum_rub: 6100.0,
        add_to_cart_count: 9,
    }
}

#[test]
fn campaign_row_serializes_in_column_order() {
    let row = campaign_row();
    let order = serialized_order(&row, CampaignDataRow::COLUMNS);
    assert_eq!(order, CampaignDataRow::COLUMNS);
    assert_eq!(CampaignDataRow::COLUMNS.len(), 22);
}

#[test]
fn order_history_row_from_card_stamps_project_and_marketplace() {
    let card = FunnelCard {
        nm_id: 101,
        vendor_code: "KG-1".to_owned(),
        brand_name: "KITCHENAID".to_owned(),
        object_id: 9,
        object_name: "Миксеры".to_owned(),
        begin: day(2024, 12, 3).and_hms_opt(0, 0, 0).unwrap(),
        open_card_count: 50,
        add_to_cart_count: 5,
        orders_count: 2,
        orders_sum_rub: 19_800.0,
        buyouts_count: 1,
        buyouts_sum_rub: 9_900.0,
        cancel_count: 0,
        cancel_sum_rub: 0.0,
        stocks_mp: 4,
        stocks_wb: 12,
    };
    let row = OrderHistoryRow::from_card("WB-KitchenAid", &card);

    assert_eq!(row.project, "WB-KitchenAid");
    assert_eq!(row.marketplace, "Wildberries");
    assert_eq!(row.begin, Utc.with_ymd_and_hms(2024, 12, 3, 0, 0, 0).unwrap());
    assert_eq!(row.stocks_wb, 12);
    assert_eq!(serialized_order(&row, OrderHistoryRow::COLUMNS), OrderHistoryRow::COLUMNS);
}

#[test]
fn stock_row_carries_snapshot_time() {
    let stock = WarehouseStock {
        warehouse_name: "Коледино".to_owned(),
        quantity: 14,
        brand: "GUTENTECH".to_owned(),
        subject_name: "Пылесосы".to_owned(),
        vendor_code: "GT-7".to_owned(),
        in_way_to_client: 2,
        in_way_from_client: 1,
        quantity_warehouses_full: 30,
    };
    let taken_at = Utc.with_ymd_and_hms(2024, 12, 8, 6, 30, 0).unwrap();
    let row = WarehouseStockRow::from_stock("WB-GutenTech", &stock, taken_at);

    assert_eq!(row.date, taken_at);
    assert_eq!(row.quantity, 14);
    assert_eq!(serialized_order(&row, WarehouseStockRow::COLUMNS), WarehouseStockRow::COLUMNS);
}

#[test]
fn table_names_match_destinations() {
    assert_eq!(CampaignDataRow::TABLE, "campaign_data_wb");
    assert_eq!(OrderHistoryRow::TABLE, "order_history_wb");
    assert_eq!(WarehouseStockRow::TABLE, "warehouse_data_wb");
    assert_eq!(RealizationRow::TABLE, "wb_finance");
}

#[test]
fn realization_row_stamps_load_time_source_and_project() {
    let record = RealizationRecord {
        realizationreport_id: 301_245,
        rrd_id: 9_001,
        nm_id: 555,
        doc_type_name: Some("Продажа".to_owned()),
        rr_dt: day(2024, 12, 2).and_hms_opt(0, 0, 0),
        ppvz_for_pay: 1_234.5,
        srv_dbs: true,
        ..RealizationRecord::default()
    };
    let loaded_at = Utc.with_ymd_and_hms(2024, 12, 9, 8, 0, 0).unwrap();
    let row = RealizationRow::from_record("WB-GutenTech", &record, loaded_at);

    assert_eq!(row.load_dt, loaded_at);
    assert_eq!(row.source, "WB-Realization-API");
    assert_eq!(row.project, "WB-GutenTech");
    assert_eq!(row.rr_dt, Some(Utc.with_ymd_and_hms(2024, 12, 2, 0, 0, 0).unwrap()));
    assert_eq!(row.order_dt, None);
    assert_eq!((row.srv_dbs, row.is_legal_entity), (1, 0));
    assert_eq!(row.ppvz_for_pay, 1_234.5);
}

#[test]
fn realization_row_serializes_in_column_order() {
    let row = RealizationRow::from_record(
        "WB-GutenTech",
        &RealizationRecord::default(),
        Utc.with_ymd_and_hms(2024, 12, 9, 8, 0, 0).unwrap(),
    );
    assert_eq!(serialized_order(&row, RealizationRow::COLUMNS), RealizationRow::COLUMNS);
    assert_eq!(RealizationRow::COLUMNS.len(), 76);
    assert_eq!(RealizationRow::COLUMNS.last(), Some(&"project"));
}
