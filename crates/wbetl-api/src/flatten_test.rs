use chrono::NaiveDate;
use serde_json::json;

use super::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stats_fixture() -> Vec<CampaignStats> {
    serde_json::from_value(json!([
        {
            "advertId": 101,
            "days": [
                {
                    "date": "2024-12-01T00:00:00+03:00",
                    "apps": [
                        {"appType": 1, "nm": [
                            {"nmId": 1, "name": "Чайник", "views": 100, "clicks": 5,
                             "ctr": 5.0, "cpc": 2.0, "sum": 10.0, "atbs": 1, "orders": 1,
                             "cr": 20.0, "shks": 1, "sum_price": 999.0},
                            {"nmId": 2, "name": "Тостер", "views": 50, "clicks": 1}
                        ]},
                        {"appType": 32, "nm": [
                            {"nmId": 1, "name": "Чайник", "views": 40, "clicks": 2, "sum": 4.0}
                        ]}
                    ]
                },
                {
                    "date": "2024-12-02T00:00:00+03:00",
                    "apps": [{"appType": 1}]
                }
            ]
        },
        {"advertId": 102},
        {"advertId": 103, "days": [{"date": "2024-12-01", "apps": null}]}
    ]))
    .unwrap()
}

#[test]
fn stat_row_count_is_sum_of_nm_lengths() {
    let stats = stats_fixture();
    let expected: usize = stats
        .iter()
        .flat_map(|c| c.days.iter())
        .flat_map(|d| d.apps.iter())
        .map(|a| a.nm.len())
        .sum();
    let rows = campaign_stat_rows(&stats);
    assert_eq!(expected, 3);
    assert_eq!(rows.len(), expected);
}

#[test]
fn stat_rows_copy_campaign_id_and_truncate_date() {
    let rows = campaign_stat_rows(&stats_fixture());
    assert!(rows.iter().all(|r| r.advert_id == 101));
    assert!(rows.iter().all(|r| r.day == day(2024, 12, 1)));
    assert_eq!(rows[0].sum_price, 999.0);
    assert_eq!(rows[0].ctr, Some(5.0));
}

#[test]
fn missing_counters_read_as_zero_and_ratios_as_none() {
    let rows = campaign_stat_rows(&stats_fixture());
    let toaster = rows.iter().find(|r| r.nm_id == 2).unwrap();
    assert_eq!(toaster.views, 50);
    assert_eq!(toaster.sum, 0.0);
    assert_eq!(toaster.orders, 0);
    assert_eq!(toaster.ctr, None);
    assert_eq!(toaster.cr, None);
}

#[test]
fn unreadable_date_drops_only_that_day() {
    let stats: Vec<CampaignStats> = serde_json::from_value(json!([{
        "advertId": 7,
        "days": [
            {"date": "not a date", "apps": [{"nm": [{"nmId": 1, "views": 1}]}]},
            {"date": "2024-12-03T10:00:00Z", "apps": [{"nm": [{"nmId": 1, "views": 2}]}]}
        ]
    }]))
    .unwrap();
    let rows = campaign_stat_rows(&stats);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].day, day(2024, 12, 3));
    assert_eq!(rows[0].views, 2);
}

#[test]
fn campaign_ids_are_deduplicated_in_listing_order() {
    let response: PromotionCountResponse = serde_json::from_value(json!({
        "adverts": [
            {"type": 8, "status": 9, "count": 2, "advert_list": [
                {"advertId": 5, "changeTime": "2024-12-01T10:00:00+03:00"},
                {"advertId": 3, "changeTime": "2024-12-01T10:00:00+03:00"}
            ]},
            {"type": 9, "status": 11, "count": 2, "advert_list": [
                {"advertId": 5},
                {"advertId": 9}
            ]},
            {"type": 9, "status": 7, "count": 0}
        ],
        "all": 4
    }))
    .unwrap();
    assert_eq!(campaign_ids(&response), [5, 3, 9]);
}

#[test]
fn listed_campaigns_without_an_id_are_dropped() {
    let response: PromotionCountResponse = serde_json::from_value(json!({
        "adverts": [{"type": 8, "status": 9, "count": 3, "advert_list": [
            {"advertId": 77},
            {"changeTime": "2024-12-01T10:00:00+03:00"},
            {"advertId": null}
        ]}]
    }))
    .unwrap();
    assert_eq!(campaign_ids(&response), [77]);
}

#[test]
fn details_without_an_id_are_dropped() {
    let adverts: Vec<AdvertInfo> = serde_json::from_value(json!([
        {"advertId": 1, "name": "Зимняя", "type": 8, "status": 9},
        {"name": "без номера", "type": 8, "status": 9}
    ]))
    .unwrap();
    let meta = campaign_metadata(&adverts);
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].advert_id, 1);
}

#[test]
fn metadata_maps_labels_and_truncates_times() {
    let adverts: Vec<AdvertInfo> = serde_json::from_value(json!([
        {"advertId": 1, "name": "Зимняя", "type": 8, "status": 9,
         "createTime": "2024-11-20T12:00:00.123456+03:00",
         "startTime": "2024-11-21T00:00:00+03:00",
         "endTime": "2100-01-01T00:00:00+03:00"},
        {"advertId": 2, "type": 42, "status": 99}
    ]))
    .unwrap();
    let meta = campaign_metadata(&adverts);
    assert_eq!(meta[0].status, "Идут показы");
    assert_eq!(meta[0].campaign_type, "Автоматическая кампания");
    assert_eq!(meta[0].create_time, Some(day(2024, 11, 20)));
    assert_eq!(meta[0].end_time, Some(day(2100, 1, 1)));
    assert_eq!(meta[1].status, "99");
    assert_eq!(meta[1].campaign_type, "42");
    assert_eq!(meta[1].name, None);
    assert_eq!(meta[1].start_time, None);
}

#[test]
fn funnel_cards_uppercase_brand_and_keep_period_start() {
    let cards: Vec<NmReportCard> = serde_json::from_value(json!([
        {
            "nmID": 555,
            "vendorCode": "KA-1",
            "brandName": "KitchenAid",
            "object": {"id": 12, "name": "Миксеры"},
            "statistics": {"selectedPeriod": {
                "begin": "2024-12-01 00:00:00", "end": "2024-12-01 23:59:59",
                "openCardCount": 300, "addToCartCount": 20,
                "ordersCount": 4, "ordersSumRub": 8000.5,
                "buyoutsCount": 3, "buyoutsSumRub": 6000.0, "cancelCount": 1, "cancelSumRub": 2000.5
            }},
            "stocks": {"stocksMp": 2, "stocksWb": 40}
        },
        {"nmID": 556, "statistics": {"selectedPeriod": {}}}
    ]))
    .unwrap();
    let rows = funnel_cards(&cards);
    assert_eq!(rows.len(), 1, "card without a period start is dropped");
    let card = &rows[0];
    assert_eq!(card.brand_name, "KITCHENAID");
    assert_eq!(card.object_name, "Миксеры");
    assert_eq!(card.begin.to_string(), "2024-12-01 00:00:00");
    assert_eq!(card.stocks_wb, 40);

    let fact = card.order_fact();
    assert_eq!(fact.day, day(2024, 12, 1));
    assert_eq!(fact.orders_count, 4);
    assert_eq!(fact.add_to_cart_count, 20);
}

#[test]
fn history_flattens_one_fact_per_day() {
    let history: Vec<ProductHistory> = serde_json::from_value(json!([
        {"nmID": 1, "imtName": "Чайник", "vendorCode": "G-1", "history": [
            {"dt": "2024-12-01", "ordersCount": 2, "ordersSumRub": 100.0, "addToCartCount": 7},
            {"dt": "2024-12-02", "ordersCount": 0, "ordersSumRub": 0.0, "addToCartCount": 1}
        ]},
        {"nmID": 2, "history": []}
    ]))
    .unwrap();
    let facts = history_order_facts(&history);
    assert_eq!(facts.len(), 2);
    assert_eq!(facts[0].day, day(2024, 12, 1));
    assert_eq!(facts[0].add_to_cart_count, 7);
    assert_eq!(facts[1].day, day(2024, 12, 2));
}

#[test]
fn warehouse_stocks_emit_one_row_per_warehouse() {
    let items: Vec<RemainsItem> = serde_json::from_value(json!([
        {"brand": "Guten Tech", "subjectName": "Чайники", "vendorCode": "G-1",
         "warehouses": [
             {"warehouseName": "Коледино", "quantity": 10},
             {"warehouseName": "Всего находится на складах", "quantity": 12}
         ],
         "inWayToClient": 1, "inWayFromClient": 0, "quantityWarehousesFull": 12},
        {"brand": null, "vendorCode": "X",
         "warehouses": [{"warehouseName": "Казань", "quantity": 1}]},
        {"brand": "Empty", "warehouses": []}
    ]))
    .unwrap();
    let rows = warehouse_stocks(&items);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].brand, "GUTEN TECH");
    assert_eq!(rows[1].warehouse_name, "Всего находится на складах");
    assert_eq!(rows[1].quantity_warehouses_full, 12);
    assert_eq!(rows[2].brand, "");
    assert_eq!(rows[2].subject_name, "");
}
