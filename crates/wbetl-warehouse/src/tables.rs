//! Canonical destination tables.
//!
//! Each struct's field order is the table's column order: the insert's column
//! list is derived from it, so row building and loading cannot disagree.

use chrono::{DateTime, NaiveDate, Utc};
use clickhouse::Row;
use serde::Serialize;
use wbetl_core::{FunnelCard, RealizationRecord, WarehouseStock, MARKETPLACE};

/// A row type bound to one destination table.
pub trait TableRow: Row + Serialize + Send + Sync + 'static {
    const TABLE: &'static str;
    /// Serialized column names in insert order.
    const COLUMNS: &'static [&'static str];
    /// SQL expression giving the row's calendar day, used by window deletes.
    const DAY_EXPR: &'static str;
}

/// Advertising facts joined with campaign metadata and order totals.
///
/// ```sql
/// CREATE TABLE campaign_data_wb (
///     nmId Int64, day Date, name_product Nullable(String),
///     views Int64, clicks Int64, sum Float64, atbs Int64, orders Int64,
///     shks Int64, sum_price Float64, advertId Int64,
///     Project String, Marketplace String,
///     endTime Nullable(Date), createTime Nullable(Date), startTime Nullable(Date),
///     name_campaign Nullable(String), status Nullable(String), type Nullable(String),
///     ordersCount Int64, ordersSumRub Float64, addToCartCount Int64
/// ) ENGINE = MergeTree ORDER BY (day, advertId, nmId);
/// ```
#[derive(Debug, Clone, PartialEq, Row, Serialize)]
pub struct CampaignDataRow {
    #[serde(rename = "nmId")]
    pub nm_id: i64,
    #[serde(with = "clickhouse::serde::chrono::date")]
    pub day: NaiveDate,
    pub name_product: Option<String>,
    pub views: i64,
    pub clicks: i64,
    pub sum: f64,
    pub atbs: i64,
    pub orders: i64,
    pub shks: i64,
    pub sum_price: f64,
    #[serde(rename = "advertId")]
    pub advert_id: i64,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Marketplace")]
    pub marketplace: String,
    #[serde(rename = "endTime", with = "clickhouse::serde::chrono::date::option")]
    pub end_time: Option<NaiveDate>,
    #[serde(rename = "createTime", with = "clickhouse::serde::chrono::date::option")]
    pub create_time: Option<NaiveDate>,
    #[serde(rename = "startTime", with = "clickhouse::serde::chrono::date::option")]
    pub start_time: Option<NaiveDate>,
    pub name_campaign: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub campaign_type: Option<String>,
    #[serde(rename = "ordersCount")]
    pub orders_count: i64,
    #[serde(rename = "ordersSumRub")]
    pub orders_sum_rub: f64,
    #[serde(rename = "addToCartCount")]
    pub add_to_cart_count: i64,
}

impl TableRow for CampaignDataRow {
    const TABLE: &'static str = "campaign_data_wb";
    const COLUMNS: &'static [&'static str] = &[
        "nmId",
        "day",
        "name_product",
        "views",
        "clicks",
        "sum",
        "atbs",
        "orders",
        "shks",
        "sum_price",
        "advertId",
        "Project",
        "Marketplace",
        "endTime",
        "createTime",
        "startTime",
        "name_campaign",
        "status",
        "type",
        "ordersCount",
        "ordersSumRub",
        "addToCartCount",
    ];
    const DAY_EXPR: &'static str = "day";
}

/// Sales funnel per SKU and reporting period.
///
/// ```sql
/// CREATE TABLE order_history_wb (
///     nmID Int64, vendorCode String, brandName String,
///     objectID Int64, objectName String, begin DateTime,
///     openCardCount Int64, addToCartCount Int64, ordersCount Int64, ordersSumRub Float64,
///     buyoutsCount Int64, buyoutsSumRub Float64, cancelCount Int64, cancelSumRub Float64,
///     stocksMp Int64, stocksWb Int64, Project String, Marketplace String
/// ) ENGINE = MergeTree ORDER BY (begin, nmID);
/// ```
#[derive(Debug, Clone, PartialEq, Row, Serialize)]
pub struct OrderHistoryRow {
    #[serde(rename = "nmID")]
    pub nm_id: i64,
    #[serde(rename = "vendorCode")]
    pub vendor_code: String,
    #[serde(rename = "brandName")]
    pub brand_name: String,
    #[serde(rename = "objectID")]
    pub object_id: i64,
    #[serde(rename = "objectName")]
    pub object_name: String,
    #[serde(with = "clickhouse::serde::chrono::datetime")]
    pub begin: DateTime<Utc>,
    #[serde(rename = "openCardCount")]
    pub open_card_count: i64,
    #[serde(rename = "addToCartCount")]
    pub add_to_cart_count: i64,
    #[serde(rename = "ordersCount")]
    pub orders_count: i64,
    #[serde(rename = "ordersSumRub")]
    pub orders_sum_rub: f64,
    #[serde(rename = "buyoutsCount")]
    pub buyouts_count: i64,
    #[serde(rename = "buyoutsSumRub")]
    pub buyouts_sum_rub: f64,
    #[serde(rename = "cancelCount")]
    pub cancel_count: i64,
    #[serde(rename = "cancelSumRub")]
    pub cancel_sum_rub: f64,
    #[serde(rename = "stocksMp")]
    pub stocks_mp: i64,
    #[serde(rename = "stocksWb")]
    pub stocks_wb: i64,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Marketplace")]
    pub marketplace: String,
}

impl OrderHistoryRow {
    #[must_use]
    pub fn from_card(project: &str, card: &FunnelCard) -> Self {
        Self {
            nm_id: card.nm_id,
            vendor_code: card.vendor_code.clone(),
            brand_name: card.brand_name.clone(),
            object_id: card.object_id,
            object_name: card.object_name.clone(),
            begin: card.begin.and_utc(),
            open_card_count: card.open_card_count,
            add_to_cart_count: card.add_to_cart_count,
            orders_count: card.orders_count,
            orders_sum_rub: card.orders_sum_rub,
            buyouts_count: card.buyouts_count,
            buyouts_sum_rub: card.buyouts_sum_rub,
            cancel_count: card.cancel_count,
            cancel_sum_rub: card.cancel_sum_rub,
            stocks_mp: card.stocks_mp,
            stocks_wb: card.stocks_wb,
            project: project.to_owned(),
            marketplace: MARKETPLACE.to_owned(),
        }
    }
}

impl TableRow for OrderHistoryRow {
    const TABLE: &'static str = "order_history_wb";
    const COLUMNS: &'static [&'static str] = &[
        "nmID",
        "vendorCode",
        "brandName",
        "objectID",
        "objectName",
        "begin",
        "openCardCount",
        "addToCartCount",
        "ordersCount",
        "ordersSumRub",
        "buyoutsCount",
        "buyoutsSumRub",
        "cancelCount",
        "cancelSumRub",
        "stocksMp",
        "stocksWb",
        "Project",
        "Marketplace",
    ];
    const DAY_EXPR: &'static str = "toDate(begin)";
}

/// Stock snapshot per vendor code and warehouse.
///
/// ```sql
/// CREATE TABLE warehouse_data_wb (
///     warehouseName String, quantity Int64, brand String, subjectName String,
///     vendorCode String, inWayToClient Int64, inWayFromClient Int64,
///     quantityWarehousesFull Int64, Project String, Date DateTime, Marketplace String
/// ) ENGINE = MergeTree ORDER BY (Date, vendorCode);
/// ```
#[derive(Debug, Clone, PartialEq, Row, Serialize)]
pub struct WarehouseStockRow {
    #[serde(rename = "warehouseName")]
    pub warehouse_name: String,
    pub quantity: i64,
    pub brand: String,
    #[serde(rename = "subjectName")]
    pub subject_name: String,
    #[serde(rename = "vendorCode")]
    pub vendor_code: String,
    #[serde(rename = "inWayToClient")]
    pub in_way_to_client: i64,
    #[serde(rename = "inWayFromClient")]
    pub in_way_from_client: i64,
    #[serde(rename = "quantityWarehousesFull")]
    pub quantity_warehouses_full: i64,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Date", with = "clickhouse::serde::chrono::datetime")]
    pub date: DateTime<Utc>,
    #[serde(rename = "Marketplace")]
    pub marketplace: String,
}

impl WarehouseStockRow {
    #[must_use]
    pub fn from_stock(project: &str, stock: &WarehouseStock, taken_at: DateTime<Utc>) -> Self {
        Self {
            warehouse_name: stock.warehouse_name.clone(),
            quantity: stock.quantity,
            brand: stock.brand.clone(),
            subject_name: stock.subject_name.clone(),
            vendor_code: stock.vendor_code.clone(),
            in_way_to_client: stock.in_way_to_client,
            in_way_from_client: stock.in_way_from_client,
            quantity_warehouses_full: stock.quantity_warehouses_full,
            project: project.to_owned(),
            date: taken_at,
            marketplace: MARKETPLACE.to_owned(),
        }
    }
}

impl TableRow for WarehouseStockRow {
    const TABLE: &'static str = "warehouse_data_wb";
    const COLUMNS: &'static [&'static str] = &[
        "warehouseName",
        "quantity",
        "brand",
        "subjectName",
        "vendorCode",
        "inWayToClient",
        "inWayFromClient",
        "quantityWarehousesFull",
        "Project",
        "Date",
        "Marketplace",
    ];
    const DAY_EXPR: &'static str = "toDate(Date)";
}

/// Value of `wb_finance.source`.
pub const REALIZATION_SOURCE: &str = "WB-Realization-API";

/// Realization report lines per project, stamped with the load time.
///
/// ```sql
/// CREATE TABLE wb_finance (
///     realizationreport_id Int64, date_from Nullable(DateTime),
///     date_to Nullable(DateTime), create_dt Nullable(DateTime),
///     currency_name Nullable(String), suppliercontract_code Nullable(String),
///     rrd_id Int64, gi_id Int64, dlv_prc Float64,
///     fix_tariff_date_from Nullable(DateTime), fix_tariff_date_to Nullable(DateTime),
///     subject_name Nullable(String), nm_id Int64, brand_name Nullable(String),
///     sa_name Nullable(String), ts_name Nullable(String), barcode Nullable(String),
///     doc_type_name Nullable(String), quantity Int64, retail_price Float64,
///     retail_amount Float64, sale_percent Int64, commission_percent Float64,
///     office_name Nullable(String), supplier_oper_name Nullable(String),
///     order_dt Nullable(DateTime), sale_dt Nullable(DateTime),
///     rr_dt Nullable(DateTime), shk_id Int64, retail_price_withdisc_rub Float64,
///     delivery_amount Int64, return_amount Int64, delivery_rub Float64,
///     gi_box_type_name Nullable(String), product_discount_for_report Float64,
///     supplier_promo Float64, rid Int64, ppvz_spp_prc Float64,
///     ppvz_kvw_prc_base Float64, ppvz_kvw_prc Float64, sup_rating_prc_up Float64,
///     is_kgvp_v2 Float64, ppvz_sales_commission Float64, ppvz_for_pay Float64,
///     ppvz_reward Float64, acquiring_fee Float64, acquiring_percent Float64,
///     payment_processing Nullable(String), acquiring_bank Nullable(String),
///     ppvz_vw Float64, ppvz_vw_nds Float64, ppvz_office_name Nullable(String),
///     ppvz_office_id Int64, ppvz_supplier_id Int64,
///     ppvz_supplier_name Nullable(String), ppvz_inn Nullable(String),
///     declaration_number Nullable(String), bonus_type_name Nullable(String),
///     sticker_id Nullable(String), site_country Nullable(String), srv_dbs UInt8,
///     penalty Float64, additional_payment Float64, rebill_logistic_cost Float64,
///     storage_fee Float64, deduction Float64, acceptance Float64, assembly_id Int64,
///     srid Nullable(String), report_type Int64, is_legal_entity UInt8,
///     trbx_id Nullable(String), rebill_logistic_org Nullable(String),
///     load_dt DateTime, source String, project String
/// ) ENGINE = MergeTree ORDER BY (rr_dt, rrd_id);
/// ```
#[derive(Debug, Clone, PartialEq, Row, Serialize)]
pub struct RealizationRow {
    pub realizationreport_id: i64,
    #[serde(with = "clickhouse::serde::chrono::datetime::option")]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(with = "clickhouse::serde::chrono::datetime::option")]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(with = "clickhouse::serde::chrono::datetime::option")]
    pub create_dt: Option<DateTime<Utc>>,
    pub currency_name: Option<String>,
    pub suppliercontract_code: Option<String>,
    pub rrd_id: i64,
    pub gi_id: i64,
    pub dlv_prc: f64,
    #[serde(with = "clickhouse::serde::chrono::datetime::option")]
    pub fix_tariff_date_from: Option<DateTime<Utc>>,
    #[serde(with = "clickhouse::serde::chrono::datetime::option")]
    pub fix_tariff_date_to: Option<DateTime<Utc>>,
    pub subject_name: Option<String>,
    pub nm_id: i64,
    pub brand_name: Option<String>,
    pub sa_name: Option<String>,
    pub ts_name: Option<String>,
    pub barcode: Option<String>,
    pub doc_type_name: Option<String>,
    pub quantity: i64,
    pub retail_price: f64,
    pub retail_amount: f64,
    pub sale_percent: i64,
    pub commission_percent: f64,
    pub office_name: Option<String>,
    pub supplier_oper_name: Option<String>,
    #[serde(with = "clickhouse::serde::chrono::datetime::option")]
    pub order_dt: Option<DateTime<Utc>>,
    #[serde(with = "clickhouse::serde::chrono::datetime::option")]
    pub sale_dt: Option<DateTime<Utc>>,
    #[serde(with = "clickhouse::serde::chrono::datetime::option")]
    pub rr_dt: Option<DateTime<Utc>>,
    pub shk_id: i64,
    pub retail_price_withdisc_rub: f64,
    pub delivery_amount: i64,
    pub return_amount: i64,
    pub delivery_rub: f64,
    pub gi_box_type_name: Option<String>,
    pub product_discount_for_report: f64,
    pub supplier_promo: f64,
    pub rid: i64,
    pub ppvz_spp_prc: f64,
    pub ppvz_kvw_prc_base: f64,
    pub ppvz_kvw_prc: f64,
    pub sup_rating_prc_up: f64,
    pub is_kgvp_v2: f64,
    pub ppvz_sales_commission: f64,
    pub ppvz_for_pay: f64,
    pub ppvz_reward: f64,
    pub acquiring_fee: f64,
    pub acquiring_percent: f64,
    pub payment_processing: Option<String>,
    pub acquiring_bank: Option<String>,
    pub ppvz_vw: f64,
    pub ppvz_vw_nds: f64,
    pub ppvz_office_name: Option<String>,
    pub ppvz_office_id: i64,
    pub ppvz_supplier_id: i64,
    pub ppvz_supplier_name: Option<String>,
    pub ppvz_inn: Option<String>,
    pub declaration_number: Option<String>,
    pub bonus_type_name: Option<String>,
    pub sticker_id: Option<String>,
    pub site_country: Option<String>,
    pub srv_dbs: u8,
    pub penalty: f64,
    pub additional_payment: f64,
    pub rebill_logistic_cost: f64,
    pub storage_fee: f64,
    pub deduction: f64,
    pub acceptance: f64,
    pub assembly_id: i64,
    pub srid: Option<String>,
    pub report_type: i64,
    pub is_legal_entity: u8,
    pub trbx_id: Option<String>,
    pub rebill_logistic_org: Option<String>,
    #[serde(with = "clickhouse::serde::chrono::datetime")]
    pub load_dt: DateTime<Utc>,
    pub source: String,
    pub project: String,
}

impl RealizationRow {
    #[must_use]
    pub fn from_record(
        project: &str,
        record: &RealizationRecord,
        loaded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            realizationreport_id: record.realizationreport_id,
            date_from: record.date_from.map(|ts| ts.and_utc()),
            date_to: record.date_to.map(|ts| ts.and_utc()),
            create_dt: record.create_dt.map(|ts| ts.and_utc()),
            currency_name: record.currency_name.clone(),
            suppliercontract_code: record.suppliercontract_code.clone(),
            rrd_id: record.rrd_id,
            gi_id: record.gi_id,
            dlv_prc: record.dlv_prc,
            fix_tariff_date_from: record.fix_tariff_date_from.map(|ts| ts.and_utc()),
            fix_tariff_date_to: record.fix_tariff_date_to.map(|ts| ts.and_utc()),
            subject_name: record.subject_name.clone(),
            nm_id: record.nm_id,
            brand_name: record.brand_name.clone(),
            sa_name: record.sa_name.clone(),
            ts_name: record.ts_name.clone(),
            barcode: record.barcode.clone(),
            doc_type_name: record.doc_type_name.clone(),
            quantity: record.quantity,
            retail_price: record.retail_price,
            retail_amount: record.retail_amount,
            sale_percent: record.sale_percent,
            commission_percent: record.commission_percent,
            office_name: record.office_name.clone(),
            supplier_oper_name: record.supplier_oper_name.clone(),
            order_dt: record.order_dt.map(|ts| ts.and_utc()),
            sale_dt: record.sale_dt.map(|ts| ts.and_utc()),
            rr_dt: record.rr_dt.map(|ts| ts.and_utc()),
            shk_id: record.shk_id,
            retail_price_withdisc_rub: record.retail_price_withdisc_rub,
            delivery_amount: record.delivery_amount,
            return_amount: record.return_amount,
            delivery_rub: record.delivery_rub,
            gi_box_type_name: record.gi_box_type_name.clone(),
            product_discount_for_report: record.product_discount_for_report,
            supplier_promo: record.supplier_promo,
            rid: record.rid,
            ppvz_spp_prc: record.ppvz_spp_prc,
            ppvz_kvw_prc_base: record.ppvz_kvw_prc_base,
            ppvz_kvw_prc: record.ppvz_kvw_prc,
            sup_rating_prc_up: record.sup_rating_prc_up,
            is_kgvp_v2: record.is_kgvp_v2,
            ppvz_sales_commission: record.ppvz_sales_commission,
            ppvz_for_pay: record.ppvz_for_pay,
            ppvz_reward: record.ppvz_reward,
            acquiring_fee: record.acquiring_fee,
            acquiring_percent: record.acquiring_percent,
            payment_processing: record.payment_processing.clone(),
            acquiring_bank: record.acquiring_bank.clone(),
            ppvz_vw: record.ppvz_vw,
            ppvz_vw_nds: record.ppvz_vw_nds,
            ppvz_office_name: record.ppvz_office_name.clone(),
            ppvz_office_id: record.ppvz_office_id,
            ppvz_supplier_id: record.ppvz_supplier_id,
            ppvz_supplier_name: record.ppvz_supplier_name.clone(),
            ppvz_inn: record.ppvz_inn.clone(),
            declaration_number: record.declaration_number.clone(),
            bonus_type_name: record.bonus_type_name.clone(),
            sticker_id: record.sticker_id.clone(),
            site_country: record.site_country.clone(),
            srv_dbs: u8::from(record.srv_dbs),
            penalty: record.penalty,
            additional_payment: record.additional_payment,
            rebill_logistic_cost: record.rebill_logistic_cost,
            storage_fee: record.storage_fee,
            deduction: record.deduction,
            acceptance: record.acceptance,
            assembly_id: record.assembly_id,
            srid: record.srid.clone(),
            report_type: record.report_type,
            is_legal_entity: u8::from(record.is_legal_entity),
            trbx_id: record.trbx_id.clone(),
            rebill_logistic_org: record.rebill_logistic_org.clone(),
            load_dt: loaded_at,
            source: REALIZATION_SOURCE.to_owned(),
            project: project.to_owned(),
        }
    }
}

impl TableRow for RealizationRow {
    const TABLE: &'static str = "wb_finance";
    const COLUMNS: &'static [&'static str] = &[
        "realizationreport_id",
        "date_from",
        "date_to",
        "create_dt",
        "currency_name",
        "suppliercontract_code",
        "rrd_id",
        "gi_id",
        "dlv_prc",
        "fix_tariff_date_from",
        "fix_tariff_date_to",
        "subject_name",
        "nm_id",
        "brand_name",
        "sa_name",
        "ts_name",
        "barcode",
        "doc_type_name",
        "quantity",
        "retail_price",
        "retail_amount",
        "sale_percent",
        "commission_percent",
        "office_name",
        "supplier_oper_name",
        "order_dt",
        "sale_dt",
        "rr_dt",
        "shk_id",
        "retail_price_withdisc_rub",
        "delivery_amount",
        "return_amount",
        "delivery_rub",
        "gi_box_type_name",
        "product_discount_for_report",
        "supplier_promo",
        "rid",
        "ppvz_spp_prc",
        "ppvz_kvw_prc_base",
        "ppvz_kvw_prc",
        "sup_rating_prc_up",
        "is_kgvp_v2",
        "ppvz_sales_commission",
        "ppvz_for_pay",
        "ppvz_reward",
        "acquiring_fee",
        "acquiring_percent",
        "payment_processing",
        "acquiring_bank",
        "ppvz_vw",
        "ppvz_vw_nds",
        "ppvz_office_name",
        "ppvz_office_id",
        "ppvz_supplier_id",
        "ppvz_supplier_name",
        "ppvz_inn",
        "declaration_number",
        "bonus_type_name",
        "sticker_id",
        "site_country",
        "srv_dbs",
        "penalty",
        "additional_payment",
        "rebill_logistic_cost",
        "storage_fee",
        "deduction",
        "acceptance",
        "assembly_id",
        "srid",
        "report_type",
        "is_legal_entity",
        "trbx_id",
        "rebill_logistic_org",
        "load_dt",
        "source",
        "project",
    ];
    const DAY_EXPR: &'static str = "toDate(rr_dt)";
}

#[cfg(test)]
#[path = "tables_test.rs"]
pub(crate) mod tests;
