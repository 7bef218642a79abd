//! Serde shapes of the seller-API payloads.
//!
//! Every collection and counter defaults when absent: the upstream omits keys
//! freely, and a missing list is treated as empty rather than as an error.

use serde::{Deserialize, Deserializer, Serialize};
use wbetl_core::ReportWindow;

/// Reads an explicit `null` the same way as an absent key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Advertising: campaign listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionCountResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub adverts: Vec<AdvertGroup>,
    #[serde(default, deserialize_with = "nullable")]
    pub all: i64,
}

/// Campaigns sharing one (type, status) pair.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvertGroup {
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub advert_type: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub status: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub count: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub advert_list: Vec<AdvertRef>,
}

/// A listing entry. A missing `advertId` reads as 0 and is dropped when
/// flattened.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvertRef {
    #[serde(rename = "advertId", default, deserialize_with = "nullable")]
    pub advert_id: i64,
    #[serde(rename = "changeTime", default)]
    pub change_time: Option<String>,
}

/// One entry of `/adv/v1/promotion/adverts`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvertInfo {
    #[serde(rename = "advertId", default, deserialize_with = "nullable")]
    pub advert_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub advert_type: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub status: i64,
    #[serde(rename = "createTime", default)]
    pub create_time: Option<String>,
    #[serde(rename = "startTime", default)]
    pub start_time: Option<String>,
    #[serde(rename = "endTime", default)]
    pub end_time: Option<String>,
    #[serde(rename = "changeTime", default)]
    pub change_time: Option<String>,
}

// ---------------------------------------------------------------------------
// Advertising: full statistics
// ---------------------------------------------------------------------------

/// Period selector for `/adv/v2/fullstats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsPeriod {
    /// Explicit list of `YYYY-MM-DD` days.
    Dates(Vec<String>),
    /// Inclusive `begin`..`end` range in `YYYY-MM-DD`.
    Interval { begin: String, end: String },
}

impl StatsPeriod {
    /// The whole window as one interval, so each chunk is a single call.
    #[must_use]
    pub fn interval(window: &ReportWindow) -> Self {
        StatsPeriod::Interval {
            begin: window.start().to_string(),
            end: window.end().to_string(),
        }
    }

    #[must_use]
    pub fn dates(window: &ReportWindow) -> Self {
        StatsPeriod::Dates(window.days().map(|d| d.to_string()).collect())
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FullStatsRequest<'a> {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<IntervalBody<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct IntervalBody<'a> {
    pub begin: &'a str,
    pub end: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignStats {
    #[serde(rename = "advertId", default, deserialize_with = "nullable")]
    pub advert_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub days: Vec<StatsDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsDay {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub apps: Vec<StatsApp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsApp {
    #[serde(rename = "appType", default, deserialize_with = "nullable")]
    pub app_type: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub nm: Vec<StatsNm>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsNm {
    #[serde(rename = "nmId", default, deserialize_with = "nullable")]
    pub nm_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub views: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub clicks: i64,
    #[serde(default)]
    pub ctr: Option<f64>,
    #[serde(default)]
    pub cpc: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub sum: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub atbs: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub orders: i64,
    #[serde(default)]
    pub cr: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub shks: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub sum_price: f64,
}

// ---------------------------------------------------------------------------
// Analytics: nm-report detail (cursor) and history (chunked)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NmReportRequest<'a> {
    pub period: PeriodBody,
    #[serde(rename = "orderBy")]
    pub order_by: OrderBy,
    pub page: u32,
    pub timezone: &'a str,
    #[serde(rename = "brandNames")]
    pub brand_names: &'a [String],
    #[serde(rename = "objectIDs")]
    pub object_ids: &'a [i64],
    #[serde(rename = "nmIDs")]
    pub nm_ids: &'a [i64],
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PeriodBody {
    pub begin: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct OrderBy {
    pub field: &'static str,
    pub mode: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NmReportResponse {
    #[serde(default)]
    pub data: Option<NmReportData>,
    #[serde(default, deserialize_with = "nullable")]
    pub error: bool,
    #[serde(rename = "errorText", default)]
    pub error_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NmReportData {
    #[serde(default, deserialize_with = "nullable")]
    pub page: u32,
    #[serde(rename = "isNextPage", default, deserialize_with = "nullable")]
    pub is_next_page: bool,
    #[serde(default)]
    pub cards: Option<Vec<NmReportCard>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NmReportCard {
    #[serde(rename = "nmID", default, deserialize_with = "nullable")]
    pub nm_id: i64,
    #[serde(rename = "vendorCode", default)]
    pub vendor_code: Option<String>,
    #[serde(rename = "brandName", default)]
    pub brand_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub object: CardObject,
    #[serde(default, deserialize_with = "nullable")]
    pub statistics: CardStatistics,
    #[serde(default, deserialize_with = "nullable")]
    pub stocks: CardStocks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardObject {
    #[serde(default, deserialize_with = "nullable")]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardStatistics {
    #[serde(rename = "selectedPeriod", default, deserialize_with = "nullable")]
    pub selected_period: PeriodStatistics,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodStatistics {
    #[serde(default)]
    pub begin: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(rename = "openCardCount", default, deserialize_with = "nullable")]
    pub open_card_count: i64,
    #[serde(rename = "addToCartCount", default, deserialize_with = "nullable")]
    pub add_to_cart_count: i64,
    #[serde(rename = "ordersCount", default, deserialize_with = "nullable")]
    pub orders_count: i64,
    #[serde(rename = "ordersSumRub", default, deserialize_with = "nullable")]
    pub orders_sum_rub: f64,
    #[serde(rename = "buyoutsCount", default, deserialize_with = "nullable")]
    pub buyouts_count: i64,
    #[serde(rename = "buyoutsSumRub", default, deserialize_with = "nullable")]
    pub buyouts_sum_rub: f64,
    #[serde(rename = "cancelCount", default, deserialize_with = "nullable")]
    pub cancel_count: i64,
    #[serde(rename = "cancelSumRub", default, deserialize_with = "nullable")]
    pub cancel_sum_rub: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardStocks {
    #[serde(rename = "stocksMp", default, deserialize_with = "nullable")]
    pub stocks_mp: i64,
    #[serde(rename = "stocksWb", default, deserialize_with = "nullable")]
    pub stocks_wb: i64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct HistoryRequest<'a> {
    #[serde(rename = "nmIDs")]
    pub nm_ids: &'a [i64],
    pub period: PeriodBody,
    pub timezone: &'a str,
    #[serde(rename = "aggregationLevel")]
    pub aggregation_level: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub data: Option<Vec<ProductHistory>>,
    #[serde(default, deserialize_with = "nullable")]
    pub error: bool,
    #[serde(rename = "errorText", default)]
    pub error_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductHistory {
    #[serde(rename = "nmID", default, deserialize_with = "nullable")]
    pub nm_id: i64,
    #[serde(rename = "imtName", default)]
    pub imt_name: Option<String>,
    #[serde(rename = "vendorCode", default)]
    pub vendor_code: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub history: Vec<HistoryDay>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryDay {
    #[serde(default)]
    pub dt: Option<String>,
    #[serde(rename = "openCardCount", default, deserialize_with = "nullable")]
    pub open_card_count: i64,
    #[serde(rename = "addToCartCount", default, deserialize_with = "nullable")]
    pub add_to_cart_count: i64,
    #[serde(rename = "ordersCount", default, deserialize_with = "nullable")]
    pub orders_count: i64,
    #[serde(rename = "ordersSumRub", default, deserialize_with = "nullable")]
    pub orders_sum_rub: f64,
    #[serde(rename = "buyoutsCount", default, deserialize_with = "nullable")]
    pub buyouts_count: i64,
    #[serde(rename = "buyoutsSumRub", default, deserialize_with = "nullable")]
    pub buyouts_sum_rub: f64,
}

// ---------------------------------------------------------------------------
// Analytics: warehouse remains report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RemainsTaskResponse {
    #[serde(default)]
    pub data: Option<RemainsTask>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemainsTask {
    #[serde(rename = "taskId")]
    pub task_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemainsItem {
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(rename = "subjectName", default)]
    pub subject_name: Option<String>,
    #[serde(rename = "vendorCode", default)]
    pub vendor_code: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub warehouses: Vec<RemainsWarehouse>,
    #[serde(rename = "inWayToClient", default, deserialize_with = "nullable")]
    pub in_way_to_client: i64,
    #[serde(rename = "inWayFromClient", default, deserialize_with = "nullable")]
    pub in_way_from_client: i64,
    #[serde(rename = "quantityWarehousesFull", default, deserialize_with = "nullable")]
    pub quantity_warehouses_full: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemainsWarehouse {
    #[serde(rename = "warehouseName", default)]
    pub warehouse_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub quantity: i64,
}

// ---------------------------------------------------------------------------
// Statistics: realization report
// ---------------------------------------------------------------------------

/// One line of `/api/v5/supplier/reportDetailByPeriod`. Field names are the
/// upstream keys; dates stay raw until flattened.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealizationItem {
    #[serde(default, deserialize_with = "nullable")]
    pub realizationreport_id: i64,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub create_dt: Option<String>,
    #[serde(default)]
    pub currency_name: Option<String>,
    #[serde(default)]
    pub suppliercontract_code: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub rrd_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub gi_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub dlv_prc: f64,
    #[serde(default)]
    pub fix_tariff_date_from: Option<String>,
    #[serde(default)]
    pub fix_tariff_date_to: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub nm_id: i64,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub sa_name: Option<String>,
    #[serde(default)]
    pub ts_name: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub doc_type_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub retail_price: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub retail_amount: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub sale_percent: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub commission_percent: f64,
    #[serde(default)]
    pub office_name: Option<String>,
    #[serde(default)]
    pub supplier_oper_name: Option<String>,
    #[serde(default)]
    pub order_dt: Option<String>,
    #[serde(default)]
    pub sale_dt: Option<String>,
    #[serde(default)]
    pub rr_dt: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub shk_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub retail_price_withdisc_rub: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub delivery_amount: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub return_amount: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub delivery_rub: f64,
    #[serde(default)]
    pub gi_box_type_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub product_discount_for_report: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub supplier_promo: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub rid: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_spp_prc: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_kvw_prc_base: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_kvw_prc: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub sup_rating_prc_up: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub is_kgvp_v2: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_sales_commission: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_for_pay: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_reward: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub acquiring_fee: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub acquiring_percent: f64,
    #[serde(default)]
    pub payment_processing: Option<String>,
    #[serde(default)]
    pub acquiring_bank: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_vw: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_vw_nds: f64,
    #[serde(default)]
    pub ppvz_office_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_office_id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub ppvz_supplier_id: i64,
    #[serde(default)]
    pub ppvz_supplier_name: Option<String>,
    #[serde(default)]
    pub ppvz_inn: Option<String>,
    #[serde(default)]
    pub declaration_number: Option<String>,
    #[serde(default)]
    pub bonus_type_name: Option<String>,
    #[serde(default)]
    pub sticker_id: Option<String>,
    #[serde(default)]
    pub site_country: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub srv_dbs: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub penalty: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub additional_payment: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub rebill_logistic_cost: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub storage_fee: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub deduction: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub acceptance: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub assembly_id: i64,
    #[serde(default)]
    pub srid: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub report_type: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub is_legal_entity: bool,
    #[serde(default)]
    pub trbx_id: Option<String>,
    #[serde(default)]
    pub rebill_logistic_org: Option<String>,
}
