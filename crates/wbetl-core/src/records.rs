//! Flat records produced from upstream payloads and consumed by the pipeline
//! stages. None of these are persisted as-is; the warehouse crate owns the
//! exported table shapes.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Constant written to the `Marketplace` column of every table.
pub const MARKETPLACE: &str = "Wildberries";

/// One (campaign, day, app, SKU) statistic line from the full-stats report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignStatRow {
    pub day: NaiveDate,
    pub nm_id: i64,
    pub advert_id: i64,
    pub name: Option<String>,
    pub views: i64,
    pub clicks: i64,
    /// Advertising spend.
    pub sum: f64,
    pub atbs: i64,
    pub orders: i64,
    pub shks: i64,
    pub sum_price: f64,
    pub ctr: Option<f64>,
    pub cpc: Option<f64>,
    pub cr: Option<f64>,
}

/// Campaign attributes with status and type already mapped to labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignMetadata {
    pub advert_id: i64,
    pub name: Option<String>,
    pub create_time: Option<NaiveDate>,
    pub start_time: Option<NaiveDate>,
    pub end_time: Option<NaiveDate>,
    pub status: String,
    pub campaign_type: String,
}

/// Per (SKU, day) order totals from the sales-funnel reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductOrderFact {
    pub nm_id: i64,
    pub day: NaiveDate,
    pub orders_count: i64,
    pub orders_sum_rub: f64,
    pub add_to_cart_count: i64,
}

/// One nm-report detail card: a SKU's funnel over the requested period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelCard {
    pub nm_id: i64,
    pub vendor_code: String,
    pub brand_name: String,
    pub object_id: i64,
    pub object_name: String,
    pub begin: NaiveDateTime,
    pub open_card_count: i64,
    pub add_to_cart_count: i64,
    pub orders_count: i64,
    pub orders_sum_rub: f64,
    pub buyouts_count: i64,
    pub buyouts_sum_rub: f64,
    pub cancel_count: i64,
    pub cancel_sum_rub: f64,
    pub stocks_mp: i64,
    pub stocks_wb: i64,
}

impl FunnelCard {
    /// The order totals this card contributes for its period's first day.
    #[must_use]
    pub fn order_fact(&self) -> ProductOrderFact {
        ProductOrderFact {
            nm_id: self.nm_id,
            day: self.begin.date(),
            orders_count: self.orders_count,
            orders_sum_rub: self.orders_sum_rub,
            add_to_cart_count: self.add_to_cart_count,
        }
    }
}

/// Stock of one vendor code at one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseStock {
    pub warehouse_name: String,
    pub quantity: i64,
    pub brand: String,
    pub subject_name: String,
    pub vendor_code: String,
    pub in_way_to_client: i64,
    pub in_way_from_client: i64,
    pub quantity_warehouses_full: i64,
}

/// One realization-report line: a sale, return, logistics charge or
/// deduction, with blank strings already read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RealizationRecord {
    pub realizationreport_id: i64,
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
    pub create_dt: Option<NaiveDateTime>,
    pub currency_name: Option<String>,
    pub suppliercontract_code: Option<String>,
    pub rrd_id: i64,
    pub gi_id: i64,
    pub dlv_prc: f64,
    pub fix_tariff_date_from: Option<NaiveDateTime>,
    pub fix_tariff_date_to: Option<NaiveDateTime>,
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
    pub order_dt: Option<NaiveDateTime>,
    pub sale_dt: Option<NaiveDateTime>,
    pub rr_dt: Option<NaiveDateTime>,
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
    pub srv_dbs: bool,
    pub penalty: f64,
    pub additional_payment: f64,
    pub rebill_logistic_cost: f64,
    pub storage_fee: f64,
    pub deduction: f64,
    pub acceptance: f64,
    pub assembly_id: i64,
    pub srid: Option<String>,
    pub report_type: i64,
    pub is_legal_entity: bool,
    pub trbx_id: Option<String>,
    pub rebill_logistic_org: Option<String>,
}
