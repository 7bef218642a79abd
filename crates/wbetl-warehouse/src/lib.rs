//! ClickHouse loading for the canonical tables.

pub mod client;
pub mod error;
pub mod load;
pub mod memory;
pub mod tables;
pub mod warehouse;

pub use client::{ClickHouseConfig, ClickHouseWarehouse};
pub use error::WarehouseError;
pub use load::{delete_window_sql, load_rows, LoadMode, LoadSummary};
pub use memory::{MemoryWarehouse, Operation};
pub use tables::{
    CampaignDataRow, OrderHistoryRow, RealizationRow, TableRow, WarehouseStockRow,
    REALIZATION_SOURCE,
};
pub use warehouse::Warehouse;
