use std::future::Future;

use clickhouse::Row;

use crate::error::WarehouseError;
use crate::tables::TableRow;

/// A columnar store the loader writes into.
pub trait Warehouse {
    /// Runs a statement that returns no rows.
    fn command(&self, sql: &str) -> impl Future<Output = Result<(), WarehouseError>> + Send;

    /// Inserts `rows` into `table` as a single batch.
    fn insert<R>(
        &self,
        table: &str,
        rows: &[R],
    ) -> impl Future<Output = Result<(), WarehouseError>> + Send
    where
        R: TableRow,
        for<'a> R: Row<Value<'a> = R>;
}
