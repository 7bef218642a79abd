//! Final load step: ClickHouse for real runs, the memory warehouse for
//! `--dry-run`.

use clickhouse::Row;
use wbetl_core::AppConfig;
use wbetl_warehouse::{
    load_rows, ClickHouseConfig, ClickHouseWarehouse, LoadMode, LoadSummary, MemoryWarehouse,
    Operation, TableRow,
};

/// Loads `rows` into the row type's table.
///
/// # Errors
///
/// Returns an error if the warehouse rejects the delete or the insert.
pub(crate) async fn write_table<R>(
    config: &AppConfig,
    rows: &[R],
    mode: LoadMode,
    dry_run: bool,
) -> anyhow::Result<LoadSummary>
where
    R: TableRow,
    for<'a> R: Row<Value<'a> = R>,
{
    if dry_run {
        let warehouse = MemoryWarehouse::new();
        let summary = load_rows(&warehouse, R::TABLE, rows, mode).await?;
        print_dry_run(&warehouse);
        return Ok(summary);
    }

    let warehouse = ClickHouseWarehouse::new(&ClickHouseConfig::from_app_config(config));
    Ok(load_rows(&warehouse, R::TABLE, rows, mode).await?)
}

fn print_dry_run(warehouse: &MemoryWarehouse) {
    let operations = warehouse.operations();
    if operations.is_empty() {
        println!("[dry-run] nothing would be written");
    }
    for op in &operations {
        match op {
            Operation::Command(sql) => println!("[dry-run] would run: {sql}"),
            Operation::Insert { table, rows } => {
                println!("[dry-run] would insert {} rows into {table}", rows.len());
                if let Some(first) = rows.first() {
                    println!("[dry-run] first row: {first}");
                }
            }
        }
    }
}
