use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use clickhouse::Row;

use crate::error::WarehouseError;
use crate::tables::TableRow;
use crate::warehouse::Warehouse;

/// A statement or batch the memory warehouse received.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Command(String),
    Insert {
        table: String,
        rows: Vec<serde_json::Value>,
    },
}

/// Records every operation instead of executing it. Backs `--dry-run` and
/// the loader tests.
#[derive(Debug, Default)]
pub struct MemoryWarehouse {
    operations: Mutex<Vec<Operation>>,
    failing_tables: HashSet<String>,
}

impl MemoryWarehouse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every insert into `table` fail with [`WarehouseError::Rejected`].
    #[must_use]
    pub fn failing_inserts_into(mut self, table: &str) -> Self {
        self.failing_tables.insert(table.to_owned());
        self
    }

    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total rows inserted into `table` so far.
    #[must_use]
    pub fn inserted_rows(&self, table: &str) -> usize {
        self.operations()
            .iter()
            .map(|op| match op {
                Operation::Insert { table: t, rows } if t == table => rows.len(),
                _ => 0,
            })
            .sum()
    }

    fn record(&self, op: Operation) {
        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);
    }
}

impl Warehouse for MemoryWarehouse {
    async fn command(&self, sql: &str) -> Result<(), WarehouseError> {
        self.record(Operation::Command(sql.to_owned()));
        Ok(())
    }

    async fn insert<R>(&self, table: &str, rows: &[R]) -> Result<(), WarehouseError>
    where
        R: TableRow,
        for<'a> R: Row<Value<'a> = R>,
    {
        if self.failing_tables.contains(table) {
            return Err(WarehouseError::Rejected {
                table: table.to_owned(),
                reason: "insert failure injected".to_owned(),
            });
        }
        let rows = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| WarehouseError::Encode {
                table: table.to_owned(),
                source,
            })?;
        self.record(Operation::Insert {
            table: table.to_owned(),
            rows,
        });
        Ok(())
    }
}
