//! Writes canonical rows into the warehouse in append or replace-window mode.

use clickhouse::Row;
use wbetl_core::ReportWindow;

use crate::error::WarehouseError;
use crate::tables::TableRow;
use crate::warehouse::Warehouse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Append,
    /// Delete every row whose day falls in the window, then insert.
    ReplaceWindow(ReportWindow),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: String,
    pub rows: usize,
    /// Set when a window delete was issued before the insert.
    pub replaced: Option<ReportWindow>,
}

/// Accepts `name` or `database.name` made of ASCII alphanumerics and `_`,
/// not starting with a digit.
fn validate_table(table: &str) -> Result<(), WarehouseError> {
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    let parts: Vec<&str> = table.split('.').collect();
    if parts.len() <= 2 && parts.iter().all(|p| valid_part(p)) {
        Ok(())
    } else {
        Err(WarehouseError::InvalidTable(table.to_owned()))
    }
}

/// The window delete for `table`, filtering on `day_expr`.
#[must_use]
pub fn delete_window_sql(table: &str, day_expr: &str, window: &ReportWindow) -> String {
    format!(
        "ALTER TABLE {table} DELETE WHERE {day_expr} >= '{}' AND {day_expr} <= '{}'",
        window.start().format("%Y-%m-%d"),
        window.end().format("%Y-%m-%d"),
    )
}

/// Loads `rows` into `table`.
///
/// An empty batch is a no-op in both modes, so a failed upstream fetch never
/// clears a window it could not refill.
///
/// # Errors
///
/// Returns [`WarehouseError::InvalidTable`] before touching the warehouse if
/// the identifier is unsafe, [`WarehouseError::InsertAfterDelete`] if the
/// window was deleted but the insert failed, or the underlying error
/// otherwise.
pub async fn load_rows<W, R>(
    warehouse: &W,
    table: &str,
    rows: &[R],
    mode: LoadMode,
) -> Result<LoadSummary, WarehouseError>
where
    W: Warehouse + Sync,
    R: TableRow,
    for<'a> R: Row<Value<'a> = R>,
{
    validate_table(table)?;

    if rows.is_empty() {
        tracing::info!(table, "no rows to load; warehouse left untouched");
        return Ok(LoadSummary {
            table: table.to_owned(),
            rows: 0,
            replaced: None,
        });
    }

    match mode {
        LoadMode::Append => {
            warehouse.insert(table, rows).await?;
            tracing::info!(table, rows = rows.len(), "rows appended");
            Ok(LoadSummary {
                table: table.to_owned(),
                rows: rows.len(),
                replaced: None,
            })
        }
        LoadMode::ReplaceWindow(window) => {
            warehouse
                .command(&delete_window_sql(table, R::DAY_EXPR, &window))
                .await?;
            tracing::info!(table, window = %window, "window deleted");

            if let Err(source) = warehouse.insert(table, rows).await {
                tracing::error!(
                    table,
                    window = %window,
                    error = %source,
                    "insert failed after window delete"
                );
                return Err(WarehouseError::InsertAfterDelete {
                    table: table.to_owned(),
                    window: window.to_string(),
                    source: Box::new(source),
                });
            }
            tracing::info!(table, rows = rows.len(), window = %window, "window replaced");
            Ok(LoadSummary {
                table: table.to_owned(),
                rows: rows.len(),
                replaced: Some(window),
            })
        }
    }
}

#[cfg(test)]
#[path = "load_test.rs"]
mod tests;
