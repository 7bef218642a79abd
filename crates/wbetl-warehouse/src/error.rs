use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("clickhouse error: {0}")]
    ClickHouse(#[from] clickhouse::error::Error),

    #[error("invalid table identifier \"{0}\"")]
    InvalidTable(String),

    #[error("failed to encode rows for {table}: {source}")]
    Encode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{table} rejected the write: {reason}")]
    Rejected { table: String, reason: String },

    /// The window was already deleted when the insert failed, so it stays
    /// empty until the job is rerun.
    #[error(
        "deleted {window} from {table} but the insert failed; rerun the job to restore it: {source}"
    )]
    InsertAfterDelete {
        table: String,
        window: String,
        #[source]
        source: Box<WarehouseError>,
    },
}
