use clickhouse::{insert::Insert, Client, Row};
use wbetl_core::AppConfig;

use crate::error::WarehouseError;
use crate::tables::TableRow;
use crate::warehouse::Warehouse;

/// Connection settings for the ClickHouse HTTP interface.
#[derive(Clone)]
pub struct ClickHouseConfig {
    pub url: String,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ClickHouseConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            url: config.clickhouse_url.clone(),
            database: config.clickhouse_database.clone(),
            user: config.clickhouse_user.clone(),
            password: config.clickhouse_password.clone(),
        }
    }
}

impl std::fmt::Debug for ClickHouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseConfig")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct ClickHouseWarehouse {
    client: Client,
}

impl ClickHouseWarehouse {
    #[must_use]
    pub fn new(config: &ClickHouseConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database);
        if let Some(user) = &config.user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.password {
            client = client.with_password(password);
        }
        Self { client }
    }
}

impl Warehouse for ClickHouseWarehouse {
    async fn command(&self, sql: &str) -> Result<(), WarehouseError> {
        self.client.query(sql).execute().await?;
        Ok(())
    }

    async fn insert<R>(&self, table: &str, rows: &[R]) -> Result<(), WarehouseError>
    where
        R: TableRow,
        for<'a> R: Row<Value<'a> = R>,
    {
        let mut insert: Insert<R> = self.client.insert(table).await?;
        for row in rows {
            insert.write(row).await?;
        }
        insert.end().await?;
        tracing::debug!(table, rows = rows.len(), "clickhouse insert committed");
        Ok(())
    }
}
