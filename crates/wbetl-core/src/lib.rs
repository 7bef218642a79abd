pub mod app_config;
pub mod config;
pub mod dates;
pub mod labels;
pub mod projects;
pub mod records;

mod error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use dates::{parse_day, parse_timestamp, ReportWindow};
pub use error::{ConfigError, CoreError};
pub use labels::{campaign_status_label, campaign_type_label};
pub use projects::{load_projects, Project, ProjectConfig, ProjectsFile};
pub use records::{
    CampaignMetadata, CampaignStatRow, FunnelCard, ProductOrderFact, RealizationRecord,
    WarehouseStock, MARKETPLACE,
};
