mod campaigns;
mod finance;
mod funnel;
mod runner;
mod sink;
mod stocks;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wbetl_api::{retry_policy_from_config, WbClient};
use wbetl_core::{AppConfig, Project};

use crate::campaigns::CampaignArgs;
use crate::finance::FinanceArgs;
use crate::funnel::FunnelArgs;
use crate::stocks::StocksArgs;

#[derive(Debug, Parser)]
#[command(name = "wbetl")]
#[command(about = "Wildberries seller data into ClickHouse")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load advertising stats joined with campaign metadata and orders
    Campaigns(CampaignArgs),
    /// Load one day of the sales funnel per SKU
    Funnel(FunnelArgs),
    /// Load a warehouse stock snapshot
    Stocks(StocksArgs),
    /// Load realization report lines for a period
    Finance(FinanceArgs),
    /// List configured projects and whether their key is set
    Projects,
}

/// Everything a job needs, built once per run.
pub(crate) struct JobContext {
    pub config: AppConfig,
    pub client: WbClient,
    pub projects: Vec<Project>,
    pub cancel: CancellationToken,
}

impl JobContext {
    /// # Errors
    ///
    /// Returns an error once shutdown was requested, so collected data is
    /// never loaded from an interrupted run.
    pub(crate) fn ensure_not_cancelled(&self) -> anyhow::Result<()> {
        if self.cancel.is_cancelled() {
            anyhow::bail!("run cancelled before loading; nothing was written");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = wbetl_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(?config, "configuration loaded");

    if matches!(cli.command, Commands::Projects) {
        return list_projects(&config);
    }

    let projects = wbetl_core::load_projects(&config.projects_path)?;
    let cancel = CancellationToken::new();
    let client = WbClient::with_base_urls(
        config.request_timeout_secs,
        &config.user_agent,
        retry_policy_from_config(&config),
        &config.advert_api_url,
        &config.analytics_api_url,
    )?
    .with_statistics_base_url(&config.statistics_api_url)
    .with_cancellation(cancel.clone());

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    let ctx = JobContext {
        config,
        client,
        projects,
        cancel,
    };
    let today = chrono::Local::now().date_naive();

    match &cli.command {
        Commands::Campaigns(args) => campaigns::run(&ctx, args, today).await,
        Commands::Funnel(args) => funnel::run(&ctx, args, today).await,
        Commands::Stocks(args) => stocks::run(&ctx, args, chrono::Utc::now()).await,
        Commands::Finance(args) => finance::run(&ctx, args, today, chrono::Utc::now()).await,
        Commands::Projects => Ok(()),
    }
}

fn list_projects(config: &AppConfig) -> anyhow::Result<()> {
    let file = wbetl_core::projects::load_projects_file(&config.projects_path)?;
    for project in &file.projects {
        let key_set = std::env::var(&project.api_key_env).is_ok_and(|v| !v.trim().is_empty());
        println!(
            "{}\t{}\t{}",
            project.name,
            project.api_key_env,
            if key_set { "key set" } else { "key missing" }
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::warn!("received shutdown signal, stopping after the current request");
}
