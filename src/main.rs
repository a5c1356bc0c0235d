use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use pharos::{
    aliases::InMemoryAliasManager,
    config::AppConfig,
    fetcher::DataFetcher,
    messages::MessageRegistry,
    metrics::AppMetrics,
    node_manager::NodeManager,
    processor::Processor,
    reporter::{Reporter, StdoutReporter},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the monitor against every configured chain.
    Run,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run(cli.config).await?,
    }

    Ok(())
}

async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!("Loading application configuration...");
    let config = Arc::new(AppConfig::new(config_path.as_deref())?);
    tracing::info!(
        chains = config.chains.len(),
        subscription = %config.subscription,
        "Configuration loaded."
    );

    let metrics = Arc::new(AppMetrics::new()?);
    let registry = Arc::new(MessageRegistry::default());
    let aliases = Arc::new(InMemoryAliasManager::new());

    let fetcher =
        Arc::new(DataFetcher::new(Arc::clone(&config), aliases, Arc::clone(&metrics))?);

    let reporters: Vec<Box<dyn Reporter>> = vec![Box::new(StdoutReporter)];
    let processor = Processor::new(fetcher, reporters, config.subscription.clone());

    let cancel = CancellationToken::new();
    let (reports_tx, reports_rx) = mpsc::channel(config.report_channel_capacity);

    let manager = NodeManager::new(Arc::clone(&config), registry, metrics);
    let handles = manager.spawn(reports_tx, cancel.clone());
    tracing::info!(tasks = handles.len(), "Node subscriptions started.");

    tokio::select! {
        () = processor.run(reports_rx, cancel.clone()) => {
            tracing::warn!("Report stream ended.");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutdown signal received, stopping.");
        }
    }

    cancel.cancel();
    for handle in handles {
        let _ = handle.await;
    }
    tracing::info!("Shutdown complete.");

    Ok(())
}
