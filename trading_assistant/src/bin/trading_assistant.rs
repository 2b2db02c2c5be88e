use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use trading_assistant::{
    assembly::build_trading_loop,
    config::{AppConfig, DEFAULT_CONFIG_PATH},
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to the config file (trading_assistant.toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override `trading.symbol` from the config file
    #[arg(long)]
    symbol: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run trading cycles until Ctrl-C
    Run,

    /// Run exactly one cycle and print its report as JSON
    Once,

    /// Ask for a one-shot trend-change analysis and print it as JSON
    Trend,
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(symbol) = cli.symbol {
        config.trading.symbol = symbol;
        config.validate()?;
    }
    init_tracing(&config.logging.filter);

    let trading_loop = build_trading_loop(&config).context("starting trading assistant")?;

    match cli.command {
        Commands::Run => {
            let (stop_tx, stop_rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("shutdown requested; finishing the current cycle");
                    let _ = stop_tx.send(true);
                }
            });
            trading_loop.run(stop_rx).await;
        }
        Commands::Once => {
            let report = trading_loop.run_cycle().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Trend => {
            let trend = trading_loop.trend_once().await?;
            println!("{}", serde_json::to_string_pretty(&trend)?);
        }
    }

    Ok(())
}
