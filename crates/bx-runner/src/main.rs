//! # bx-runner
//!
//! Command-line entry point for the BTCEXA client.
//!
//! Loads a JSON configuration file, then either calls one REST endpoint and
//! prints the JSON response, or opens a subscription and logs every frame
//! until Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! bx-runner config.json endpoints
//! bx-runner config.json call market_ticker -p trading_pair=btcusdt
//! bx-runner config.json --log-level debug stream kline btcusdt --period 5m
//! bx-runner config.json stream orders btcusdt NEW
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use bx_core::config::AppConfig;
use bx_core::types::Params;
use bx_rest::{BtcexaClient, endpoints};
use bx_ws::StreamClient;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;

/// BTCEXA REST and WebSocket client.
#[derive(Parser)]
#[command(name = "bx-runner", about = "BTCEXA REST and WebSocket client")]
struct Cli {
    /// Configuration file path (JSON).
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output (overrides `runner.log_path`).
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the REST endpoints.
    Endpoints,

    /// Call one REST endpoint and print the response.
    Call {
        /// Endpoint name (see `endpoints`).
        name: String,

        /// Argument as `key=value`; repeatable.
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// Open a subscription and log frames until Ctrl+C.
    #[command(subcommand)]
    Stream(StreamCommand),
}

#[derive(Subcommand)]
enum StreamCommand {
    /// All-market tickers.
    Ticker,
    Kline {
        pair: String,
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Depth {
        pair: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Trade {
        pair: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Private order updates (authenticated).
    Orders { pair: String, status: String },
}

fn parse_key_val(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw.split_once('=').ok_or_else(|| anyhow!("expected key=value, got {raw:?}"))?;
    if key.is_empty() {
        return Err(anyhow!("empty parameter name in {raw:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration
    let config = bx_core::config::load_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // 2. Initialize logging
    let log_dir = cli.log_dir.clone().or_else(|| config.log_path());
    let _log_guard = bx_core::logging::init_logging(&cli.log_level, log_dir.as_deref(), &config.module_name());

    info!("bx-runner starting, config={}, log_level={}", cli.config.display(), cli.log_level);
    run(cli.command, &config).await
}

/// Execute one subcommand. Credentials are checked only by the arms that
/// talk to the exchange.
async fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Endpoints => {
            for def in endpoints::ALL {
                let stamped = if def.timestamp { "stamped" } else { "" };
                println!("{:<34} {:<5} {:<44} {:<8} {}", def.name, def.verb.as_str(), def.path, stamped, def.summary);
            }
        }
        Command::Call { name, params } => {
            let client = BtcexaClient::new(&config.client)?;
            let args: Params = params.into_iter().collect();
            let resp = client.dispatch_named(&name, args).await?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }
        Command::Stream(cmd) => {
            let stream = StreamClient::new(&config.client)?;
            let handler = |frame: Value| info!(%frame, "frame");

            let mut handle = match cmd {
                StreamCommand::Ticker => stream.market_ticker(handler)?,
                StreamCommand::Kline { pair, period, limit } => {
                    stream.market_kline(handler, &pair, period.as_deref(), limit)?
                }
                StreamCommand::Depth { pair, limit } => stream.market_depth(handler, &pair, limit)?,
                StreamCommand::Trade { pair, limit } => stream.market_trade(handler, &pair, limit)?,
                StreamCommand::Orders { pair, status } => stream.active_orders(handler, &pair, &status, None)?,
            };

            info!("subscribed to {}, press Ctrl+C to stop", handle.url());

            // 3. Wait for shutdown signal
            tokio::signal::ctrl_c().await?;
            info!("shutdown signal received");
            handle.close().await;
        }
    }

    Ok(())
}
