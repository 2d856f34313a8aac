//! gridctl - Operator CLI for the grid message bus
//!
//! Talks to nodes through the bus gateway:
//! - Send raw requests to any twin
//! - Probe node liveness and list interfaces
//! - Fetch deployments and wait for them to be applied

use clap::{Parser, Subcommand};
use grid_node::NodeClient;
use grid_rmb::ProxyBus;
use grid_types::TwinId;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::{call, deployment, node, until_interrupted};
use crate::config::{GridConfig, LoggingConfig};
use error::CliResult;
use output::{print_error, print_single, OutputFormat};

/// gridctl CLI
#[derive(Parser)]
#[command(name = "gridctl")]
#[command(about = "Grid operator CLI - nodes and deployments over the message bus", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GRID_CONFIG")]
    config: Option<String>,

    /// Bus gateway endpoint
    #[arg(short, long, env = "GRID_ENDPOINT")]
    endpoint: Option<String>,

    /// Source twin id
    #[arg(long, env = "GRID_TWIN")]
    twin: Option<TwinId>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,

    /// Log level
    #[arg(long, env = "GRID_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Send a raw request to a twin and print the reply
    Call(call::CallArgs),

    /// Node liveness and information
    Node {
        #[command(subcommand)]
        command: node::NodeCommands,
    },

    /// Inspect deployments on nodes
    #[command(alias = "dl")]
    Deployment {
        #[command(subcommand)]
        command: deployment::DeploymentCommands,
    },

    /// Show effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    // Load configuration, then apply CLI overrides
    let mut config = GridConfig::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.rmb.endpoint = endpoint;
    }
    if let Some(twin) = cli.twin {
        config.rmb.twin_id = twin;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    init_tracing(&config.logging);

    let format = cli.output;
    let cancel = CancellationToken::new();

    match cli.command {
        Commands::Config => print_single(&config, format),

        Commands::Call(args) => {
            let bus = connect(&config)?;
            until_interrupted(&cancel, call::execute(args, bus.as_ref(), &cancel, format)).await
        }

        Commands::Node { command } => {
            let bus = connect(&config)?;
            let client_for = |twin| NodeClient::new(twin, bus.clone());
            until_interrupted(&cancel, node::execute(command, client_for, &cancel, format)).await
        }

        Commands::Deployment { command } => {
            let bus = connect(&config)?;
            let client_for = |twin| NodeClient::new(twin, bus.clone());
            until_interrupted(
                &cancel,
                deployment::execute(command, client_for, &config.deployer, &cancel, format),
            )
            .await
        }
    }
}

fn connect(config: &GridConfig) -> CliResult<Arc<ProxyBus>> {
    let bus = ProxyBus::new(&config.rmb)?;
    if bus.twin_id() == 0 {
        warn!("No source twin configured, replies may not be routed back");
    }
    info!(endpoint = bus.endpoint(), twin = bus.twin_id(), "Bus client ready");
    Ok(Arc::new(bus))
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());

    if logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
