//! Node commands

use crate::error::CliResult;
use crate::output::{print_single, print_success, OutputFormat};
use clap::Subcommand;
use grid_node::NodeClient;
use grid_types::TwinId;
use tokio_util::sync::CancellationToken;

/// Node subcommands
#[derive(Debug, Subcommand)]
pub enum NodeCommands {
    /// Check that a node answers on the bus
    Ping {
        /// Node twin
        twin: TwinId,
    },

    /// Show a node's network interfaces
    Interfaces {
        /// Node twin
        twin: TwinId,
    },
}

/// Execute a node command
pub async fn execute(
    command: NodeCommands,
    client_for: impl Fn(TwinId) -> NodeClient,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        NodeCommands::Ping { twin } => {
            client_for(twin).ping(cancel).await?;
            print_success(&format!("Twin {} is reachable", twin));
            Ok(())
        }

        NodeCommands::Interfaces { twin } => {
            let interfaces = client_for(twin).network_interfaces(cancel).await?;
            print_single(&interfaces, format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_node::commands;
    use grid_rmb::MockRmbClient;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_ping() {
        let rmb = Arc::new(MockRmbClient::new());
        rmb.reply(12, commands::NETWORK_INTERFACES, json!({"zos": ["10.0.0.2"]}));
        let bus = rmb.clone();

        execute(
            NodeCommands::Ping { twin: 12 },
            move |twin| NodeClient::new(twin, bus.clone()),
            &CancellationToken::new(),
            OutputFormat::Table,
        )
        .await
        .unwrap();
        assert_eq!(rmb.call_count(12, commands::NETWORK_INTERFACES), 1);
    }

    #[tokio::test]
    async fn test_ping_unreachable() {
        let rmb = Arc::new(MockRmbClient::new());
        rmb.unreachable(12, commands::NETWORK_INTERFACES);
        let bus = rmb.clone();

        let result = execute(
            NodeCommands::Ping { twin: 12 },
            move |twin| NodeClient::new(twin, bus.clone()),
            &CancellationToken::new(),
            OutputFormat::Table,
        )
        .await;
        assert!(result.is_err());
    }
}
