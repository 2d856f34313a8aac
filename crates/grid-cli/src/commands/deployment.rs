//! Deployment inspection commands

use crate::error::CliResult;
use crate::output::{print_deployment, print_success, OutputFormat};
use clap::Subcommand;
use grid_deployer::{wait_deployment, DeployerConfig};
use grid_node::NodeClient;
use grid_types::{ContractId, TwinId};
use tokio_util::sync::CancellationToken;

/// Deployment subcommands
#[derive(Debug, Subcommand)]
pub enum DeploymentCommands {
    /// Fetch a deployment as the node reports it
    Get {
        /// Node twin
        #[arg(short, long)]
        twin: TwinId,

        /// Contract id
        contract_id: ContractId,
    },

    /// Wait until every workload of a deployment version is applied
    Wait {
        /// Node twin
        #[arg(short, long)]
        twin: TwinId,

        /// Contract id
        contract_id: ContractId,

        /// Deployment version to wait for
        #[arg(long, default_value_t = 0)]
        version: u32,
    },
}

/// Execute a deployment command
pub async fn execute(
    command: DeploymentCommands,
    client_for: impl Fn(TwinId) -> NodeClient,
    config: &DeployerConfig,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        DeploymentCommands::Get { twin, contract_id } => {
            let deployment = client_for(twin).deployment_get(cancel, contract_id).await?;
            print_deployment(&deployment, format)
        }

        DeploymentCommands::Wait {
            twin,
            contract_id,
            version,
        } => {
            let client = client_for(twin);
            wait_deployment(cancel, &client, contract_id, version, config).await?;
            print_success(&format!(
                "Deployment {} version {} is applied",
                contract_id, version
            ));
            Ok(())
        }
    }
}
