//! Fetching recorded deployments from their nodes

use crate::error::Result;
use grid_ledger::SubstrateClient;
use grid_node::NodeClientCollection;
use grid_types::{Deployment, NodeDeploymentIds, NodeId};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// Fetch every recorded deployment as its node currently reports it
pub async fn get_deployment_objects(
    cancel: &CancellationToken,
    pool: &dyn NodeClientCollection,
    ledger: &dyn SubstrateClient,
    contracts: &NodeDeploymentIds,
) -> Result<BTreeMap<NodeId, Deployment>> {
    let mut deployments = BTreeMap::new();
    for (&node_id, &contract_id) in contracts {
        let client = pool.get_node_client(ledger, node_id).await?;
        let deployment = client.deployment_get(cancel, contract_id).await?;
        deployments.insert(node_id, deployment);
    }
    Ok(deployments)
}
