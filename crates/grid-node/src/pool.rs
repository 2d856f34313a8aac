//! Node client collection

use crate::client::NodeClient;
use crate::error::{NodeError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use grid_ledger::SubstrateClient;
use grid_rmb::RmbClient;
use grid_types::NodeId;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Resolves node ids to clients bound to the node's twin
#[async_trait]
pub trait NodeClientCollection: Send + Sync {
    /// Resolution errors are returned as-is, without retry
    async fn get_node_client(
        &self,
        ledger: &dyn SubstrateClient,
        node_id: NodeId,
    ) -> Result<NodeClient>;
}

/// Caching collection sharing one bus client across all nodes
pub struct NodeClientPool {
    rmb: Arc<dyn RmbClient>,
    clients: DashMap<NodeId, NodeClient>,
}

impl NodeClientPool {
    pub fn new(rmb: Arc<dyn RmbClient>) -> Self {
        Self {
            rmb,
            clients: DashMap::new(),
        }
    }

    pub fn cached(&self) -> usize {
        self.clients.len()
    }
}

#[async_trait]
impl NodeClientCollection for NodeClientPool {
    async fn get_node_client(
        &self,
        ledger: &dyn SubstrateClient,
        node_id: NodeId,
    ) -> Result<NodeClient> {
        if let Some(client) = self.clients.get(&node_id) {
            return Ok(client.clone());
        }

        let node = ledger.get_node(node_id).await?;
        debug!(node_id, twin = node.twin_id, "Resolved node twin");

        let client = NodeClient::new(node.twin_id, self.rmb.clone());
        self.clients.insert(node_id, client.clone());
        Ok(client)
    }
}

/// Probe every listed node, failing on the first one that does not answer
pub async fn is_nodes_up(
    cancel: &CancellationToken,
    pool: &dyn NodeClientCollection,
    ledger: &dyn SubstrateClient,
    nodes: &[NodeId],
) -> Result<()> {
    for &node_id in nodes {
        let client = pool.get_node_client(ledger, node_id).await?;
        if let Err(e) = client.ping(cancel).await {
            warn!(node_id, error = %e, "Node did not answer liveness probe");
            return Err(match e {
                NodeError::Rmb(source) => NodeError::Unreachable { node_id, source },
                other => other,
            });
        }
    }
    Ok(())
}
