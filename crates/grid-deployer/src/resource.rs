//! Single-workload resources
//!
//! A resource is one workload on one node, tracked through the node ->
//! contract map. [`ResourceDeployer`] owns that map and the resource id and
//! changes both only in [`ResourceDeployer::commit`].

use crate::deployer::Deployer;
use crate::error::{DeployerError, Result};
use crate::remote::get_deployment_objects;
use grid_ledger::SubstrateClient;
use grid_node::{is_nodes_up, NodeClientCollection};
use grid_types::{
    Deployment, Identity, NodeDeploymentIds, NodeId, ResultState, TwinId, Workload,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A resource backed by exactly one workload
pub trait WorkloadResource:
    Clone + Default + PartialEq + Send + Sync + Serialize + DeserializeOwned
{
    /// Workload name, unique within its deployment
    fn name(&self) -> &str;

    /// The workload this resource wants on the node
    fn workload(&self) -> grid_types::Result<Workload>;

    /// Fold a node-reported workload back into the resource
    fn apply_remote(&mut self, workload: &Workload) -> grid_types::Result<()>;

    /// Whether some fields are only known after the node applied the workload
    fn has_computed(&self) -> bool {
        false
    }

    /// Forget node-computed fields
    fn clear_computed(&mut self) {}
}

/// Everything a resource needs to talk to the grid
#[derive(Clone)]
pub struct ResourceContext {
    pub twin_id: TwinId,
    pub identity: Identity,
    pub deployer: Arc<dyn Deployer>,
    pub pool: Arc<dyn NodeClientCollection>,
}

impl ResourceContext {
    pub fn new(
        twin_id: TwinId,
        identity: Identity,
        deployer: Arc<dyn Deployer>,
        pool: Arc<dyn NodeClientCollection>,
    ) -> Self {
        Self {
            twin_id,
            identity,
            deployer,
            pool,
        }
    }
}

/// Declarative record of a resource, as stored by the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState<R> {
    #[serde(default)]
    pub id: String,
    pub node: NodeId,
    /// Node ids are map keys, hence strings
    #[serde(default)]
    pub node_deployment_id: BTreeMap<String, u64>,
    #[serde(flatten)]
    pub resource: R,
}

/// Reconciler for one single-workload resource
pub struct ResourceDeployer<R: WorkloadResource> {
    pub id: String,
    pub node: NodeId,
    pub node_deployment_id: NodeDeploymentIds,
    pub resource: R,
    ctx: ResourceContext,
}

impl<R: WorkloadResource> ResourceDeployer<R> {
    pub fn new(ctx: ResourceContext, node: NodeId, resource: R) -> Self {
        Self {
            id: String::new(),
            node,
            node_deployment_id: NodeDeploymentIds::new(),
            resource,
            ctx,
        }
    }

    /// Rebuild from a stored record
    pub fn from_state(ctx: ResourceContext, state: ResourceState<R>) -> Result<Self> {
        let mut node_deployment_id = NodeDeploymentIds::new();
        for (node, contract_id) in state.node_deployment_id {
            let node_id = node
                .parse::<NodeId>()
                .map_err(|_| DeployerError::InvalidNodeId(node.clone()))?;
            node_deployment_id.insert(node_id, contract_id);
        }

        Ok(Self {
            id: state.id,
            node: state.node,
            node_deployment_id,
            resource: state.resource,
            ctx,
        })
    }

    /// Project back into a stored record
    pub fn store_state(&self) -> ResourceState<R> {
        ResourceState {
            id: self.id.clone(),
            node: self.node,
            node_deployment_id: self
                .node_deployment_id
                .iter()
                .map(|(node, contract)| (node.to_string(), *contract))
                .collect(),
            resource: self.resource.clone(),
        }
    }

    /// Desired deployments, one for the resource's node. Pure.
    pub fn generate_versionless_deployments(&self) -> Result<BTreeMap<NodeId, Deployment>> {
        let workload = self.resource.workload()?;
        let deployment = Deployment::new(self.ctx.twin_id, vec![workload]);

        let mut deployments = BTreeMap::new();
        deployments.insert(self.node, deployment);
        Ok(deployments)
    }

    /// Create or update the resource on the grid
    #[instrument(skip_all, fields(node = self.node, name = self.resource.name()))]
    pub async fn deploy(
        &mut self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        let desired = self.generate_versionless_deployments()?;
        let outcome = self
            .ctx
            .deployer
            .deploy(cancel, ledger, &self.node_deployment_id, &desired)
            .await;
        self.commit(outcome.contracts);

        if self.resource.has_computed() && !self.node_deployment_id.is_empty() {
            if let Err(e) = self.update_from_remote(cancel, ledger).await {
                warn!(error = %e, "Error updating state");
            }
        }

        match outcome.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Remove everything recorded for the resource
    #[instrument(skip_all, fields(node = self.node))]
    pub async fn cancel(
        &mut self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        let outcome = self
            .ctx
            .deployer
            .deploy(cancel, ledger, &self.node_deployment_id, &BTreeMap::new())
            .await;
        self.commit(outcome.contracts);

        match outcome.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Drop recorded contracts the ledger no longer reports as created.
    ///
    /// On any ledger error the local state is left untouched.
    pub async fn sync_contracts(&mut self, ledger: &dyn SubstrateClient) -> Result<()> {
        let mut alive = NodeDeploymentIds::new();
        for (&node_id, &contract_id) in &self.node_deployment_id {
            let contract = ledger.get_contract(contract_id).await?;
            if contract.is_created() {
                alive.insert(node_id, contract_id);
            } else {
                debug!(node_id, contract_id, state = ?contract.state, "Dropping contract");
            }
        }
        self.commit(alive);
        Ok(())
    }

    /// Reconcile local state with the ledger, then with the node
    #[instrument(skip_all, fields(node = self.node))]
    pub async fn sync(
        &mut self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        // 1. Contracts
        self.sync_contracts(ledger).await?;
        if self.node_deployment_id.is_empty() {
            return Ok(());
        }

        // 2. Node results
        let deployments = get_deployment_objects(
            cancel,
            self.ctx.pool.as_ref(),
            ledger,
            &self.node_deployment_id,
        )
        .await?;
        let remote = deployments
            .get(&self.node)
            .and_then(|dl| dl.get(self.resource.name()));

        match remote {
            Some(wl) if wl.result.state == ResultState::Ok => self.resource.apply_remote(wl)?,
            _ => {
                info!("Workload missing or not ok on node, resetting");
                self.resource = R::default();
            }
        }
        Ok(())
    }

    /// Refresh node-computed fields from the recorded deployments
    pub async fn update_from_remote(
        &mut self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        let deployments = get_deployment_objects(
            cancel,
            self.ctx.pool.as_ref(),
            ledger,
            &self.node_deployment_id,
        )
        .await?;

        match deployments
            .get(&self.node)
            .and_then(|dl| dl.get(self.resource.name()))
        {
            Some(wl) => self.resource.apply_remote(wl)?,
            None => self.resource.clear_computed(),
        }
        Ok(())
    }

    /// Account must be funded and the target node reachable
    pub async fn validate(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        let account = ledger.get_account(&self.ctx.identity).await?;
        if account.free == 0 {
            return Err(DeployerError::InsufficientBalance);
        }
        self.nodes_up(cancel, ledger, &[self.node]).await
    }

    pub async fn validate_create(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        self.nodes_up(cancel, ledger, &[self.node]).await
    }

    pub async fn validate_update(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        let mut nodes = vec![self.node];
        nodes.extend(self.node_deployment_id.keys().filter(|n| **n != self.node));
        self.nodes_up(cancel, ledger, &nodes).await
    }

    pub async fn validate_read(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        let nodes: Vec<NodeId> = self.node_deployment_id.keys().copied().collect();
        self.nodes_up(cancel, ledger, &nodes).await
    }

    pub async fn validate_delete(
        &self,
        _cancel: &CancellationToken,
        _ledger: &dyn SubstrateClient,
    ) -> Result<()> {
        Ok(())
    }

    async fn nodes_up(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
        nodes: &[NodeId],
    ) -> Result<()> {
        is_nodes_up(cancel, self.ctx.pool.as_ref(), ledger, nodes).await?;
        Ok(())
    }

    /// The single place the contract map and the id change
    fn commit(&mut self, contracts: NodeDeploymentIds) {
        self.node_deployment_id = contracts;

        if self.node_deployment_id.is_empty() {
            self.id.clear();
        } else if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }

        if !self.node_deployment_id.contains_key(&self.node) {
            self.resource.clear_computed();
        }
    }
}
