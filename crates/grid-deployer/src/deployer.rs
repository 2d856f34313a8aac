//! Per-node deployment engine
//!
//! Given the recorded node -> contract map and the desired deployments, each
//! node is handled independently:
//!
//! - desired, not recorded: create contract, record it, push, wait
//! - recorded and desired: bump version, update contract, push update, wait.
//!   A contract whose deployment never reached the node is pushed again.
//! - recorded, not desired: cancel contract unless already gone, delete from
//!   node, forget it
//!
//! A failure stops that node's sequence only. Nothing is rolled back on
//! other nodes; the returned map reflects what actually exists.

use crate::config::DeployerConfig;
use crate::error::{DeployerError, Result};
use crate::wait::wait_deployment;
use async_trait::async_trait;
use grid_ledger::{LedgerError, SubstrateClient};
use grid_node::{NodeClient, NodeClientCollection};
use grid_types::{ContractId, Deployment, Identity, NodeDeploymentIds, NodeId, TwinId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Result of one engine pass.
///
/// `contracts` is meaningful even when `error` is set: it is the map the
/// caller must persist.
#[derive(Debug)]
pub struct DeploymentOutcome {
    pub contracts: NodeDeploymentIds,
    pub error: Option<DeployerError>,
}

impl DeploymentOutcome {
    pub fn ok(contracts: NodeDeploymentIds) -> Self {
        Self {
            contracts,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Drives contracts and node deployments toward a desired set
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
        old: &NodeDeploymentIds,
        new: &BTreeMap<NodeId, Deployment>,
    ) -> DeploymentOutcome;
}

/// Engine backed by the ledger and the node clients
pub struct DeploymentDeployer {
    identity: Identity,
    twin_id: TwinId,
    pool: Arc<dyn NodeClientCollection>,
    config: DeployerConfig,
}

impl DeploymentDeployer {
    pub fn new(
        identity: Identity,
        twin_id: TwinId,
        pool: Arc<dyn NodeClientCollection>,
        config: DeployerConfig,
    ) -> Self {
        Self {
            identity,
            twin_id,
            pool,
            config,
        }
    }

    #[instrument(skip(self, cancel, ledger, desired, contracts))]
    async fn create(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
        node_id: NodeId,
        desired: &Deployment,
        contracts: &mut NodeDeploymentIds,
    ) -> Result<()> {
        // 1. Validate and sign
        let mut dl = desired.clone();
        dl.version = 0;
        dl.contract_id = 0;
        for wl in dl.workloads.iter_mut() {
            wl.version = 0;
        }
        dl.validate()?;
        dl.sign(self.twin_id, &self.identity)?;
        let hash = dl.challenge_hex()?;

        // 2. Resolve the node before writing anything to the ledger
        let client = self.pool.get_node_client(ledger, node_id).await?;

        // 3. Create the contract and record it immediately
        let contract_id = ledger
            .create_contract(
                &self.identity,
                node_id,
                &dl.metadata,
                &hash,
                dl.count_public_ips(),
            )
            .await?;
        contracts.insert(node_id, contract_id);
        info!(node_id, contract_id, "Contract created");

        // 4. Push and wait
        dl.contract_id = contract_id;
        client.deployment_deploy(cancel, &dl).await?;
        wait_deployment(cancel, &client, contract_id, dl.version, &self.config).await
    }

    #[instrument(skip(self, cancel, ledger, desired))]
    async fn update(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
        node_id: NodeId,
        contract_id: ContractId,
        desired: &Deployment,
    ) -> Result<()> {
        // 1. Fetch what the node holds
        let client = self.pool.get_node_client(ledger, node_id).await?;
        let current = match client.deployment_get(cancel, contract_id).await {
            Ok(current) => current,
            Err(e) if e.is_not_found() => {
                if !ledger.get_contract(contract_id).await?.is_created() {
                    return Err(e.into());
                }
                // Contract exists but the push never landed
                info!(node_id, contract_id, "Deployment missing on node, pushing again");
                return self
                    .redeploy(cancel, ledger, &client, node_id, contract_id, desired)
                    .await;
            }
            Err(e) => return Err(e.into()),
        };

        // 2. Next version, unchanged workloads keep theirs
        let mut dl = desired.clone();
        dl.contract_id = contract_id;
        dl.version = current.version + 1;
        let mut changed = dl.workloads.len() != current.workloads.len();
        for wl in dl.workloads.iter_mut() {
            match current.get(&wl.name) {
                Some(prev) if prev.same_spec(wl) => wl.version = prev.version,
                _ => {
                    wl.version = dl.version;
                    changed = true;
                }
            }
        }
        if !changed
            && dl.description == current.description
            && dl.metadata == current.metadata
        {
            debug!(node_id, contract_id, "Deployment unchanged");
            return Ok(());
        }

        // 3. Sign, update the contract, push
        dl.validate()?;
        dl.sign(self.twin_id, &self.identity)?;
        let hash = dl.challenge_hex()?;
        ledger
            .update_contract(&self.identity, contract_id, &dl.metadata, &hash)
            .await?;
        info!(node_id, contract_id, version = dl.version, "Contract updated");

        client.deployment_update(cancel, &dl).await?;
        wait_deployment(cancel, &client, contract_id, dl.version, &self.config).await
    }

    #[instrument(skip(self, cancel, ledger))]
    async fn cancel(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
        node_id: NodeId,
        contract_id: ContractId,
    ) -> Result<()> {
        // 1. Make sure the contract is gone, a previous pass may have cancelled it
        let active = match ledger.get_contract(contract_id).await {
            Ok(contract) => contract.is_created(),
            Err(LedgerError::ContractNotFound(_)) => false,
            Err(e) => return Err(e.into()),
        };
        if active {
            ledger.cancel_contract(&self.identity, contract_id).await?;
            info!(node_id, contract_id, "Contract cancelled");
        } else {
            debug!(node_id, contract_id, "Contract already cancelled");
        }

        // 2. Remove it from the node
        let client = self.pool.get_node_client(ledger, node_id).await?;
        match client.deployment_delete(cancel, contract_id).await {
            Err(e) if e.is_not_found() => {
                debug!(node_id, contract_id, "Deployment already gone from node");
                Ok(())
            }
            result => Ok(result?),
        }
    }

    /// Push version 0 under an existing contract whose deployment the node lost
    async fn redeploy(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
        client: &NodeClient,
        node_id: NodeId,
        contract_id: ContractId,
        desired: &Deployment,
    ) -> Result<()> {
        let mut dl = desired.clone();
        dl.version = 0;
        dl.contract_id = contract_id;
        for wl in dl.workloads.iter_mut() {
            wl.version = 0;
        }
        dl.validate()?;
        dl.sign(self.twin_id, &self.identity)?;
        let hash = dl.challenge_hex()?;

        ledger
            .update_contract(&self.identity, contract_id, &dl.metadata, &hash)
            .await?;
        debug!(node_id, contract_id, "Contract hash refreshed");

        client.deployment_deploy(cancel, &dl).await?;
        wait_deployment(cancel, client, contract_id, dl.version, &self.config).await
    }
}

#[async_trait]
impl Deployer for DeploymentDeployer {
    #[instrument(skip_all, fields(recorded = old.len(), desired = new.len()))]
    async fn deploy(
        &self,
        cancel: &CancellationToken,
        ledger: &dyn SubstrateClient,
        old: &NodeDeploymentIds,
        new: &BTreeMap<NodeId, Deployment>,
    ) -> DeploymentOutcome {
        let mut contracts = old.clone();
        let mut errors = Vec::new();

        // 1. Create or update every desired node
        for (&node_id, desired) in new {
            let result = match old.get(&node_id) {
                Some(&contract_id) if contract_id != 0 => {
                    self.update(cancel, ledger, node_id, contract_id, desired)
                        .await
                }
                _ => {
                    contracts.remove(&node_id);
                    self.create(cancel, ledger, node_id, desired, &mut contracts)
                        .await
                }
            };
            if let Err(e) = result {
                warn!(node_id, error = %e, "Node deployment failed");
                errors.push(DeployerError::on_node(node_id, e));
            }
        }

        // 2. Cancel recorded nodes that are no longer desired
        for (&node_id, &contract_id) in old.iter().filter(|(n, _)| !new.contains_key(n)) {
            if contract_id == 0 {
                contracts.remove(&node_id);
                continue;
            }
            match self.cancel(cancel, ledger, node_id, contract_id).await {
                Ok(()) => {
                    contracts.remove(&node_id);
                }
                Err(e) => {
                    warn!(node_id, contract_id, error = %e, "Node cancellation failed");
                    errors.push(DeployerError::on_node(node_id, e));
                }
            }
        }

        DeploymentOutcome {
            contracts,
            error: DeployerError::aggregate(errors),
        }
    }
}
