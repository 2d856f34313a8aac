//! Scripted deployer for testing resources without ledger or nodes

use crate::deployer::{Deployer, DeploymentOutcome};
use crate::error::DeployerError;
use async_trait::async_trait;
use grid_ledger::SubstrateClient;
use grid_types::{Deployment, NodeDeploymentIds, NodeId};
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Arguments of one recorded `deploy` call
#[derive(Debug, Clone, PartialEq)]
pub struct DeployCall {
    pub old: NodeDeploymentIds,
    pub new: BTreeMap<NodeId, Deployment>,
}

/// [`Deployer`] returning queued outcomes in order
#[derive(Default)]
pub struct MockDeployer {
    outcomes: Mutex<VecDeque<(NodeDeploymentIds, Option<String>)>>,
    calls: Mutex<Vec<DeployCall>>,
}

impl MockDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next call succeeds with `contracts`
    pub fn returning(mut self, contracts: NodeDeploymentIds) -> Self {
        self.outcomes.get_mut().push_back((contracts, None));
        self
    }

    /// Next call returns `contracts` together with an error
    pub fn failing(mut self, contracts: NodeDeploymentIds, error: &str) -> Self {
        self.outcomes
            .get_mut()
            .push_back((contracts, Some(error.to_string())));
        self
    }

    pub async fn calls(&self) -> Vec<DeployCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl Deployer for MockDeployer {
    async fn deploy(
        &self,
        _cancel: &CancellationToken,
        _ledger: &dyn SubstrateClient,
        old: &NodeDeploymentIds,
        new: &BTreeMap<NodeId, Deployment>,
    ) -> DeploymentOutcome {
        self.calls.lock().await.push(DeployCall {
            old: old.clone(),
            new: new.clone(),
        });

        match self.outcomes.lock().await.pop_front() {
            Some((contracts, None)) => DeploymentOutcome::ok(contracts),
            Some((contracts, Some(error))) => DeploymentOutcome {
                contracts,
                error: Some(DeployerError::Internal(error)),
            },
            None => DeploymentOutcome {
                contracts: old.clone(),
                error: Some(DeployerError::Internal("unexpected deploy call".to_string())),
            },
        }
    }
}
