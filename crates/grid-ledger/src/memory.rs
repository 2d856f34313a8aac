//! In-memory ledger
//!
//! Suitable for development and testing. Contract ids are allocated from a
//! counter, accounts are keyed by public key.

use crate::client::SubstrateClient;
use crate::error::{LedgerError, Result};
use crate::types::{AccountInfo, Contract, ContractState, Node};
use async_trait::async_trait;
use dashmap::DashMap;
use grid_types::{ContractId, Identity, NodeId, TwinId};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

/// In-memory [`SubstrateClient`]
pub struct InMemoryLedger {
    accounts: DashMap<String, AccountInfo>,
    nodes: DashMap<NodeId, Node>,
    contracts: DashMap<ContractId, Contract>,
    next_contract: AtomicU64,
    unavailable: AtomicBool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            nodes: DashMap::new(),
            contracts: DashMap::new(),
            next_contract: AtomicU64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Start allocating contract ids at `first`
    pub fn with_first_contract_id(self, first: ContractId) -> Self {
        self.next_contract.store(first, Ordering::SeqCst);
        self
    }

    pub fn register_node(&self, node_id: NodeId, twin_id: TwinId) {
        self.nodes.insert(
            node_id,
            Node {
                id: node_id,
                twin_id,
                farm_id: 1,
            },
        );
    }

    pub fn fund(&self, identity: &Identity, free: u128) {
        self.accounts
            .entry(identity.address())
            .or_default()
            .free = free;
    }

    /// Force a contract into a state, as the chain would on expiry
    pub fn set_contract_state(&self, contract_id: ContractId, state: ContractState) {
        if let Some(mut contract) = self.contracts.get_mut(&contract_id) {
            contract.state = state;
        }
    }

    /// Make every call fail until turned off again
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn contract(&self, contract_id: ContractId) -> Option<Contract> {
        self.contracts.get(&contract_id).map(|c| c.clone())
    }

    /// Contracts currently in `Created` state
    pub fn active_contracts(&self) -> Vec<Contract> {
        let mut active: Vec<Contract> = self
            .contracts
            .iter()
            .filter(|c| c.is_created())
            .map(|c| c.clone())
            .collect();
        active.sort_by_key(|c| c.contract_id);
        active
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }

    fn owned_active(&self, identity: &Identity, contract_id: ContractId) -> Result<()> {
        let contract = self
            .contracts
            .get(&contract_id)
            .ok_or(LedgerError::ContractNotFound(contract_id))?;
        if contract.owner != identity.address() {
            return Err(LedgerError::Rejected(format!(
                "contract {} is not owned by caller",
                contract_id
            )));
        }
        if !contract.is_created() {
            return Err(LedgerError::Rejected(format!(
                "contract {} is not active",
                contract_id
            )));
        }
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubstrateClient for InMemoryLedger {
    async fn get_account(&self, identity: &Identity) -> Result<AccountInfo> {
        self.check_available()?;
        self.accounts
            .get(&identity.address())
            .map(|a| a.clone())
            .ok_or_else(|| LedgerError::AccountNotFound(identity.address()))
    }

    async fn get_node(&self, node_id: NodeId) -> Result<Node> {
        self.check_available()?;
        self.nodes
            .get(&node_id)
            .map(|n| n.clone())
            .ok_or(LedgerError::NodeNotFound(node_id))
    }

    async fn get_contract(&self, contract_id: ContractId) -> Result<Contract> {
        self.check_available()?;
        self.contracts
            .get(&contract_id)
            .map(|c| c.clone())
            .ok_or(LedgerError::ContractNotFound(contract_id))
    }

    async fn create_contract(
        &self,
        identity: &Identity,
        node_id: NodeId,
        body: &str,
        hash: &str,
        public_ips: u32,
    ) -> Result<ContractId> {
        self.check_available()?;
        if !self.nodes.contains_key(&node_id) {
            return Err(LedgerError::NodeNotFound(node_id));
        }

        let contract_id = self.next_contract.fetch_add(1, Ordering::SeqCst);
        self.contracts.insert(
            contract_id,
            Contract {
                contract_id,
                node_id,
                state: ContractState::Created,
                deployment_hash: hash.to_string(),
                deployment_data: body.to_string(),
                public_ips,
                owner: identity.address(),
            },
        );
        debug!(contract_id, node_id, "Contract created");
        Ok(contract_id)
    }

    async fn update_contract(
        &self,
        identity: &Identity,
        contract_id: ContractId,
        body: &str,
        hash: &str,
    ) -> Result<ContractId> {
        self.check_available()?;
        self.owned_active(identity, contract_id)?;

        if let Some(mut contract) = self.contracts.get_mut(&contract_id) {
            contract.deployment_hash = hash.to_string();
            contract.deployment_data = body.to_string();
        }
        debug!(contract_id, "Contract updated");
        Ok(contract_id)
    }

    async fn cancel_contract(&self, identity: &Identity, contract_id: ContractId) -> Result<()> {
        self.check_available()?;
        self.owned_active(identity, contract_id)?;

        self.set_contract_state(contract_id, ContractState::Deleted);
        debug!(contract_id, "Contract cancelled");
        Ok(())
    }
}
