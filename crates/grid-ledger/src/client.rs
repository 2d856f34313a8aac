//! Ledger client trait

use crate::error::Result;
use crate::types::{AccountInfo, Contract, Node};
use async_trait::async_trait;
use grid_types::{ContractId, Identity, NodeId};

/// Operations consumed from the contract ledger
#[async_trait]
pub trait SubstrateClient: Send + Sync {
    async fn get_account(&self, identity: &Identity) -> Result<AccountInfo>;

    async fn get_node(&self, node_id: NodeId) -> Result<Node>;

    async fn get_contract(&self, contract_id: ContractId) -> Result<Contract>;

    /// Create a node contract, returning its id
    async fn create_contract(
        &self,
        identity: &Identity,
        node_id: NodeId,
        body: &str,
        hash: &str,
        public_ips: u32,
    ) -> Result<ContractId>;

    /// Point an existing contract at a new deployment hash
    async fn update_contract(
        &self,
        identity: &Identity,
        contract_id: ContractId,
        body: &str,
        hash: &str,
    ) -> Result<ContractId>;

    async fn cancel_contract(&self, identity: &Identity, contract_id: ContractId) -> Result<()>;
}
