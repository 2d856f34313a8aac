//! Ledger records

use grid_types::{ContractId, NodeId, TwinId};
use serde::{Deserialize, Serialize};

/// Account balance information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub nonce: u32,
    pub free: u128,
    pub reserved: u128,
}

/// Node registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub twin_id: TwinId,
    pub farm_id: u32,
}

/// Node contract state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractState {
    Created,
    Deleted,
    GracePeriod,
}

/// Node contract backing one deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub contract_id: ContractId,
    pub node_id: NodeId,
    pub state: ContractState,
    /// Hex challenge hash of the deployment version the contract covers
    pub deployment_hash: String,
    pub deployment_data: String,
    pub public_ips: u32,
    /// Public key of the owning identity
    pub owner: String,
}

impl Contract {
    pub fn is_created(&self) -> bool {
        self.state == ContractState::Created
    }
}
