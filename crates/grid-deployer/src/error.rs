//! Reconciler error types

use grid_ledger::LedgerError;
use grid_node::NodeError;
use grid_types::{ContractId, NodeId, TypesError};
use thiserror::Error;

/// Reconciler errors
#[derive(Debug, Error)]
pub enum DeployerError {
    #[error("invalid deployment: {0}")]
    InvalidDeployment(#[from] TypesError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("node error: {0}")]
    Node(#[from] NodeError),

    #[error("workload {name} failed: {error}")]
    Workload { name: String, error: String },

    #[error("timeout waiting for deployment {contract_id} after {secs}s")]
    Timeout { contract_id: ContractId, secs: u64 },

    #[error("operation cancelled")]
    Cancelled,

    #[error("account has no free balance")]
    InsufficientBalance,

    #[error("couldn't parse node id {0}")]
    InvalidNodeId(String),

    #[error("node {node_id}: {source}")]
    OnNode {
        node_id: NodeId,
        #[source]
        source: Box<DeployerError>,
    },

    #[error("{}", join(.0))]
    Nodes(Vec<DeployerError>),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DeployerError {
    pub fn on_node(node_id: NodeId, source: DeployerError) -> Self {
        DeployerError::OnNode {
            node_id,
            source: Box::new(source),
        }
    }

    /// Fold per-node failures into one error, `None` when there were none
    pub fn aggregate(mut errors: Vec<DeployerError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(DeployerError::Nodes(errors)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match self {
            DeployerError::Cancelled => true,
            DeployerError::Node(e) => e.is_cancelled(),
            DeployerError::OnNode { source, .. } => source.is_cancelled(),
            DeployerError::Nodes(errors) => errors.iter().all(|e| e.is_cancelled()),
            _ => false,
        }
    }
}

fn join(errors: &[DeployerError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for reconciler operations
pub type Result<T> = std::result::Result<T, DeployerError>;
