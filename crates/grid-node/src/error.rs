//! Node client error types

use grid_ledger::LedgerError;
use grid_rmb::RmbError;
use grid_types::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("couldn't resolve node: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    Rmb(#[from] RmbError),

    #[error("couldn't reach node {node_id}: {source}")]
    Unreachable {
        node_id: NodeId,
        #[source]
        source: RmbError,
    },
}

impl NodeError {
    pub fn is_cancelled(&self) -> bool {
        match self {
            NodeError::Rmb(e) | NodeError::Unreachable { source: e, .. } => e.is_cancelled(),
            NodeError::Ledger(_) => false,
        }
    }

    /// The node answered that it holds no such deployment
    pub fn is_not_found(&self) -> bool {
        match self {
            NodeError::Rmb(RmbError::Remote(msg)) => msg.to_lowercase().contains("not found"),
            _ => false,
        }
    }
}

/// Result type for node operations
pub type Result<T> = std::result::Result<T, NodeError>;
