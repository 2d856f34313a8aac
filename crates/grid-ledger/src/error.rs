//! Ledger error types

use grid_types::{ContractId, NodeId};
use thiserror::Error;

/// Errors reported by the ledger client
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Contract not found: {0}")]
    ContractNotFound(ContractId),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Ledger rejected call: {0}")]
    Rejected(String),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
