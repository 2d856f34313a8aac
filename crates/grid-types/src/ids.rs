//! Identifiers shared with the ledger and the nodes
//!
//! These are plain integers on the wire, so they stay type aliases rather
//! than newtypes.

use std::collections::BTreeMap;

/// Node identifier as registered on the ledger
pub type NodeId = u32;

/// Twin identifier, the bus address of a node or user
pub type TwinId = u32;

/// On-chain contract identifier. `0` means "not created yet".
pub type ContractId = u64;

/// Persisted link between local intent and the ledger: node -> contract.
///
/// Ordered so iteration and serialization are deterministic.
pub type NodeDeploymentIds = BTreeMap<NodeId, ContractId>;
