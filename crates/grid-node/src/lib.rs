//! Grid Node Clients
//!
//! Typed access to the RPC surface every node exposes over the bus, and a
//! collection that resolves node ids to clients through the ledger.
//!
//! ## Key Principle
//!
//! A node is addressed by its twin, not its node id. Resolution goes
//! through [`SubstrateClient::get_node`](grid_ledger::SubstrateClient::get_node)
//! once per node and the resulting client is reused.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod client;
pub mod error;
pub mod pool;

// Re-exports
pub use client::{commands, NodeClient};
pub use error::{NodeError, Result};
pub use pool::{is_nodes_up, NodeClientCollection, NodeClientPool};
