//! Grid Ledger
//!
//! Interface to the on-chain contract ledger. The ledger is the source of
//! truth for which deployments should exist: every deployment is backed by
//! a node contract carrying the deployment's challenge hash.
//!
//! Only the operations the reconciler consumes are modelled here. The
//! [`InMemoryLedger`] implementation is suitable for development and tests.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod client;
pub mod error;
pub mod memory;
pub mod types;

// Re-exports
pub use client::SubstrateClient;
pub use error::{LedgerError, Result};
pub use memory::InMemoryLedger;
pub use types::{AccountInfo, Contract, ContractState, Node};
