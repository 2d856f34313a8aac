//! Grid Types
//!
//! Shared data model for the grid reconciler: deployments, workloads,
//! workload results and the signature requirement that binds a deployment
//! to its contract on the ledger.
//!
//! ## Key Concepts
//!
//! - **Deployment**: the signed, versioned bundle of workloads sent to one node
//! - **Workload**: one named unit of work inside a deployment
//! - **Contract**: the ledger record authorizing a deployment, referenced by id
//! - **Twin**: an identity reachable over the message bus
//!
//! Workload payloads are opaque JSON on the wire. The typed view lives in
//! [`WorkloadData`] and [`ResultData`], keyed by [`WorkloadType`].

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod deployment;
pub mod error;
pub mod identity;
pub mod ids;
pub mod signature;
pub mod workload;

// Re-exports
pub use deployment::Deployment;
pub use error::{Result, TypesError};
pub use identity::Identity;
pub use ids::{ContractId, NodeDeploymentIds, NodeId, TwinId};
pub use signature::{Signature, SignatureRequest, SignatureRequirement};
pub use workload::{
    Backend, GatewayFqdnProxy, GatewayNameProxy, GatewayProxyResult, PublicIp, PublicIpResult,
    ResultData, ResultState, Workload, WorkloadData, WorkloadResult, WorkloadType, ZMount,
};
