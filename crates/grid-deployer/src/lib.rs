//! Grid Deployment Reconciler
//!
//! Converges a desired set of deployments with what the ledger and the
//! nodes actually hold.
//!
//! ## Architectural Boundaries
//!
//! - `grid-ledger` owns: contract records, the source of truth for what should exist
//! - `grid-node` owns: typed calls to the nodes, the source of truth for what runs
//! - `grid-deployer` owns: the per-node diff, contract lifecycle ordering,
//!   waiting for workloads and folding results back into local state
//!
//! ## Key Principle
//!
//! A contract id is recorded the moment the ledger hands it out, before the
//! deployment is pushed to the node. An interrupted create is therefore
//! recoverable on the next pass instead of orphaned. The node -> contract
//! map is committed on every exit path, errors included.
//!
//! ## Usage
//!
//! ```no_run
//! use grid_deployer::{
//!     DeployerConfig, DeploymentDeployer, GatewayName, ResourceContext, ResourceDeployer,
//! };
//! use grid_ledger::InMemoryLedger;
//! use grid_node::NodeClientPool;
//! use grid_rmb::{ProxyBus, RmbConfig};
//! use grid_types::Identity;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity::from_seed([7u8; 32]);
//! let bus = Arc::new(ProxyBus::new(&RmbConfig::new("https://gridproxy.grid.tf", 11))?);
//! let pool = Arc::new(NodeClientPool::new(bus));
//! let engine = Arc::new(DeploymentDeployer::new(
//!     identity.clone(),
//!     11,
//!     pool.clone(),
//!     DeployerConfig::default(),
//! ));
//! let ctx = ResourceContext::new(11, identity, engine, pool);
//! let ledger = InMemoryLedger::new();
//!
//! let gateway = GatewayName::new("example", vec!["http://1.1.1.1".into()]);
//! let mut resource = ResourceDeployer::new(ctx, 10, gateway);
//! resource.deploy(&CancellationToken::new(), &ledger).await?;
//! println!("{}", resource.resource.fqdn);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod config;
pub mod deployer;
pub mod error;
pub mod mock;
pub mod remote;
pub mod resource;
pub mod resources;
pub mod wait;

// Re-exports
pub use config::DeployerConfig;
pub use deployer::{Deployer, DeploymentDeployer, DeploymentOutcome};
pub use error::{DeployerError, Result};
pub use mock::MockDeployer;
pub use remote::get_deployment_objects;
pub use resource::{ResourceContext, ResourceDeployer, ResourceState, WorkloadResource};
pub use resources::{GatewayFqdn, GatewayName};
pub use wait::wait_deployment;
