//! Grid RMB Client
//!
//! Request/response calls over the reliable message bus. The bus itself is
//! fire-and-forget: a request is submitted to a gateway which hands back a
//! return queue name, and the reply is collected by polling that queue.
//!
//! ## Call Lifecycle
//!
//! 1. The payload is serialized to JSON, base64-encoded and wrapped in a
//!    [`Message`] addressed to the destination twin.
//! 2. The envelope is posted to `{endpoint}/twin/{twin}`. A non-200 answer
//!    fails the call immediately.
//! 3. `{endpoint}/twin/{twin}/{retqueue}` is polled once per interval until a
//!    reply arrives, the error threshold is reached, or the caller cancels.
//! 4. A reply carrying `err` is an application error. Otherwise its `dat`
//!    field is the raw JSON result.
//!
//! ## Usage
//!
//! ```no_run
//! use grid_rmb::{ProxyBus, RmbClientExt, RmbConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bus = ProxyBus::new(&RmbConfig::new("https://gridproxy.grid.tf", 11))?;
//! let cancel = CancellationToken::new();
//!
//! let interfaces: serde_json::Value = bus
//!     .call_for(&cancel, 10, "zos.network.interfaces", &())
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod mock;
pub mod poll;
pub mod proxy;

// Re-exports
pub use client::{RmbClient, RmbClientExt};
pub use config::RmbConfig;
pub use error::{RmbError, RmbResult};
pub use message::{Message, ProxyResponse};
pub use mock::MockRmbClient;
pub use poll::{poll_until, PollError, PollPolicy, PollStep, MIN_POLL_INTERVAL};
pub use proxy::ProxyBus;
