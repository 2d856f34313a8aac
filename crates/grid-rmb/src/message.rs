//! Bus message envelope
//!
//! Field names follow the bus wire format. Requests carry a base64 payload,
//! replies carry the raw JSON result in the same `dat` field.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use grid_types::TwinId;
use serde::{Deserialize, Serialize};

/// Envelope version understood by the gateway
pub const MESSAGE_VERSION: u32 = 1;

/// One unit on the bus
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "ver", default)]
    pub version: u32,
    #[serde(rename = "uid", default)]
    pub id: String,
    #[serde(rename = "cmd", default)]
    pub command: String,
    /// Expiration in seconds
    #[serde(rename = "exp", default)]
    pub expiration: u64,
    #[serde(rename = "try", default)]
    pub retry: u32,
    #[serde(rename = "dat", default)]
    pub data: String,
    #[serde(rename = "src", default)]
    pub source: TwinId,
    #[serde(rename = "dst", default)]
    pub destination: Vec<TwinId>,
    /// Return queue, filled in by the gateway
    #[serde(rename = "ret", default)]
    pub retqueue: String,
    #[serde(rename = "shm", default)]
    pub schema: String,
    #[serde(rename = "now", default)]
    pub epoch: i64,
    #[serde(rename = "err", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Message {
    /// Request envelope from `source` to a single destination twin
    pub fn request(
        source: TwinId,
        destination: TwinId,
        command: &str,
        payload: &[u8],
        expiration: u64,
    ) -> Self {
        Self {
            version: MESSAGE_VERSION,
            command: command.to_string(),
            expiration,
            data: STANDARD.encode(payload),
            source,
            destination: vec![destination],
            epoch: chrono::Utc::now().timestamp(),
            ..Default::default()
        }
    }

    /// Application error written by the receiver, if any
    pub fn remote_error(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Gateway answer to a submitted request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyResponse {
    #[serde(alias = "Retqueue")]
    pub retqueue: String,
}
