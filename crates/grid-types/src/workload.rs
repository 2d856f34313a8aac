//! Workloads and their results
//!
//! `data` and `result.data` travel as opaque JSON. [`WorkloadData`] and
//! [`ResultData`] are the typed registry: the [`WorkloadType`] tag picks the
//! decoder, so nothing is decoded by guessing at the shape.

use crate::error::{Result, TypesError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Workload type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkloadType {
    #[serde(rename = "zmachine")]
    ZMachine,
    #[serde(rename = "zmount")]
    ZMount,
    #[serde(rename = "network")]
    Network,
    #[serde(rename = "ip")]
    PublicIp,
    #[serde(rename = "gateway-name-proxy")]
    GatewayNameProxy,
    #[serde(rename = "gateway-fqdn-proxy")]
    GatewayFqdnProxy,
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl WorkloadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadType::ZMachine => "zmachine",
            WorkloadType::ZMount => "zmount",
            WorkloadType::Network => "network",
            WorkloadType::PublicIp => "ip",
            WorkloadType::GatewayNameProxy => "gateway-name-proxy",
            WorkloadType::GatewayFqdnProxy => "gateway-fqdn-proxy",
            WorkloadType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WorkloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution state reported by the node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultState {
    Init,
    Ok,
    Error,
    Deleted,
    Paused,
    /// Not yet processed, or a state this client does not know
    #[default]
    #[serde(other, rename = "")]
    Unknown,
}

impl ResultState {
    /// Terminal failure states
    pub fn is_failed(&self) -> bool {
        matches!(self, ResultState::Error | ResultState::Deleted)
    }
}

/// Node-written result of a workload. Read, never written, by the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadResult {
    /// Unix timestamp of the last state change
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub state: ResultState,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub data: Value,
}

/// One named unit of work inside a deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    #[serde(default)]
    pub version: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub workload_type: WorkloadType,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub result: WorkloadResult,
}

impl Workload {
    /// Build a version-0 workload from typed data
    pub fn new(name: impl Into<String>, data: WorkloadData) -> Result<Self> {
        Ok(Self {
            version: 0,
            name: name.into(),
            workload_type: data.workload_type(),
            data: data.to_value()?,
            metadata: String::new(),
            description: String::new(),
            result: WorkloadResult::default(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Decode `data` through the type registry
    pub fn typed_data(&self) -> Result<WorkloadData> {
        WorkloadData::from_value(self.workload_type, &self.data)
    }

    /// Decode `result.data` through the type registry
    pub fn typed_result(&self) -> Result<ResultData> {
        ResultData::from_value(self.workload_type, &self.result.data)
    }

    /// Same desired content, ignoring version and node-written result
    pub fn same_spec(&self, other: &Workload) -> bool {
        self.name == other.name
            && self.workload_type == other.workload_type
            && self.data == other.data
            && self.metadata == other.metadata
            && self.description == other.description
    }
}

/// Gateway backend URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Backend(pub String);

impl From<&str> for Backend {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Backend {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Gateway proxy whose domain is `<name>.<gateway domain>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayNameProxy {
    pub name: String,
    #[serde(default)]
    pub tls_passthrough: bool,
    #[serde(default)]
    pub backends: Vec<Backend>,
}

/// Gateway proxy for a user-owned fully qualified domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayFqdnProxy {
    pub fqdn: String,
    #[serde(default)]
    pub tls_passthrough: bool,
    #[serde(default)]
    pub backends: Vec<Backend>,
}

/// Public IP reservation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIp {
    #[serde(default)]
    pub v4: bool,
    #[serde(default)]
    pub v6: bool,
}

/// Disk mount, size in bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZMount {
    pub size: u64,
}

/// Typed workload payloads this client understands
#[derive(Debug, Clone, PartialEq)]
pub enum WorkloadData {
    GatewayNameProxy(GatewayNameProxy),
    GatewayFqdnProxy(GatewayFqdnProxy),
    PublicIp(PublicIp),
    ZMount(ZMount),
}

impl WorkloadData {
    pub fn workload_type(&self) -> WorkloadType {
        match self {
            WorkloadData::GatewayNameProxy(_) => WorkloadType::GatewayNameProxy,
            WorkloadData::GatewayFqdnProxy(_) => WorkloadType::GatewayFqdnProxy,
            WorkloadData::PublicIp(_) => WorkloadType::PublicIp,
            WorkloadData::ZMount(_) => WorkloadType::ZMount,
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        let value = match self {
            WorkloadData::GatewayNameProxy(d) => serde_json::to_value(d)?,
            WorkloadData::GatewayFqdnProxy(d) => serde_json::to_value(d)?,
            WorkloadData::PublicIp(d) => serde_json::to_value(d)?,
            WorkloadData::ZMount(d) => serde_json::to_value(d)?,
        };
        Ok(value)
    }

    pub fn from_value(workload_type: WorkloadType, value: &Value) -> Result<Self> {
        let data = match workload_type {
            WorkloadType::GatewayNameProxy => WorkloadData::GatewayNameProxy(decode(value)?),
            WorkloadType::GatewayFqdnProxy => WorkloadData::GatewayFqdnProxy(decode(value)?),
            WorkloadType::PublicIp => WorkloadData::PublicIp(decode(value)?),
            WorkloadType::ZMount => WorkloadData::ZMount(decode(value)?),
            other => return Err(TypesError::UnsupportedWorkloadType(other.to_string())),
        };
        Ok(data)
    }
}

/// Result payload of both gateway kinds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayProxyResult {
    #[serde(default)]
    pub fqdn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIpResult {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub ip6: String,
    #[serde(default)]
    pub gateway: String,
}

/// Typed workload results
#[derive(Debug, Clone, PartialEq)]
pub enum ResultData {
    GatewayProxy(GatewayProxyResult),
    PublicIp(PublicIpResult),
    /// Nothing reported yet
    Empty,
}

impl ResultData {
    pub fn from_value(workload_type: WorkloadType, value: &Value) -> Result<Self> {
        if value.is_null() {
            return Ok(ResultData::Empty);
        }
        let data = match workload_type {
            WorkloadType::GatewayNameProxy | WorkloadType::GatewayFqdnProxy => {
                ResultData::GatewayProxy(decode(value)?)
            }
            WorkloadType::PublicIp => ResultData::PublicIp(decode(value)?),
            other => return Err(TypesError::UnsupportedWorkloadType(other.to_string())),
        };
        Ok(data)
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(T::deserialize(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workload_wire_format() {
        let wl = Workload::new(
            "gw",
            WorkloadData::GatewayNameProxy(GatewayNameProxy {
                name: "gw".into(),
                tls_passthrough: false,
                backends: vec!["http://1.1.1.1".into()],
            }),
        )
        .unwrap();

        let value = serde_json::to_value(&wl).unwrap();
        assert_eq!(value["type"], "gateway-name-proxy");
        assert_eq!(value["data"]["backends"][0], "http://1.1.1.1");
        assert_eq!(value["result"]["state"], "");
    }

    #[test]
    fn test_result_state_decoding() {
        let result: WorkloadResult = serde_json::from_value(json!({
            "created": 1650000000,
            "state": "ok",
            "error": "",
            "data": {"fqdn": "name.gent01.grid.tf"}
        }))
        .unwrap();
        assert_eq!(result.state, ResultState::Ok);

        let unknown: WorkloadResult =
            serde_json::from_value(json!({"state": "something-new"})).unwrap();
        assert_eq!(unknown.state, ResultState::Unknown);
        assert!(ResultState::Deleted.is_failed());
    }

    #[test]
    fn test_typed_result_dispatch() {
        let mut wl = Workload::new(
            "gw",
            WorkloadData::GatewayFqdnProxy(GatewayFqdnProxy {
                fqdn: "name.com".into(),
                ..Default::default()
            }),
        )
        .unwrap();
        assert_eq!(wl.typed_result().unwrap(), ResultData::Empty);

        wl.result.data = json!({"fqdn": "name.com"});
        assert_eq!(
            wl.typed_result().unwrap(),
            ResultData::GatewayProxy(GatewayProxyResult {
                fqdn: "name.com".into()
            })
        );
    }

    #[test]
    fn test_unsupported_type() {
        let err = WorkloadData::from_value(WorkloadType::ZMachine, &json!({})).unwrap_err();
        assert!(matches!(err, TypesError::UnsupportedWorkloadType(_)));
    }

    #[test]
    fn test_same_spec_ignores_result_and_version() {
        let a = Workload::new("disk", WorkloadData::ZMount(ZMount { size: 10 })).unwrap();
        let mut b = a.clone();
        b.version = 3;
        b.result.state = ResultState::Ok;
        assert!(a.same_spec(&b));

        b.data = json!({"size": 20});
        assert!(!a.same_spec(&b));
    }
}
