//! Name-based gateway proxy
//!
//! The node assigns the final domain, so `fqdn` is only known after the
//! workload has been applied.

use crate::resource::WorkloadResource;
use grid_types::{Backend, ResultData, Workload, WorkloadData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayName {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tls_passthrough: bool,
    #[serde(default)]
    pub backends: Vec<Backend>,
    /// Computed by the node
    #[serde(default)]
    pub fqdn: String,
}

impl GatewayName {
    pub fn new(name: impl Into<String>, backends: Vec<Backend>) -> Self {
        Self {
            name: name.into(),
            backends,
            ..Default::default()
        }
    }
}

impl WorkloadResource for GatewayName {
    fn name(&self) -> &str {
        &self.name
    }

    fn workload(&self) -> grid_types::Result<Workload> {
        let data = WorkloadData::GatewayNameProxy(grid_types::GatewayNameProxy {
            name: self.name.clone(),
            tls_passthrough: self.tls_passthrough,
            backends: self.backends.clone(),
        });
        Ok(Workload::new(self.name.clone(), data)?.with_description(self.description.clone()))
    }

    fn apply_remote(&mut self, workload: &Workload) -> grid_types::Result<()> {
        if let WorkloadData::GatewayNameProxy(data) = workload.typed_data()? {
            self.name = data.name;
            self.tls_passthrough = data.tls_passthrough;
            self.backends = data.backends;
        }
        self.description = workload.description.clone();
        self.fqdn = match workload.typed_result()? {
            ResultData::GatewayProxy(result) => result.fqdn,
            _ => String::new(),
        };
        Ok(())
    }

    fn has_computed(&self) -> bool {
        true
    }

    fn clear_computed(&mut self) {
        self.fqdn.clear();
    }
}
