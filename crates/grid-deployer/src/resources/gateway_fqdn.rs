//! Gateway proxy for a user-owned domain

use crate::resource::WorkloadResource;
use grid_types::{Backend, Workload, WorkloadData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayFqdn {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub fqdn: String,
    #[serde(default)]
    pub tls_passthrough: bool,
    #[serde(default)]
    pub backends: Vec<Backend>,
}

impl GatewayFqdn {
    pub fn new(name: impl Into<String>, fqdn: impl Into<String>, backends: Vec<Backend>) -> Self {
        Self {
            name: name.into(),
            fqdn: fqdn.into(),
            backends,
            ..Default::default()
        }
    }
}

impl WorkloadResource for GatewayFqdn {
    fn name(&self) -> &str {
        &self.name
    }

    fn workload(&self) -> grid_types::Result<Workload> {
        let data = WorkloadData::GatewayFqdnProxy(grid_types::GatewayFqdnProxy {
            fqdn: self.fqdn.clone(),
            tls_passthrough: self.tls_passthrough,
            backends: self.backends.clone(),
        });
        Ok(Workload::new(self.name.clone(), data)?.with_description(self.description.clone()))
    }

    fn apply_remote(&mut self, workload: &Workload) -> grid_types::Result<()> {
        if let WorkloadData::GatewayFqdnProxy(data) = workload.typed_data()? {
            self.fqdn = data.fqdn;
            self.tls_passthrough = data.tls_passthrough;
            self.backends = data.backends;
        }
        self.name = workload.name.clone();
        self.description = workload.description.clone();
        Ok(())
    }
}
