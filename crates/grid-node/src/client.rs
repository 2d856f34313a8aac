//! Typed node RPC client

use crate::error::Result;
use grid_rmb::{RmbClient, RmbClientExt};
use grid_types::{ContractId, Deployment, TwinId};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Function names understood by nodes
pub mod commands {
    pub const DEPLOYMENT_DEPLOY: &str = "zos.deployment.deploy";
    pub const DEPLOYMENT_UPDATE: &str = "zos.deployment.update";
    pub const DEPLOYMENT_GET: &str = "zos.deployment.get";
    pub const DEPLOYMENT_DELETE: &str = "zos.deployment.delete";
    pub const NETWORK_INTERFACES: &str = "zos.network.interfaces";
}

#[derive(Serialize)]
struct ContractArgs {
    contract_id: ContractId,
}

/// Client bound to one node's twin
#[derive(Clone)]
pub struct NodeClient {
    twin: TwinId,
    rmb: Arc<dyn RmbClient>,
}

impl NodeClient {
    pub fn new(twin: TwinId, rmb: Arc<dyn RmbClient>) -> Self {
        Self { twin, rmb }
    }

    pub fn twin(&self) -> TwinId {
        self.twin
    }

    /// Push a new deployment. The contract must already exist.
    #[instrument(skip(self, cancel, deployment), fields(twin = self.twin, contract_id = deployment.contract_id))]
    pub async fn deployment_deploy(
        &self,
        cancel: &CancellationToken,
        deployment: &Deployment,
    ) -> Result<()> {
        self.rmb
            .call_unit(cancel, self.twin, commands::DEPLOYMENT_DEPLOY, deployment)
            .await?;
        Ok(())
    }

    /// Push a new version of an existing deployment
    #[instrument(skip(self, cancel, deployment), fields(twin = self.twin, contract_id = deployment.contract_id))]
    pub async fn deployment_update(
        &self,
        cancel: &CancellationToken,
        deployment: &Deployment,
    ) -> Result<()> {
        self.rmb
            .call_unit(cancel, self.twin, commands::DEPLOYMENT_UPDATE, deployment)
            .await?;
        Ok(())
    }

    /// Fetch the deployment as the node sees it, results included
    pub async fn deployment_get(
        &self,
        cancel: &CancellationToken,
        contract_id: ContractId,
    ) -> Result<Deployment> {
        let deployment = self
            .rmb
            .call_for(
                cancel,
                self.twin,
                commands::DEPLOYMENT_GET,
                &ContractArgs { contract_id },
            )
            .await?;
        Ok(deployment)
    }

    #[instrument(skip(self, cancel), fields(twin = self.twin))]
    pub async fn deployment_delete(
        &self,
        cancel: &CancellationToken,
        contract_id: ContractId,
    ) -> Result<()> {
        self.rmb
            .call_unit(
                cancel,
                self.twin,
                commands::DEPLOYMENT_DELETE,
                &ContractArgs { contract_id },
            )
            .await?;
        Ok(())
    }

    /// Liveness probe, the answer itself is ignored
    pub async fn ping(&self, cancel: &CancellationToken) -> Result<()> {
        self.rmb
            .call_unit(cancel, self.twin, commands::NETWORK_INTERFACES, &())
            .await?;
        Ok(())
    }

    /// Network interfaces as reported by the node
    pub async fn network_interfaces(&self, cancel: &CancellationToken) -> Result<Value> {
        let interfaces = self
            .rmb
            .call_for(cancel, self.twin, commands::NETWORK_INTERFACES, &())
            .await?;
        Ok(interfaces)
    }
}

impl fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeClient").field("twin", &self.twin).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_rmb::MockRmbClient;
    use grid_types::{GatewayNameProxy, ResultState, Workload, WorkloadData};
    use serde_json::json;

    fn deployment() -> Deployment {
        let wl = Workload::new(
            "gw",
            WorkloadData::GatewayNameProxy(GatewayNameProxy {
                name: "gw".into(),
                ..Default::default()
            }),
        )
        .unwrap();
        let mut dl = Deployment::new(11, vec![wl]);
        dl.contract_id = 100;
        dl
    }

    #[tokio::test]
    async fn test_deploy_then_get_carries_results() {
        let rmb = Arc::new(MockRmbClient::new());
        let client = NodeClient::new(10, rmb.clone());
        let cancel = CancellationToken::new();
        let dl = deployment();

        rmb.reply_raw(10, commands::DEPLOYMENT_DEPLOY, "");
        client.deployment_deploy(&cancel, &dl).await.unwrap();

        let pushed: Deployment =
            serde_json::from_value(rmb.calls(10, commands::DEPLOYMENT_DEPLOY)[0].clone()).unwrap();
        assert_eq!(pushed, dl);

        // The node fills in results
        let mut remote = dl.clone();
        remote.workloads[0].result.state = ResultState::Ok;
        remote.workloads[0].result.data = json!({"fqdn": "gw.gent01.grid.tf"});
        rmb.reply(10, commands::DEPLOYMENT_GET, &remote);

        let fetched = client.deployment_get(&cancel, 100).await.unwrap();
        assert_eq!(fetched, remote);
        assert_eq!(
            rmb.calls(10, commands::DEPLOYMENT_GET),
            vec![json!({"contract_id": 100})]
        );
    }

    #[tokio::test]
    async fn test_ping_sends_null_payload() {
        let rmb = Arc::new(MockRmbClient::new());
        rmb.reply(10, commands::NETWORK_INTERFACES, json!({"zos": []}));
        let client = NodeClient::new(10, rmb.clone());

        client.ping(&CancellationToken::new()).await.unwrap();
        assert_eq!(
            rmb.calls(10, commands::NETWORK_INTERFACES),
            vec![Value::Null]
        );
    }

    #[tokio::test]
    async fn test_remote_error_surfaces() {
        let rmb = Arc::new(MockRmbClient::new());
        rmb.remote_error(10, commands::DEPLOYMENT_DELETE, "deployment not found");
        let client = NodeClient::new(10, rmb);

        let err = client
            .deployment_delete(&CancellationToken::new(), 100)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "deployment not found");
    }
}
