//! Waiting for a node to apply a deployment
//!
//! Polls the node (not the bus gateway) until every workload stamped with
//! the current version reports `ok`, one of them fails, or the timeout hits.

use crate::config::DeployerConfig;
use crate::error::{DeployerError, Result};
use grid_node::NodeClient;
use grid_rmb::{poll_until, PollError, PollStep};
use grid_types::{ContractId, Deployment, ResultState};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Where a deployment stands relative to the version we pushed
#[derive(Debug, PartialEq)]
enum Progress {
    Pending { ok: usize, total: usize },
    Done,
    Failed { name: String, error: String },
}

fn progress(deployment: &Deployment, version: u32) -> Progress {
    if deployment.version < version {
        return Progress::Pending { ok: 0, total: 0 };
    }

    let mut ok = 0;
    let mut total = 0;
    for wl in deployment.workloads.iter().filter(|w| w.version == version) {
        total += 1;
        match wl.result.state {
            ResultState::Ok => ok += 1,
            state if state.is_failed() => {
                return Progress::Failed {
                    name: wl.name.clone(),
                    error: wl.result.error.clone(),
                }
            }
            _ => {}
        }
    }

    if ok == total {
        Progress::Done
    } else {
        Progress::Pending { ok, total }
    }
}

/// Wait until the node reports deployment `contract_id` at `version` as applied
#[instrument(skip(cancel, client, config), fields(twin = client.twin()))]
pub async fn wait_deployment(
    cancel: &CancellationToken,
    client: &NodeClient,
    contract_id: ContractId,
    version: u32,
    config: &DeployerConfig,
) -> Result<()> {
    let policy = config.wait_policy();
    let check = move || async move {
        match client.deployment_get(cancel, contract_id).await {
            Err(e) => PollStep::Failed(e),
            Ok(dl) => match progress(&dl, version) {
                Progress::Done => PollStep::Ready(Ok(())),
                Progress::Failed { name, error } => {
                    PollStep::Ready(Err(DeployerError::Workload { name, error }))
                }
                Progress::Pending { ok, total } => {
                    debug!(ok, total, "Workloads not ready yet");
                    PollStep::Pending
                }
            },
        }
    };

    let outcome = tokio::time::timeout(config.wait_timeout(), poll_until(&policy, cancel, check))
        .await
        .map_err(|_| DeployerError::Timeout {
            contract_id,
            secs: config.wait_timeout_secs,
        })?;

    match outcome {
        Ok(result) => {
            if result.is_ok() {
                info!(contract_id, version, "Deployment applied");
            }
            result
        }
        Err(PollError::Cancelled) => Err(DeployerError::Cancelled),
        Err(PollError::Exhausted { last, .. }) => Err(DeployerError::Node(last)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_node::commands;
    use grid_rmb::MockRmbClient;
    use grid_types::{Workload, WorkloadData, ZMount};
    use std::sync::Arc;
    use std::time::Duration;

    fn deployment(version: u32, states: &[(u32, ResultState)]) -> Deployment {
        let workloads = states
            .iter()
            .enumerate()
            .map(|(i, (v, state))| {
                let mut wl =
                    Workload::new(format!("disk{}", i), WorkloadData::ZMount(ZMount { size: 1 }))
                        .unwrap();
                wl.version = *v;
                wl.result.state = *state;
                wl
            })
            .collect();
        let mut dl = Deployment::new(11, workloads);
        dl.version = version;
        dl.contract_id = 100;
        dl
    }

    #[test]
    fn test_progress() {
        let dl = deployment(1, &[(0, ResultState::Init), (1, ResultState::Ok)]);
        assert_eq!(progress(&dl, 1), Progress::Done);

        let dl = deployment(1, &[(1, ResultState::Init), (1, ResultState::Ok)]);
        assert_eq!(progress(&dl, 1), Progress::Pending { ok: 1, total: 2 });

        let mut dl = deployment(1, &[(1, ResultState::Error)]);
        dl.workloads[0].result.error = "no space left".into();
        assert_eq!(
            progress(&dl, 1),
            Progress::Failed {
                name: "disk0".into(),
                error: "no space left".into()
            }
        );

        // Node still holds the previous version
        let dl = deployment(0, &[(0, ResultState::Ok)]);
        assert_eq!(progress(&dl, 1), Progress::Pending { ok: 0, total: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_until_ok() {
        let rmb = Arc::new(MockRmbClient::new());
        rmb.reply(10, commands::DEPLOYMENT_GET, deployment(0, &[(0, ResultState::Unknown)]));
        rmb.reply(10, commands::DEPLOYMENT_GET, deployment(0, &[(0, ResultState::Init)]));
        rmb.reply(10, commands::DEPLOYMENT_GET, deployment(0, &[(0, ResultState::Ok)]));
        let client = NodeClient::new(10, rmb.clone());

        wait_deployment(&CancellationToken::new(), &client, 100, 0, &DeployerConfig::default())
            .await
            .unwrap();
        assert_eq!(rmb.call_count(10, commands::DEPLOYMENT_GET), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_workload_error_fails_fast() {
        let rmb = Arc::new(MockRmbClient::new());
        let mut dl = deployment(0, &[(0, ResultState::Error)]);
        dl.workloads[0].result.error = "invalid backend".into();
        rmb.reply(10, commands::DEPLOYMENT_GET, dl);
        let client = NodeClient::new(10, rmb);

        let err = wait_deployment(&CancellationToken::new(), &client, 100, 0, &DeployerConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "workload disk0 failed: invalid backend");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let rmb = Arc::new(MockRmbClient::new());
        rmb.reply(10, commands::DEPLOYMENT_GET, deployment(0, &[(0, ResultState::Init)]));
        let client = NodeClient::new(10, rmb);
        let start = tokio::time::Instant::now();

        let err = wait_deployment(&CancellationToken::new(), &client, 100, 0, &DeployerConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployerError::Timeout { contract_id: 100, secs: 120 }));
        assert!(start.elapsed() >= Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_node_exhausts() {
        let rmb = Arc::new(MockRmbClient::new());
        rmb.unreachable(10, commands::DEPLOYMENT_GET);
        let client = NodeClient::new(10, rmb.clone());

        let err = wait_deployment(&CancellationToken::new(), &client, 100, 0, &DeployerConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployerError::Node(_)));
        assert_eq!(rmb.call_count(10, commands::DEPLOYMENT_GET), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled() {
        let rmb = Arc::new(MockRmbClient::new());
        rmb.reply(10, commands::DEPLOYMENT_GET, deployment(0, &[(0, ResultState::Init)]));
        let client = NodeClient::new(10, rmb);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let err = wait_deployment(&cancel, &client, 100, 0, &DeployerConfig::default())
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
