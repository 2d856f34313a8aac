//! CLI command implementations

pub mod call;
pub mod deployment;
pub mod node;

use crate::error::{CliError, CliResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Run `fut` until it finishes or Ctrl-C cancels `cancel`
pub async fn until_interrupted<T, F>(cancel: &CancellationToken, fut: F) -> CliResult<T>
where
    F: Future<Output = CliResult<T>>,
{
    let trigger = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });

    let result = fut.await;
    watcher.abort();

    match result {
        Err(e) if cancel.is_cancelled() => {
            tracing::debug!(error = %e, "Command interrupted");
            Err(CliError::Interrupted)
        }
        other => other,
    }
}
