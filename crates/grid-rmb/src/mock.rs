//! Scripted bus client for tests and local development
//!
//! Replies are queued per `(twin, command)`. The last queued reply keeps
//! answering once the queue is drained, so a single `reply` serves any
//! number of calls.

use crate::client::RmbClient;
use crate::error::{RmbError, RmbResult};
use async_trait::async_trait;
use dashmap::DashMap;
use grid_types::TwinId;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
enum Scripted {
    Body(String),
    Remote(String),
    Unreachable,
}

type Key = (TwinId, String);

/// In-memory [`RmbClient`] answering from a script
#[derive(Debug, Default)]
pub struct MockRmbClient {
    script: DashMap<Key, VecDeque<Scripted>>,
    calls: DashMap<Key, Vec<Value>>,
}

impl MockRmbClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply
    pub fn reply<T: Serialize>(&self, twin: TwinId, command: &str, body: T) {
        let body = serde_json::to_string(&body).unwrap_or_default();
        self.push(twin, command, Scripted::Body(body));
    }

    /// Queue a reply body verbatim, possibly empty
    pub fn reply_raw(&self, twin: TwinId, command: &str, body: &str) {
        self.push(twin, command, Scripted::Body(body.to_string()));
    }

    /// Queue an application error written by the remote side
    pub fn remote_error(&self, twin: TwinId, command: &str, error: &str) {
        self.push(twin, command, Scripted::Remote(error.to_string()));
    }

    /// Queue a transport failure, as if polling exhausted its budget
    pub fn unreachable(&self, twin: TwinId, command: &str) {
        self.push(twin, command, Scripted::Unreachable);
    }

    /// Payloads received for `(twin, command)`, in call order
    pub fn calls(&self, twin: TwinId, command: &str) -> Vec<Value> {
        self.calls
            .get(&(twin, command.to_string()))
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self, twin: TwinId, command: &str) -> usize {
        self.calls
            .get(&(twin, command.to_string()))
            .map(|c| c.len())
            .unwrap_or(0)
    }

    fn push(&self, twin: TwinId, command: &str, entry: Scripted) {
        self.script
            .entry((twin, command.to_string()))
            .or_default()
            .push_back(entry);
    }

    fn next(&self, key: &Key) -> Option<Scripted> {
        let mut queue = self.script.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl RmbClient for MockRmbClient {
    async fn call(
        &self,
        cancel: &CancellationToken,
        twin: TwinId,
        command: &str,
        payload: &Value,
    ) -> RmbResult<String> {
        if cancel.is_cancelled() {
            return Err(RmbError::Cancelled);
        }

        let key = (twin, command.to_string());
        self.calls
            .entry(key.clone())
            .or_default()
            .push(payload.clone());

        match self.next(&key) {
            Some(Scripted::Body(body)) => Ok(body),
            Some(Scripted::Remote(err)) => Err(RmbError::Remote(err)),
            Some(Scripted::Unreachable) => Err(RmbError::Poll {
                attempts: 4,
                source: Box::new(RmbError::PollStatus {
                    status: 502,
                    body: format!("twin {} unreachable", twin),
                }),
            }),
            None => Err(RmbError::Remote(format!(
                "no handler for {} on twin {}",
                command, twin
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queue_then_sticky_last() {
        let mock = MockRmbClient::new();
        mock.unreachable(10, "zos.network.interfaces");
        mock.reply(10, "zos.network.interfaces", json!({}));
        let cancel = CancellationToken::new();

        let first = mock.call(&cancel, 10, "zos.network.interfaces", &Value::Null).await;
        assert!(first.unwrap_err().is_transport());

        for _ in 0..3 {
            let body = mock
                .call(&cancel, 10, "zos.network.interfaces", &Value::Null)
                .await
                .unwrap();
            assert_eq!(body, "{}");
        }
        assert_eq!(mock.call_count(10, "zos.network.interfaces"), 4);
    }

    #[tokio::test]
    async fn test_unscripted_and_cancelled() {
        let mock = MockRmbClient::new();
        let cancel = CancellationToken::new();

        let err = mock.call(&cancel, 3, "zos.deployment.get", &Value::Null).await;
        assert!(err.unwrap_err().is_remote());

        cancel.cancel();
        let err = mock.call(&cancel, 3, "zos.deployment.get", &Value::Null).await;
        assert!(err.unwrap_err().is_cancelled());
    }
}
