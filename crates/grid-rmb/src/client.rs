//! Bus client trait

use crate::error::{RmbError, RmbResult};
use async_trait::async_trait;
use grid_types::TwinId;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// A synchronous-looking request/response call over the bus
#[async_trait]
pub trait RmbClient: Send + Sync {
    /// Send `payload` to `twin` as `command` and wait for the reply.
    ///
    /// Returns the reply's raw JSON body, which may be empty when the
    /// remote function has no result.
    async fn call(
        &self,
        cancel: &CancellationToken,
        twin: TwinId,
        command: &str,
        payload: &Value,
    ) -> RmbResult<String>;
}

/// Typed helpers on top of [`RmbClient::call`]
#[async_trait]
pub trait RmbClientExt: RmbClient {
    /// Call and decode the reply. An empty reply is an error.
    async fn call_for<P, R>(
        &self,
        cancel: &CancellationToken,
        twin: TwinId,
        command: &str,
        payload: &P,
    ) -> RmbResult<R>
    where
        P: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload).map_err(RmbError::Serialize)?;
        let body = self.call(cancel, twin, command, &payload).await?;
        if body.is_empty() {
            return Err(RmbError::EmptyBody);
        }
        serde_json::from_str(&body).map_err(RmbError::Decode)
    }

    /// Call and ignore whatever the reply carries
    async fn call_unit<P>(
        &self,
        cancel: &CancellationToken,
        twin: TwinId,
        command: &str,
        payload: &P,
    ) -> RmbResult<()>
    where
        P: Serialize + Sync + ?Sized,
    {
        let payload = serde_json::to_value(payload).map_err(RmbError::Serialize)?;
        self.call(cancel, twin, command, &payload).await?;
        Ok(())
    }
}

impl<T: RmbClient + ?Sized> RmbClientExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRmbClient;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Interfaces {
        zos: Vec<String>,
    }

    #[tokio::test]
    async fn test_call_for_decodes() {
        let mock = MockRmbClient::new();
        mock.reply(10, "zos.network.interfaces", json!({"zos": ["10.0.0.1"]}));
        let client: Arc<dyn RmbClient> = Arc::new(mock);

        let result: Interfaces = client
            .call_for(&CancellationToken::new(), 10, "zos.network.interfaces", &())
            .await
            .unwrap();
        assert_eq!(result.zos, vec!["10.0.0.1".to_string()]);
    }

    #[tokio::test]
    async fn test_call_for_empty_body() {
        let mock = MockRmbClient::new();
        mock.reply_raw(10, "zos.deployment.get", "");

        let result: RmbResult<Value> = mock
            .call_for(&CancellationToken::new(), 10, "zos.deployment.get", &())
            .await;
        let err = result.unwrap_err();
        assert!(matches!(err, RmbError::EmptyBody));
    }

    #[tokio::test]
    async fn test_call_unit_accepts_empty_body() {
        let mock = MockRmbClient::new();
        mock.reply_raw(10, "zos.deployment.delete", "");

        mock.call_unit(
            &CancellationToken::new(),
            10,
            "zos.deployment.delete",
            &json!({"contract_id": 100}),
        )
        .await
        .unwrap();
        assert_eq!(
            mock.calls(10, "zos.deployment.delete"),
            vec![json!({"contract_id": 100})]
        );
    }

    #[tokio::test]
    async fn test_call_for_decode_error() {
        let mock = MockRmbClient::new();
        mock.reply_raw(10, "zos.deployment.get", "not json");

        let result: RmbResult<Value> = mock
            .call_for(&CancellationToken::new(), 10, "zos.deployment.get", &())
            .await;
        let err = result.unwrap_err();
        assert!(matches!(err, RmbError::Decode(_)));
    }
}
