//! HTTP gateway client for the bus

use crate::client::RmbClient;
use crate::config::RmbConfig;
use crate::error::{RmbError, RmbResult};
use crate::message::{Message, ProxyResponse};
use crate::poll::{poll_until, PollError, PollPolicy, PollStep};
use async_trait::async_trait;
use grid_types::TwinId;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Bus client talking to an RMB HTTP gateway
pub struct ProxyBus {
    client: Client,
    endpoint: String,
    twin_id: TwinId,
    policy: PollPolicy,
    expiration: u64,
}

impl ProxyBus {
    pub fn new(config: &RmbConfig) -> RmbResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(RmbError::Client)?;

        Ok(Self {
            client,
            endpoint: config
                .endpoint
                .strip_suffix('/')
                .unwrap_or(&config.endpoint)
                .to_string(),
            twin_id: config.twin_id,
            policy: config.poll_policy(),
            expiration: config.expiration_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn twin_id(&self) -> TwinId {
        self.twin_id
    }

    fn request_endpoint(&self, twin: TwinId) -> String {
        format!("{}/twin/{}", self.endpoint, twin)
    }

    fn result_endpoint(&self, twin: TwinId, retqueue: &str) -> String {
        format!("{}/twin/{}/{}", self.endpoint, twin, retqueue)
    }

    async fn submit(&self, twin: TwinId, msg: &Message) -> RmbResult<String> {
        let response = self
            .client
            .post(self.request_endpoint(twin))
            .json(msg)
            .send()
            .await
            .map_err(RmbError::Submit)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(error = %e, "Error reading response body");
                    String::new()
                }
            };
            return Err(RmbError::SubmitRejected {
                status: status.as_u16(),
                body,
            });
        }

        let res: ProxyResponse = response.json().await.map_err(RmbError::SubmitDecode)?;
        Ok(res.retqueue)
    }

    async fn poll_once(&self, twin: TwinId, retqueue: &str) -> PollStep<Message, RmbError> {
        let response = match self.client.get(self.result_endpoint(twin, retqueue)).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Failed to send result-fetching request");
                return PollStep::Failed(RmbError::PollRequest(e));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return PollStep::Pending;
        }
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Non ok status code");
            return PollStep::Failed(RmbError::PollStatus {
                status: status.as_u16(),
                body,
            });
        }

        match response.json::<Vec<Message>>().await {
            Ok(msgs) => match msgs.into_iter().next() {
                Some(msg) => PollStep::Ready(msg),
                None => PollStep::Pending,
            },
            Err(e) => PollStep::Failed(RmbError::PollDecode(e)),
        }
    }
}

#[async_trait]
impl RmbClient for ProxyBus {
    #[instrument(skip(self, cancel, payload), fields(src = self.twin_id))]
    async fn call(
        &self,
        cancel: &CancellationToken,
        twin: TwinId,
        command: &str,
        payload: &Value,
    ) -> RmbResult<String> {
        // 1. Wrap the payload
        let bytes = serde_json::to_vec(payload).map_err(RmbError::Serialize)?;
        let msg = Message::request(self.twin_id, twin, command, &bytes, self.expiration);

        // 2. Submit once
        let retqueue = self.submit(twin, &msg).await?;
        debug!(retqueue = %retqueue, "Request accepted by gateway");

        // 3. Poll the return queue
        let retqueue = retqueue.as_str();
        let reply = poll_until(&self.policy, cancel, move || self.poll_once(twin, retqueue))
            .await
            .map_err(|e| match e {
                PollError::Cancelled => RmbError::Cancelled,
                PollError::Exhausted { attempts, last } => RmbError::Poll {
                    attempts,
                    source: Box::new(last),
                },
            })?;

        // 4. Application error or raw JSON body
        if let Some(err) = reply.remote_error() {
            return Err(RmbError::Remote(err.to_string()));
        }
        Ok(reply.data)
    }
}
