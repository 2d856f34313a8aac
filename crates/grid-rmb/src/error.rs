//! RMB error types
//!
//! Transport failures are retried inside one call up to the error threshold.
//! Application errors (`Remote`) and local encode/decode failures are never
//! retried. Cancellation has its own variant.

use thiserror::Error;

/// Errors returned by a bus call
#[derive(Debug, Error)]
pub enum RmbError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to serialize request data: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("error sending request: {0}")]
    Submit(#[source] reqwest::Error),

    #[error("non ok return code: {status}, body: {body}")]
    SubmitRejected { status: u16, body: String },

    #[error("failed to decode proxy response body: {0}")]
    SubmitDecode(#[source] reqwest::Error),

    #[error("failed to send result-fetching request: {0}")]
    PollRequest(#[source] reqwest::Error),

    #[error("non ok return code: {status}, body: {body}")]
    PollStatus { status: u16, body: String },

    #[error("failed to decode result batch: {0}")]
    PollDecode(#[source] reqwest::Error),

    #[error("couldn't poll response after {attempts} failed attempts: {source}")]
    Poll {
        attempts: u32,
        #[source]
        source: Box<RmbError>,
    },

    #[error("context cancelled")]
    Cancelled,

    #[error("{0}")]
    Remote(String),

    #[error("no response body was returned")]
    EmptyBody,

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl RmbError {
    /// The caller gave up on purpose
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RmbError::Cancelled)
    }

    /// The destination could not be reached or the gateway misbehaved
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            RmbError::Submit(_)
                | RmbError::SubmitRejected { .. }
                | RmbError::PollRequest(_)
                | RmbError::PollStatus { .. }
                | RmbError::PollDecode(_)
                | RmbError::Poll { .. }
        )
    }

    /// The remote side answered with an explicit error
    pub fn is_remote(&self) -> bool {
        matches!(self, RmbError::Remote(_))
    }
}

/// Result type for bus calls
pub type RmbResult<T> = std::result::Result<T, RmbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(RmbError::Cancelled.is_cancelled());
        assert!(!RmbError::Cancelled.is_transport());

        let poll = RmbError::Poll {
            attempts: 4,
            source: Box::new(RmbError::PollStatus {
                status: 500,
                body: "down".into(),
            }),
        };
        assert!(poll.is_transport());
        assert!(poll.to_string().contains("non ok return code: 500"));

        let remote = RmbError::Remote("deployment not found".into());
        assert!(remote.is_remote());
        assert!(!remote.is_transport());
        assert_eq!(remote.to_string(), "deployment not found");
    }
}
