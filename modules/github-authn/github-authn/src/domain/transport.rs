//! Outbound port used by the resolver to talk to the provider.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{StatusCode, Uri};
use secrecy::SecretString;

/// Status and body of a completed GET.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Failure to obtain any response at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build request for {uri}: {reason}")]
    InvalidRequest { uri: Uri, reason: String },

    #[error("request to {uri} failed: {source}")]
    Connect {
        uri: Uri,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{phase} timed out after {} for {uri}", humantime::format_duration(*.timeout))]
    Timeout {
        uri: Uri,
        phase: &'static str,
        timeout: Duration,
    },

    #[error("failed to read response body from {uri}: {source}")]
    Body {
        uri: Uri,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Performs a single authenticated GET.
///
/// Implementations send `Authorization: token <token>` and apply the
/// configured timeouts. Any HTTP status is a successful transport outcome;
/// interpreting it is up to the caller.
#[async_trait]
pub trait GithubTransport: Send + Sync {
    async fn get(&self, uri: &Uri, token: &SecretString)
    -> Result<TransportResponse, TransportError>;
}
