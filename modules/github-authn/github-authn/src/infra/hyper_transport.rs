//! `hyper`-based [`GithubTransport`] with rustls and per-phase timeouts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, HeaderValue, USER_AGENT};
use http::{Request, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::config::{ResolvedConfig, Timeouts};
use crate::domain::transport::{GithubTransport, TransportError, TransportResponse};

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Errors raised while constructing the transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportBuildError {
    #[error("failed to configure TLS: {0}")]
    Tls(#[from] rustls::Error),

    #[error("user agent '{0}' is not a valid header value")]
    InvalidUserAgent(String),
}

/// Production transport: HTTP/1.1 over rustls with native root certificates.
pub struct HyperTransport {
    client: Client<HttpsConnector<HttpConnector>, Empty<Bytes>>,
    timeouts: Timeouts,
    user_agent: HeaderValue,
}

impl HyperTransport {
    /// # Errors
    ///
    /// Returns [`TransportBuildError`] if the TLS configuration cannot be
    /// built or `user_agent` is not a valid header value.
    pub fn new(timeouts: Timeouts, user_agent: &str) -> Result<Self, TransportBuildError> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|_| TransportBuildError::InvalidUserAgent(user_agent.to_owned()))?;

        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(timeouts.connect);

        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls_config()?)
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build(https),
            timeouts,
            user_agent,
        })
    }

    /// # Errors
    ///
    /// See [`HyperTransport::new`].
    pub fn from_config(cfg: &ResolvedConfig) -> Result<Self, TransportBuildError> {
        Self::new(cfg.timeouts, &cfg.user_agent)
    }

    fn build_request(
        &self,
        uri: &Uri,
        token: &SecretString,
    ) -> Result<Request<Empty<Bytes>>, TransportError> {
        let invalid = |reason: String| TransportError::InvalidRequest {
            uri: uri.clone(),
            reason,
        };

        let raw = Zeroizing::new(format!("token {}", token.expose_secret()));
        let mut authorization = HeaderValue::from_str(&raw)
            .map_err(|_| invalid("token is not a valid header value".to_owned()))?;
        authorization.set_sensitive(true);

        Request::get(uri.clone())
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, GITHUB_JSON)
            .header(USER_AGENT, self.user_agent.clone())
            .body(Empty::new())
            .map_err(|e| invalid(e.to_string()))
    }
}

fn tls_config() -> Result<rustls::ClientConfig, TransportBuildError> {
    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        warn!(error = %err, "Failed to load a native root certificate");
    }

    let mut roots = rustls::RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    debug!(added, ignored, "Loaded native root certificates");
    if added == 0 {
        warn!("No native root certificates available, https endpoints will fail");
    }

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    Ok(rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth())
}

async fn within<F: Future>(
    limit: Option<Duration>,
    uri: &Uri,
    phase: &'static str,
    fut: F,
) -> Result<F::Output, TransportError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| TransportError::Timeout {
                uri: uri.clone(),
                phase,
                timeout: limit,
            }),
        None => Ok(fut.await),
    }
}

#[async_trait]
impl GithubTransport for HyperTransport {
    async fn get(
        &self,
        uri: &Uri,
        token: &SecretString,
    ) -> Result<TransportResponse, TransportError> {
        let request = self.build_request(uri, token)?;

        let response = within(
            self.timeouts.request,
            uri,
            "request",
            self.client.request(request),
        )
        .await?
        .map_err(|e| TransportError::Connect {
            uri: uri.clone(),
            source: Box::new(e),
        })?;

        let status = response.status();
        let body = within(
            self.timeouts.socket,
            uri,
            "body read",
            response.into_body().collect(),
        )
        .await?
        .map_err(|e| TransportError::Body {
            uri: uri.clone(),
            source: Box::new(e),
        })?
        .to_bytes();

        debug!(%uri, %status, bytes = body.len(), "GitHub API call completed");
        Ok(TransportResponse { status, body })
    }
}
