//! Local (in-process) client for the GitHub `AuthN` module.
//!
//! This is the adapter the host authentication framework holds.

use std::sync::Arc;

use async_trait::async_trait;
use github_authn_sdk::{AuthResolutionError, Credentials, GithubAuthNClient, Identity};

use super::{DomainError, Service};

/// Local client wrapping the service.
pub struct GithubAuthNLocalClient {
    svc: Arc<Service>,
}

impl GithubAuthNLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(login: &str, e: DomainError) -> AuthResolutionError {
    let kind = e.kind();
    if kind.is_transport() {
        tracing::warn!(login, kind = %kind, error = %e, "GitHub authentication failed");
    } else {
        tracing::info!(login, kind = %kind, error = %e, "GitHub authentication denied");
    }
    e.into()
}

#[async_trait]
impl GithubAuthNClient for GithubAuthNLocalClient {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<Identity, AuthResolutionError> {
        self.svc
            .resolve(credentials)
            .await
            .map(|identity| Identity::clone(&identity))
            .map_err(|e| log_and_convert(credentials.login(), e))
    }
}
