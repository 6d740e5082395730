//! GitHub `AuthN` Module
//!
//! Resolves a GitHub login plus token into an [`Identity`] whose roles are
//! `"<org>/<team>"` strings derived from the user's team memberships.
//!
//! ## Wiring
//!
//! ```ignore
//! let cfg = GithubAuthNConfig::load(Some(path))?.resolve()?;
//! let transport = Arc::new(HyperTransport::from_config(&cfg)?);
//! let service = Arc::new(Service::new(&cfg, transport));
//! let authn: Arc<dyn GithubAuthNClient> = Arc::new(GithubAuthNLocalClient::new(service));
//! ```
//!
//! ## Configuration
//!
//! ```yaml
//! api_url: "https://github.example.com/api/v3"
//! allowed_orgs: "TEST-ORG,TEST-ORG2"
//! principal_cache_ttl: "1m"
//! connect_timeout_ms: 2000
//! request_timeout_ms: 5000
//! socket_timeout_ms: 5000
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub use github_authn_sdk::{
    AuthResolutionError, Credentials, GithubAuthNClient, Identity, ResolutionFailureKind,
};

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{ConfigError, GithubAuthNConfig, ResolvedConfig};
pub use domain::{GithubAuthNLocalClient, Service};
pub use infra::HyperTransport;

#[cfg(test)]
mod test_support;
