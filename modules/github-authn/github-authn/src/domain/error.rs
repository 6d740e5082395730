//! Domain errors for the GitHub `AuthN` module.

use github_authn_sdk::{AuthResolutionError, ResolutionFailureKind};
use http::StatusCode;

use super::transport::TransportError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("{endpoint} endpoint answered with status {status}")]
    Unauthorized {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("malformed {endpoint} response: {source}")]
    MalformedResponse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("token belongs to '{actual}', but '{claimed}' was claimed")]
    IdentityMismatch { claimed: String, actual: String },

    #[error("'{login}' is not a member of any allowed organization")]
    OrganizationDenied { login: String },
}

impl DomainError {
    #[must_use]
    pub fn kind(&self) -> ResolutionFailureKind {
        match self {
            Self::Transport(_) => ResolutionFailureKind::Transport,
            Self::Unauthorized { .. } => ResolutionFailureKind::Unauthorized,
            Self::MalformedResponse { .. } => ResolutionFailureKind::MalformedResponse,
            Self::IdentityMismatch { .. } => ResolutionFailureKind::IdentityMismatch,
            Self::OrganizationDenied { .. } => ResolutionFailureKind::OrganizationDenied,
        }
    }
}

impl From<DomainError> for AuthResolutionError {
    fn from(e: DomainError) -> Self {
        Self::with_cause(e.kind(), e)
    }
}
