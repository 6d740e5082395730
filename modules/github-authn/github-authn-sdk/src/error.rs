//! Error types for the GitHub `AuthN` module.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Why a resolution attempt failed.
///
/// Only [`Transport`](Self::Transport) is an infrastructure problem; every
/// other kind is a policy outcome about the presented credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionFailureKind {
    /// Network or IO failure reaching the provider, including timeouts.
    Transport,
    /// The provider answered with a non-success status.
    Unauthorized,
    /// A response body did not decode to the expected shape.
    MalformedResponse,
    /// The token belongs to a different login than the one claimed.
    IdentityMismatch,
    /// The user is not a member of any allowed organization.
    OrganizationDenied,
}

impl ResolutionFailureKind {
    /// `true` for failures caused by infrastructure rather than policy.
    #[must_use]
    pub fn is_transport(self) -> bool {
        matches!(self, Self::Transport)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Unauthorized => "unauthorized",
            Self::MalformedResponse => "malformed_response",
            Self::IdentityMismatch => "identity_mismatch",
            Self::OrganizationDenied => "organization_denied",
        }
    }
}

impl fmt::Display for ResolutionFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single failure type returned to the host framework.
///
/// `Display` never reveals more than "authentication failed". The kind and
/// the underlying cause stay available for logging.
#[derive(Debug, Error)]
#[error("authentication failed")]
pub struct AuthResolutionError {
    kind: ResolutionFailureKind,
    #[source]
    cause: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl AuthResolutionError {
    #[must_use]
    pub fn new(kind: ResolutionFailureKind) -> Self {
        Self { kind, cause: None }
    }

    #[must_use]
    pub fn with_cause(
        kind: ResolutionFailureKind,
        cause: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            kind,
            cause: Some(cause.into()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ResolutionFailureKind {
        self.kind
    }
}
