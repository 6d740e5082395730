//! Public API trait for the GitHub `AuthN` module.
//!
//! The host authentication framework holds a reference to this capability
//! and calls it once per login attempt.

use async_trait::async_trait;

use crate::error::AuthResolutionError;
use crate::models::{Credentials, Identity};

/// Capability that turns a (login, token) pair into an [`Identity`].
///
/// ```ignore
/// let authn: Arc<dyn GithubAuthNClient> = Arc::new(local_client);
/// let identity = authn.authenticate(&Credentials::new(login, token)).await?;
/// ```
///
/// # Security
///
/// Every failure surfaces as a generic [`AuthResolutionError`]. Its
/// [`kind`](AuthResolutionError::kind) and source chain are meant for logs,
/// never for the end user.
#[async_trait]
pub trait GithubAuthNClient: Send + Sync {
    /// Resolve the credentials into an identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthResolutionError`] when the provider cannot be reached,
    /// rejects the token, answers with an unexpected body, reports a
    /// different login than the one claimed, or when the user is not a
    /// member of any allowed organization.
    async fn authenticate(&self, credentials: &Credentials)
    -> Result<Identity, AuthResolutionError>;
}
