//! Credential resolution against the GitHub API.

use std::collections::BTreeSet;
use std::sync::Arc;

use github_authn_sdk::{Credentials, Identity};
use http::{StatusCode, Uri};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use super::cache::{CacheKey, PrincipalCache};
use super::error::DomainError;
use super::transport::GithubTransport;
use crate::config::{Endpoints, OrgAllowList, ResolvedConfig};
use crate::infra::github::{self, GithubUser, MAX_PAGE_SIZE};

type Decoder<T> = fn(&[u8]) -> Result<T, serde_json::Error>;

/// Resolves credentials into identities.
///
/// A resolution is a cache lookup followed, on a miss, by up to three
/// sequential calls: the current user, the user's organizations (only when
/// an allow-list is configured) and the user's teams. The cache is the only
/// state shared between concurrent resolutions.
pub struct Service {
    transport: Arc<dyn GithubTransport>,
    cache: PrincipalCache,
    endpoints: Endpoints,
    allowed_orgs: OrgAllowList,
}

impl Service {
    #[must_use]
    pub fn new(cfg: &ResolvedConfig, transport: Arc<dyn GithubTransport>) -> Self {
        debug!(
            api = %cfg.endpoints.user,
            allowed_orgs = %cfg.allowed_orgs.iter().collect::<Vec<_>>().join(","),
            cache_ttl = %humantime::format_duration(cfg.principal_cache_ttl),
            "GitHub AuthN service configured"
        );
        Self {
            transport,
            cache: PrincipalCache::new(cfg.principal_cache_ttl),
            endpoints: cfg.endpoints.clone(),
            allowed_orgs: cfg.allowed_orgs.clone(),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &PrincipalCache {
        &self.cache
    }

    /// Resolve credentials, reusing a live cached identity when present.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError`] on transport failure, non-200 status,
    /// undecodable body, login mismatch or organization denial. Failures are
    /// never cached.
    #[tracing::instrument(skip_all, fields(login = %credentials.login()))]
    pub async fn resolve(&self, credentials: &Credentials) -> Result<Arc<Identity>, DomainError> {
        let key = CacheKey::new(credentials.login(), credentials.token());
        if let Some(identity) = self.cache.get(&key) {
            debug!("Using cached principal");
            return Ok(identity);
        }

        let identity = Arc::new(self.fetch_identity(credentials).await?);
        self.cache.put(key, Arc::clone(&identity));
        info!(
            display_name = identity.display_name(),
            roles = identity.roles().len(),
            "Resolved GitHub identity"
        );
        Ok(identity)
    }

    async fn fetch_identity(&self, credentials: &Credentials) -> Result<Identity, DomainError> {
        let login = credentials.login();
        let token = credentials.token();

        let user = self
            .get_json("user", &self.endpoints.user, token, github::decode_user)
            .await?;
        verify_login(login, &user)?;

        if self.allowed_orgs.is_restricted() {
            self.check_org_membership(login, token).await?;
        }

        let roles = self.fetch_roles(login, token).await?;
        Ok(Identity::new(display_name(&user, login), roles))
    }

    async fn check_org_membership(
        &self,
        login: &str,
        token: &SecretString,
    ) -> Result<(), DomainError> {
        let orgs = self
            .get_json("user orgs", &self.endpoints.user_orgs, token, github::decode_orgs)
            .await?;

        if orgs.iter().any(|org| self.allowed_orgs.allows(&org.login)) {
            Ok(())
        } else {
            debug!(member_of = orgs.len(), "No allowed organization among memberships");
            Err(DomainError::OrganizationDenied {
                login: login.to_owned(),
            })
        }
    }

    async fn fetch_roles(
        &self,
        login: &str,
        token: &SecretString,
    ) -> Result<BTreeSet<String>, DomainError> {
        let teams = self
            .get_json("user teams", &self.endpoints.user_teams, token, github::decode_teams)
            .await?;

        if teams.len() >= MAX_PAGE_SIZE {
            warn!(
                login,
                "Fetching only the first {MAX_PAGE_SIZE} teams for user, roles may be incomplete"
            );
        }

        Ok(teams.iter().map(github::GithubTeam::role).collect())
    }

    async fn get_json<T>(
        &self,
        endpoint: &'static str,
        uri: &Uri,
        token: &SecretString,
        decode: Decoder<T>,
    ) -> Result<T, DomainError> {
        let response = self.transport.get(uri, token).await?;
        if response.status != StatusCode::OK {
            return Err(DomainError::Unauthorized {
                endpoint,
                status: response.status,
            });
        }
        decode(&response.body).map_err(|source| DomainError::MalformedResponse { endpoint, source })
    }
}

/// The provider must report exactly the claimed login. Empty on either side never matches.
fn verify_login(claimed: &str, user: &GithubUser) -> Result<(), DomainError> {
    if claimed.is_empty() || user.login.is_empty() || user.login != claimed {
        return Err(DomainError::IdentityMismatch {
            claimed: claimed.to_owned(),
            actual: user.login.clone(),
        });
    }
    Ok(())
}

fn display_name(user: &GithubUser, login: &str) -> String {
    user.name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(login)
        .to_owned()
}
