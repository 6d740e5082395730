//! Configuration for the GitHub `AuthN` module.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use http::Uri;
use serde::{Deserialize, Deserializer};

const USER_PATH: &str = "/user";
const USER_TEAMS_PATH: &str = "/user/teams";
const USER_ORGS_PATH: &str = "/user/orgs";

/// Prefix of environment variables that override file configuration.
pub const ENV_PREFIX: &str = "GITHUB_AUTHN_";

/// Timeout value meaning "no timeout".
pub const NO_TIMEOUT: i64 = -1;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid api_url '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("allowed_orgs '{0}' does not name any organization")]
    EmptyAllowList(String),
}

/// Module configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubAuthNConfig {
    /// Base URL of the GitHub REST API, e.g. `https://github.example.com/api/v3`.
    pub api_url: String,

    /// Comma separated organization logins. Absent or blank disables the
    /// organization check.
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub allowed_orgs: Option<String>,

    /// How long a resolved identity is reused, as a humantime string (`"1m"`, `"500ms"`).
    #[serde(deserialize_with = "deserialize_duration")]
    pub principal_cache_ttl: Duration,

    /// Connect timeout in milliseconds; `<= 0` disables it.
    pub connect_timeout_ms: i64,

    /// Time allowed until the response head arrives, in milliseconds; `<= 0` disables it.
    pub request_timeout_ms: i64,

    /// Time allowed for reading the response body, in milliseconds; `<= 0` disables it.
    pub socket_timeout_ms: i64,

    /// `User-Agent` header sent with every request.
    #[serde(deserialize_with = "deserialize_text")]
    pub user_agent: String,
}

impl Default for GithubAuthNConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_owned(),
            allowed_orgs: None,
            principal_cache_ttl: Duration::from_secs(60),
            connect_timeout_ms: NO_TIMEOUT,
            request_timeout_ms: NO_TIMEOUT,
            socket_timeout_ms: NO_TIMEOUT,
            user_agent: concat!("github-authn/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
}

/// Scalar accepted where text is expected. YAML and environment values such
/// as an all-digit organization login arrive typed, not as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    Str(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl From<Text> for String {
    fn from(text: Text) -> Self {
        match text {
            Text::Str(s) => s,
            Text::Unsigned(n) => n.to_string(),
            Text::Signed(n) => n.to_string(),
            Text::Float(n) => n.to_string(),
            Text::Bool(b) => b.to_string(),
        }
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Text::deserialize(deserializer).map(String::from)
}

fn deserialize_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Text>::deserialize(deserializer)?.map(String::from))
}

impl GithubAuthNConfig {
    /// Load configuration from a YAML file, overridden by `GITHUB_AUTHN_*`
    /// environment variables. Without a file only defaults and environment apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file cannot be read or a value
    /// has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] when `api_url` is not an
    /// absolute http(s) URL, and [`ConfigError::EmptyAllowList`] when
    /// `allowed_orgs` is non-blank but contains no organization.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let endpoints = Endpoints::from_base(&self.api_url)?;
        let allowed_orgs = match self.allowed_orgs.as_deref() {
            Some(raw) => OrgAllowList::parse(raw)?,
            None => OrgAllowList::default(),
        };

        Ok(ResolvedConfig {
            endpoints,
            allowed_orgs,
            principal_cache_ttl: self.principal_cache_ttl,
            timeouts: Timeouts {
                connect: timeout_from_millis(self.connect_timeout_ms),
                request: timeout_from_millis(self.request_timeout_ms),
                socket: timeout_from_millis(self.socket_timeout_ms),
            },
            user_agent: self.user_agent.clone(),
        })
    }
}

fn timeout_from_millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms)
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
}

/// Validated, immutable configuration consumed by the resolver.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoints: Endpoints,
    pub allowed_orgs: OrgAllowList,
    pub principal_cache_ttl: Duration,
    pub timeouts: Timeouts,
    pub user_agent: String,
}

/// Per-request timeouts. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Option<Duration>,
    pub request: Option<Duration>,
    pub socket: Option<Duration>,
}

/// The three provider endpoints, resolved against the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub user: Uri,
    pub user_teams: Uri,
    pub user_orgs: Uri,
}

impl Endpoints {
    /// Append the endpoint paths to `base`. Any path already present in
    /// `base` (such as `/api/v3` on GitHub Enterprise) is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] if `base` is not an absolute
    /// http(s) URL.
    pub fn from_base(base: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidApiUrl {
            url: base.to_owned(),
            reason,
        };

        let parsed = url::Url::parse(base).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_owned()));
        }

        let trimmed = base.trim_end_matches('/');
        let join = |path: &str| -> Result<Uri, ConfigError> {
            format!("{trimmed}{path}")
                .parse::<Uri>()
                .map_err(|e| invalid(e.to_string()))
        };

        Ok(Self {
            user: join(USER_PATH)?,
            user_teams: join(USER_TEAMS_PATH)?,
            user_orgs: join(USER_ORGS_PATH)?,
        })
    }
}

/// Organizations whose members may authenticate. Empty means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgAllowList {
    orgs: Vec<String>,
}

impl OrgAllowList {
    /// Parse a comma separated list. Entries are trimmed and blank entries
    /// are dropped; a blank input yields an unrestricted list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAllowList`] for input such as `" , ,"`
    /// that is not blank yet names no organization.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut orgs: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|org| !org.is_empty())
            .map(str::to_owned)
            .collect();
        orgs.sort();
        orgs.dedup();

        if orgs.is_empty() {
            return Err(ConfigError::EmptyAllowList(raw.to_owned()));
        }
        Ok(Self { orgs })
    }

    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !self.orgs.is_empty()
    }

    /// Exact, case-sensitive membership test. An empty login never matches.
    #[must_use]
    pub fn allows(&self, org_login: &str) -> bool {
        !org_login.is_empty() && self.orgs.iter().any(|org| org == org_login)
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.orgs.iter().map(String::as_str)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn endpoints_keep_enterprise_base_path() {
        let endpoints = Endpoints::from_base("http://github.example.com/api/v3").unwrap();

        assert_eq!(endpoints.user, "http://github.example.com/api/v3/user");
        assert_eq!(endpoints.user_teams, "http://github.example.com/api/v3/user/teams");
        assert_eq!(endpoints.user_orgs, "http://github.example.com/api/v3/user/orgs");
    }

    #[test]
    fn endpoints_ignore_trailing_slash() {
        let endpoints = Endpoints::from_base("https://api.github.com/").unwrap();
        assert_eq!(endpoints.user, "https://api.github.com/user");
    }

    #[test]
    fn endpoints_reject_non_http_scheme() {
        let err = Endpoints::from_base("ftp://github.example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));
    }

    #[test]
    fn endpoints_reject_relative_url() {
        let err = Endpoints::from_base("/api/v3").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));
    }

    #[test]
    fn allow_list_blank_is_unrestricted() {
        assert!(!OrgAllowList::parse("").unwrap().is_restricted());
        assert!(!OrgAllowList::parse("   ").unwrap().is_restricted());
        assert!(!OrgAllowList::default().is_restricted());
    }

    #[test]
    fn allow_list_trims_and_drops_blank_entries() {
        let list = OrgAllowList::parse(" TEST-ORG , ,TEST-ORG2,").unwrap();

        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["TEST-ORG", "TEST-ORG2"]);
        assert!(!list.allows(""));
    }

    #[test]
    fn allow_list_of_only_separators_is_rejected() {
        let err = OrgAllowList::parse(" , ,").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyAllowList(_)));
    }

    #[test]
    fn allow_list_matches_exactly() {
        let list = OrgAllowList::parse("TEST-ORG").unwrap();

        assert!(list.allows("TEST-ORG"));
        assert!(!list.allows("test-org"));
        assert!(!list.allows("TEST"));
        assert!(!list.allows("TEST-ORG2"));
    }

    #[test]
    fn allow_list_order_does_not_matter() {
        let a = OrgAllowList::parse("TEST-ORG,TEST-ORG2").unwrap();
        let b = OrgAllowList::parse("TEST-ORG2,TEST-ORG").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_positive_timeouts_mean_unbounded() {
        assert_eq!(timeout_from_millis(NO_TIMEOUT), None);
        assert_eq!(timeout_from_millis(0), None);
        assert_eq!(timeout_from_millis(1500), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn resolve_defaults() {
        let resolved = GithubAuthNConfig::default().resolve().unwrap();

        assert_eq!(resolved.endpoints.user, "https://api.github.com/user");
        assert!(!resolved.allowed_orgs.is_restricted());
        assert_eq!(resolved.principal_cache_ttl, Duration::from_secs(60));
        assert_eq!(resolved.timeouts, Timeouts::default());
    }

    #[test]
    fn load_reads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_url: http://github.example.com/api/v3\n\
             allowed_orgs: TEST-ORG,TEST-ORG2\n\
             principal_cache_ttl: 5m 30s\n\
             connect_timeout_ms: 2000\n\
             request_timeout_ms: 5000"
        )
        .unwrap();

        let cfg = GithubAuthNConfig::load(Some(file.path())).unwrap();

        assert_eq!(cfg.api_url, "http://github.example.com/api/v3");
        assert_eq!(cfg.allowed_orgs.as_deref(), Some("TEST-ORG,TEST-ORG2"));
        assert_eq!(cfg.principal_cache_ttl, Duration::from_secs(330));
        assert_eq!(cfg.connect_timeout_ms, 2000);
        assert_eq!(cfg.request_timeout_ms, 5000);
        assert_eq!(cfg.socket_timeout_ms, NO_TIMEOUT);
    }

    #[test]
    fn load_accepts_numeric_org_and_user_agent() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allowed_orgs: 12345\nuser_agent: 42").unwrap();

        let cfg = GithubAuthNConfig::load(Some(file.path())).unwrap();

        assert_eq!(cfg.allowed_orgs.as_deref(), Some("12345"));
        assert_eq!(cfg.user_agent, "42");
        assert!(cfg.resolve().unwrap().allowed_orgs.allows("12345"));
    }

    #[test]
    fn env_overrides_accept_numeric_org() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("github-authn.yaml", "allowed_orgs: TEST-ORG")?;
            jail.set_env("GITHUB_AUTHN_ALLOWED_ORGS", "12345");

            let cfg = GithubAuthNConfig::load(Some(Path::new("github-authn.yaml"))).unwrap();

            assert_eq!(cfg.allowed_orgs.as_deref(), Some("12345"));
            Ok(())
        });
    }

    #[test]
    fn load_keeps_null_allow_list_unset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allowed_orgs: ~").unwrap();

        let cfg = GithubAuthNConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.allowed_orgs, None);
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "github_org: TEST-ORG").unwrap();

        let err = GithubAuthNConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn load_rejects_bad_ttl() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "principal_cache_ttl: forever").unwrap();

        assert!(GithubAuthNConfig::load(Some(file.path())).is_err());
    }
}
