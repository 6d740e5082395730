//! Domain models for the GitHub `AuthN` module.

use std::collections::BTreeSet;
use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Login name and bearer token presented by the caller.
///
/// The token is held as a [`SecretString`]: it is zeroized on drop and
/// redacted from `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    login: String,
    token: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(login: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self {
            login: login.into(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("token", &self.token)
            .finish()
    }
}

/// Resolved principal: display name plus `"<org>/<team>"` roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    display_name: String,
    roles: BTreeSet<String>,
}

impl Identity {
    #[must_use]
    pub fn new(display_name: impl Into<String>, roles: BTreeSet<String>) -> Self {
        Self {
            display_name: display_name.into(),
            roles,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
