//! Response shapes of the GitHub REST API. Unknown fields are ignored.

use serde::Deserialize;

/// `GET /user`
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// An element of `GET /user/orgs`, also nested in teams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct GithubOrg {
    pub login: String,
}

/// An element of `GET /user/teams`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct GithubTeam {
    pub name: String,
    pub organization: GithubOrg,
}

impl GithubTeam {
    /// Role string granted for membership in this team: `"<org>/<team>"`.
    #[must_use]
    pub fn role(&self) -> String {
        format!("{}/{}", self.organization.login, self.name)
    }
}
