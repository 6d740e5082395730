//! Decoding of provider response bodies.

pub mod dto;

use serde::de::DeserializeOwned;

pub use dto::{GithubOrg, GithubTeam, GithubUser};

/// Maximum page size of the list endpoints. Only the first page is fetched.
pub const MAX_PAGE_SIZE: usize = 100;

/// # Errors
///
/// Returns the `serde_json` error if `body` is not a user object.
pub fn decode_user(body: &[u8]) -> Result<GithubUser, serde_json::Error> {
    decode(body)
}

/// # Errors
///
/// Returns the `serde_json` error if `body` is not an array of organizations.
pub fn decode_orgs(body: &[u8]) -> Result<Vec<GithubOrg>, serde_json::Error> {
    decode(body)
}

/// # Errors
///
/// Returns the `serde_json` error if `body` is not an array of teams.
pub fn decode_teams(body: &[u8]) -> Result<Vec<GithubTeam>, serde_json::Error> {
    decode(body)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}
