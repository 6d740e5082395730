//! GitHub `AuthN` SDK
//!
//! This crate provides the public API of the `github_authn` module:
//!
//! - [`GithubAuthNClient`] - Capability trait the host authentication framework holds
//! - [`Credentials`] - Login name plus bearer token presented by the caller
//! - [`Identity`] - Resolved display name and team-derived roles
//! - [`AuthResolutionError`] - The single failure type seen by the host
//!
//! ## Usage
//!
//! ```ignore
//! use github_authn_sdk::{Credentials, GithubAuthNClient};
//!
//! let creds = Credentials::new("demo-user", token);
//! match authn.authenticate(&creds).await {
//!     Ok(identity) => grant(identity.display_name(), identity.roles()),
//!     Err(_) => deny(),
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::GithubAuthNClient;
pub use error::{AuthResolutionError, ResolutionFailureKind};
pub use models::{Credentials, Identity};
