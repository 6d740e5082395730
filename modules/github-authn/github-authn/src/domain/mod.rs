//! Domain layer for the GitHub `AuthN` module.

pub mod cache;
pub mod error;
pub mod local_client;
pub mod service;
pub mod transport;


pub use cache::{CacheKey, PrincipalCache};
pub use error::DomainError;
pub use local_client::GithubAuthNLocalClient;
pub use service::Service;
pub use transport::{GithubTransport, TransportError, TransportResponse};
