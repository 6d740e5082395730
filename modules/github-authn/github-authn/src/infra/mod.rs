//! Infrastructure adapters: the HTTP transport and the response decoder.

pub mod github;
pub mod hyper_transport;

pub use hyper_transport::HyperTransport;
