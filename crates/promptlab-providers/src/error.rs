//! Error types for the registry and the dispatch path.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single proxied call. Never retried.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Connection or transport failure reaching the provider.
    #[error("{provider} unreachable: {message}")]
    UpstreamUnreachable { provider: String, message: String },

    /// The provider answered, but the body is not JSON.
    #[error("{provider} returned a malformed body: {message}")]
    MalformedUpstreamBody { provider: String, message: String },

    /// The configured timeout elapsed before the provider answered.
    #[error("{provider} did not answer within {}s", .timeout.as_secs_f64())]
    Timeout { provider: String, timeout: Duration },
}

impl ProxyError {
    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::UpstreamUnreachable { .. } => "upstream_unreachable",
            ProxyError::MalformedUpstreamBody { .. } => "malformed_upstream_body",
            ProxyError::Timeout { .. } => "timeout",
        }
    }
}

/// Registry construction errors.
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("provider for model key '{0}' is already registered")]
    DuplicateKey(String),

    #[error("no provider is bound to the fallback key '{0}'")]
    MissingFallback(&'static str),
}
