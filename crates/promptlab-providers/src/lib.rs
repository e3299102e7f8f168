//! Provider layer for Promptlab.
//!
//! # Architecture
//!
//! - [`registry`] — static specs for the built-in providers + model-key lookup
//! - [`credentials`] — bearer tokens snapshotted from the environment at startup
//! - [`dispatch::Dispatcher`] — forwards one chat request to the resolved provider
//! - [`traits::ChatDispatch`] — the seam the HTTP layer talks to

pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use credentials::Credentials;
pub use dispatch::{Dispatcher, UpstreamResponse};
pub use error::{ProxyError, RegistryError};
pub use registry::{ProviderDescriptor, ProviderRegistry, ProviderSpec, FALLBACK_KEY, PROVIDERS};
pub use traits::ChatDispatch;
