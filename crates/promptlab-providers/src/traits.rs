//! The dispatch seam between the HTTP surface and the upstream providers.

use async_trait::async_trait;
use promptlab_core::ChatEnvelope;

use crate::dispatch::UpstreamResponse;
use crate::error::ProxyError;

/// Forwards one inbound chat request to an upstream provider.
///
/// [`Dispatcher`](crate::Dispatcher) is the real implementation; the gateway
/// only depends on this trait, so its tests can swap in a stub.
#[async_trait]
pub trait ChatDispatch: Send + Sync {
    /// Route, transform, and forward `request`.
    ///
    /// Every transport-level answer is `Ok`, whatever its HTTP status;
    /// `Err` means no usable JSON body came back.
    async fn dispatch(&self, request: ChatEnvelope) -> Result<UpstreamResponse, ProxyError>;
}
