//! Dispatcher — forwards one chat request to the provider its model key selects.
//!
//! One call walks `received → resolved → transformed → dispatched` and ends
//! in either an [`UpstreamResponse`] or a [`ProxyError`]. There is no retry
//! and no streaming: the upstream answers with a full JSON body or the call
//! fails. Dropping the returned future (e.g. the caller hung up) drops the
//! in-flight HTTP request with it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use promptlab_core::config::Config;
use promptlab_core::ChatEnvelope;

use crate::credentials::Credentials;
use crate::error::ProxyError;
use crate::registry::{ProviderDescriptor, ProviderRegistry};
use crate::traits::ChatDispatch;

/// What the provider sent back: its status and its decoded JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Stateless router over an immutable registry and credential snapshot.
///
/// Cheap to share behind an `Arc`; concurrent calls share nothing but the
/// connection pool and the optional concurrency limiter.
pub struct Dispatcher {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    registry: Arc<ProviderRegistry>,
    credentials: Credentials,
    /// Applies to providers without their own timeout. `None` waits forever.
    timeout: Option<Duration>,
    limiter: Option<Arc<Semaphore>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("providers", &self.registry.len())
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .field(
                "max_concurrent",
                &self.limiter.as_ref().map(|_| "bounded").unwrap_or("unbounded"),
            )
            .finish()
    }
}

impl Dispatcher {
    pub fn new(registry: Arc<ProviderRegistry>, credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            registry,
            credentials,
            timeout: None,
            limiter: None,
        }
    }

    /// Build from loaded config, reading credentials from the environment.
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with(config, Credentials::from_env)
    }

    /// Build from loaded config, with credentials supplied by `load`.
    pub fn from_config_with(
        config: &Config,
        load: impl FnOnce(&ProviderRegistry) -> Credentials,
    ) -> Self {
        let registry = Arc::new(ProviderRegistry::from_config(&config.providers));
        let credentials = load(registry.as_ref());
        for env in credentials.missing(&registry) {
            warn!(env = %env, "provider credential not set");
        }

        let mut dispatcher = Self::new(registry, credentials);
        if let Some(secs) = config.upstream.timeout_secs {
            dispatcher = dispatcher.with_timeout(Duration::from_secs(secs));
        }
        if let Some(max) = config.upstream.max_concurrent {
            dispatcher = dispatcher.with_max_concurrent(max);
        }
        dispatcher
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cap concurrent upstream calls; `0` leaves them unbounded.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.limiter = (max > 0).then(|| Arc::new(Semaphore::new(max)));
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Resolve the provider and build the outbound body, without any I/O.
    pub fn prepare(&self, mut request: ChatEnvelope) -> (&ProviderDescriptor, Map<String, Value>) {
        let provider = self.registry.resolve(request.model_key());
        debug!(
            provider = %provider.display_name,
            model_key = request.model_key(),
            fallback = provider.is_fallback(),
            "provider resolved"
        );

        request.apply_overrides(&provider.payload_overrides);
        let body = request.into_body();
        debug!(
            provider = %provider.display_name,
            overrides = provider.payload_overrides.len(),
            "outbound body prepared"
        );

        (provider, body)
    }

    /// Run one proxied call end to end.
    pub async fn handle(&self, request: ChatEnvelope) -> Result<UpstreamResponse, ProxyError> {
        let (provider, body) = self.prepare(request);

        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };

        let credential = match self.credentials.get(&provider.credential_env) {
            Some(credential) => credential,
            None => {
                warn!(
                    provider = %provider.display_name,
                    env = %provider.credential_env,
                    "credential not set, sending an empty bearer token"
                );
                ""
            }
        };

        let timeout = provider.timeout.or(self.timeout);
        let mut outbound = self
            .client
            .post(&provider.endpoint_url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(credential)
            .json(&body);
        if let Some(timeout) = timeout {
            outbound = outbound.timeout(timeout);
        }

        debug!(
            provider = %provider.display_name,
            endpoint = %provider.endpoint_url,
            "dispatching upstream"
        );
        let started = Instant::now();

        let response = outbound
            .send()
            .await
            .map_err(|e| transport_error(provider, e, timeout))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(provider, e, timeout))?;

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            error!(
                provider = %provider.display_name,
                status = %status,
                error = %e,
                "upstream body is not JSON"
            );
            ProxyError::MalformedUpstreamBody {
                provider: provider.display_name.clone(),
                message: e.to_string(),
            }
        })?;

        debug!(
            provider = %provider.display_name,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "upstream answered"
        );
        if !status.is_success() {
            warn!(
                provider = %provider.display_name,
                status = %status,
                "upstream reported an error status"
            );
        }

        Ok(UpstreamResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport_error(
    provider: &ProviderDescriptor,
    err: reqwest::Error,
    timeout: Option<Duration>,
) -> ProxyError {
    match timeout {
        Some(timeout) if err.is_timeout() => {
            error!(
                provider = %provider.display_name,
                timeout_ms = timeout.as_millis() as u64,
                "upstream timed out"
            );
            ProxyError::Timeout {
                provider: provider.display_name.clone(),
                timeout,
            }
        }
        _ => {
            error!(
                provider = %provider.display_name,
                error = %err,
                is_connect = err.is_connect(),
                "upstream request failed"
            );
            ProxyError::UpstreamUnreachable {
                provider: provider.display_name.clone(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl ChatDispatch for Dispatcher {
    async fn dispatch(&self, request: ChatEnvelope) -> Result<UpstreamResponse, ProxyError> {
        self.handle(request).await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
