//! Configuration schema.
//!
//! Hierarchy: `Config` → `ServerConfig`, `UpstreamConfig`, `[ProviderEntry]`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.promptlab/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    /// Extra or replacement providers, merged over the built-in table.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<ProviderEntry>,
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// Inbound HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Answer CORS preflights for any origin (the prompt UI runs elsewhere).
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors: true,
        }
    }
}

// ─────────────────────────────────────────────
// Upstream
// ─────────────────────────────────────────────

/// Settings for outbound provider calls. All off by default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpstreamConfig {
    /// Timeout for every upstream call; `None` waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Cap on concurrent in-flight upstream calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<usize>,
    /// Relay the upstream HTTP status instead of always answering 200.
    pub relay_status: bool,
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// A provider defined in the config file.
///
/// An entry whose `modelKey` matches a built-in provider replaces it;
/// any other key adds a new route.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderEntry {
    pub model_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub endpoint_url: String,
    /// Name of the env var holding the bearer credential.
    pub credential_env: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub payload_overrides: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}
