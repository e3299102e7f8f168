//! Config loader — reads `~/.promptlab/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.promptlab/config.json` (or an explicit path)
//! 3. Environment variables `PROMPTLAB_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path (or `path`) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Apply process environment overrides on top of a loaded config.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`.
///
/// Env var format: `PROMPTLAB_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `PROMPTLAB_SERVER__HOST` → `server.host`
/// - `PROMPTLAB_SERVER__PORT` → `server.port`
/// - `PROMPTLAB_SERVER__CORS` → `server.cors`
/// - `PROMPTLAB_UPSTREAM__TIMEOUT_SECS` → `upstream.timeout_secs`
/// - `PROMPTLAB_UPSTREAM__MAX_CONCURRENT` → `upstream.max_concurrent`
/// - `PROMPTLAB_UPSTREAM__RELAY_STATUS` → `upstream.relay_status`
///
/// Unparsable values are ignored with a warning.
fn apply_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(val) = lookup("PROMPTLAB_SERVER__HOST") {
        config.server.host = val;
    }
    if let Some(port) = parse_var(&lookup, "PROMPTLAB_SERVER__PORT") {
        config.server.port = port;
    }
    if let Some(val) = lookup("PROMPTLAB_SERVER__CORS") {
        config.server.cors = is_truthy(&val);
    }
    if let Some(secs) = parse_var(&lookup, "PROMPTLAB_UPSTREAM__TIMEOUT_SECS") {
        config.upstream.timeout_secs = Some(secs);
    }
    if let Some(n) = parse_var(&lookup, "PROMPTLAB_UPSTREAM__MAX_CONCURRENT") {
        config.upstream.max_concurrent = Some(n);
    }
    if let Some(val) = lookup("PROMPTLAB_UPSTREAM__RELAY_STATUS") {
        config.upstream.relay_status = is_truthy(&val);
    }

    config
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {key}: cannot parse {raw:?}");
            None
        }
    }
}

fn is_truthy(val: &str) -> bool {
    matches!(val.trim(), "true" | "1" | "yes")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
