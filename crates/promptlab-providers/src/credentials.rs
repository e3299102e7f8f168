//! Bearer credentials, keyed by env var name.
//!
//! Read once at startup and handed to the dispatcher, so request handling
//! never touches the process environment.

use std::collections::HashMap;

use crate::registry::ProviderRegistry;

/// Snapshot of provider credentials. Values are redacted in `Debug`.
#[derive(Clone, Default)]
pub struct Credentials {
    values: HashMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort();
        f.debug_struct("Credentials").field("set", &names).finish()
    }
}

impl Credentials {
    /// Read every credential variable the registry references.
    pub fn from_env(registry: &ProviderRegistry) -> Self {
        Self::from_lookup(registry, |name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading through `lookup`.
    pub fn from_lookup(
        registry: &ProviderRegistry,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        Self::from_pairs(
            registry
                .credential_envs()
                .into_iter()
                .filter_map(|name| lookup(name).map(|value| (name.to_string(), value))),
        )
    }

    /// Build from explicit `(env var name, value)` pairs. Empty values are dropped.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        Self { values }
    }

    /// The credential stored under `env_name`, if set and non-empty.
    pub fn get(&self, env_name: &str) -> Option<&str> {
        self.values.get(env_name).map(String::as_str)
    }

    pub fn is_set(&self, env_name: &str) -> bool {
        self.values.contains_key(env_name)
    }

    /// Variables the registry references but which have no value.
    pub fn missing<'a>(&self, registry: &'a ProviderRegistry) -> Vec<&'a str> {
        registry
            .credential_envs()
            .into_iter()
            .filter(|name| !self.is_set(name))
            .collect()
    }
}
