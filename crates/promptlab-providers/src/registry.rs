//! Provider registry — model keys to upstream provider descriptors.
//!
//! The built-in table ([`PROVIDERS`]) is static; [`ProviderRegistry`] turns it
//! into owned descriptors, lets config extend or replace entries, and answers
//! lookups. Unknown model keys are not an error: they route to the provider
//! bound to [`FALLBACK_KEY`].

use std::collections::HashMap;
use std::time::Duration;

use promptlab_core::config::ProviderEntry;
use serde_json::{Map, Value};

use crate::error::RegistryError;

/// Reserved model key of the fallback route.
pub const FALLBACK_KEY: &str = "default";

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one built-in provider
// ─────────────────────────────────────────────

/// Static specification of one built-in provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Value of `model` in the request body that selects this provider.
    pub model_key: &'static str,
    /// Human-readable name for logs. E.g. `"SiliconFlow (Qwen)"`.
    pub display_name: &'static str,
    /// Full chat-completions endpoint.
    pub endpoint_url: &'static str,
    /// Environment variable for the bearer credential. E.g. `"OPENAI_API_KEY"`.
    pub credential_env: &'static str,
    /// Fields forced into the outbound body.
    pub payload_overrides: &'static [PayloadOverride],
}

/// A fixed field written over the caller's body.
#[derive(Clone, Debug)]
pub struct PayloadOverride {
    pub field: &'static str,
    pub value: OverrideValue,
}

/// Values a static override can carry.
#[derive(Clone, Debug)]
pub enum OverrideValue {
    Str(&'static str),
    Bool(bool),
}

impl From<&OverrideValue> for Value {
    fn from(value: &OverrideValue) -> Self {
        match value {
            OverrideValue::Str(s) => Value::String((*s).to_string()),
            OverrideValue::Bool(b) => Value::Bool(*b),
        }
    }
}

// ─────────────────────────────────────────────
// Built-in providers
// ─────────────────────────────────────────────

/// The built-in routing table. Exactly one entry uses [`FALLBACK_KEY`].
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        model_key: "doubao-chat",
        display_name: "Doubao",
        endpoint_url: "https://api.doubao.com/v1/chat/completions",
        credential_env: "DOUBAO_API_KEY",
        payload_overrides: &[],
    },
    // OpenAI only ever serves gpt-3.5-turbo here, whatever the caller asked for.
    ProviderSpec {
        model_key: "chatgpt",
        display_name: "OpenAI",
        endpoint_url: "https://api.openai.com/v1/chat/completions",
        credential_env: "OPENAI_API_KEY",
        payload_overrides: &[PayloadOverride {
            field: "model",
            value: OverrideValue::Str("gpt-3.5-turbo"),
        }],
    },
    ProviderSpec {
        model_key: "Qwen/Qwen2.5-72B-Instruct",
        display_name: "SiliconFlow (Qwen)",
        endpoint_url: "https://api.siliconflow.cn/v1/chat/completions",
        credential_env: "SILICONFLOW_API_KEY",
        payload_overrides: &[
            PayloadOverride {
                field: "model",
                value: OverrideValue::Str("Qwen/Qwen2.5-72B-Instruct"),
            },
            PayloadOverride {
                field: "stream",
                value: OverrideValue::Bool(false),
            },
        ],
    },
    ProviderSpec {
        model_key: "Pro/THUDM/glm-4-9b-chat",
        display_name: "SiliconFlow (GLM)",
        endpoint_url: "https://api.siliconflow.cn/v1/chat/completions",
        credential_env: "SILICONFLOW_API_KEY",
        payload_overrides: &[
            PayloadOverride {
                field: "model",
                value: OverrideValue::Str("Pro/THUDM/glm-4-9b-chat"),
            },
            PayloadOverride {
                field: "stream",
                value: OverrideValue::Bool(false),
            },
        ],
    },
    ProviderSpec {
        model_key: FALLBACK_KEY,
        display_name: "DeepSeek",
        endpoint_url: "https://api.deepseek.com/v1/chat/completions",
        credential_env: "DEEPSEEK_API_KEY",
        payload_overrides: &[],
    },
];

// ─────────────────────────────────────────────
// ProviderDescriptor — owned, possibly config-defined
// ─────────────────────────────────────────────

/// Everything the dispatcher needs to call one provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderDescriptor {
    pub model_key: String,
    pub display_name: String,
    pub endpoint_url: String,
    pub credential_env: String,
    pub payload_overrides: Map<String, Value>,
    /// Overrides the dispatcher-wide timeout for this provider.
    pub timeout: Option<Duration>,
}

impl ProviderDescriptor {
    pub fn new(
        model_key: impl Into<String>,
        endpoint_url: impl Into<String>,
        credential_env: impl Into<String>,
    ) -> Self {
        let model_key = model_key.into();
        Self {
            display_name: model_key.clone(),
            model_key,
            endpoint_url: endpoint_url.into(),
            credential_env: credential_env.into(),
            payload_overrides: Map::new(),
            timeout: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_override(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload_overrides.insert(field.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.model_key == FALLBACK_KEY
    }
}

impl From<&ProviderSpec> for ProviderDescriptor {
    fn from(spec: &ProviderSpec) -> Self {
        Self {
            model_key: spec.model_key.to_string(),
            display_name: spec.display_name.to_string(),
            endpoint_url: spec.endpoint_url.to_string(),
            credential_env: spec.credential_env.to_string(),
            payload_overrides: spec
                .payload_overrides
                .iter()
                .map(|o| (o.field.to_string(), Value::from(&o.value)))
                .collect(),
            timeout: None,
        }
    }
}

impl From<&ProviderEntry> for ProviderDescriptor {
    fn from(entry: &ProviderEntry) -> Self {
        Self {
            model_key: entry.model_key.clone(),
            display_name: entry
                .display_name
                .clone()
                .unwrap_or_else(|| entry.model_key.clone()),
            endpoint_url: entry.endpoint_url.clone(),
            credential_env: entry.credential_env.clone(),
            payload_overrides: entry.payload_overrides.clone(),
            timeout: entry.timeout_secs.map(Duration::from_secs),
        }
    }
}

// ─────────────────────────────────────────────
// ProviderRegistry
// ─────────────────────────────────────────────

/// Immutable-after-startup lookup table, keyed by model key.
///
/// Always holds a [`FALLBACK_KEY`] entry; that is what makes
/// [`resolve`](Self::resolve) infallible.
#[derive(Clone, Debug)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderDescriptor>,
    /// Registration order, for stable listings.
    order: Vec<String>,
}

impl ProviderRegistry {
    /// Registry holding only the fallback route.
    pub fn new(fallback: ProviderDescriptor) -> Self {
        let mut fallback = fallback;
        fallback.model_key = FALLBACK_KEY.to_string();
        let mut registry = Self {
            providers: HashMap::new(),
            order: Vec::new(),
        };
        registry.upsert(fallback);
        registry
    }

    /// Registry of the built-in providers.
    pub fn builtin() -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
            order: Vec::new(),
        };
        for spec in PROVIDERS {
            registry.upsert(ProviderDescriptor::from(spec));
        }
        registry
    }

    /// Build from explicit descriptors; keys must be unique and one must be the fallback.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ProviderDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self {
            providers: HashMap::new(),
            order: Vec::new(),
        };
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        if !registry.providers.contains_key(FALLBACK_KEY) {
            return Err(RegistryError::MissingFallback(FALLBACK_KEY));
        }
        Ok(registry)
    }

    /// Built-ins, then each configured entry upserted (config wins).
    pub fn from_config(entries: &[ProviderEntry]) -> Self {
        let mut registry = Self::builtin();
        for entry in entries {
            if let Some(previous) = registry.upsert(ProviderDescriptor::from(entry)) {
                tracing::debug!(
                    model_key = %previous.model_key,
                    replaced = %previous.display_name,
                    "config entry replaces built-in provider"
                );
            }
        }
        registry
    }

    /// Add a provider. Duplicate model keys are rejected.
    pub fn register(&mut self, descriptor: ProviderDescriptor) -> Result<(), RegistryError> {
        if self.providers.contains_key(&descriptor.model_key) {
            return Err(RegistryError::DuplicateKey(descriptor.model_key));
        }
        self.upsert(descriptor);
        Ok(())
    }

    /// Add or replace a provider, returning the one it replaced.
    pub fn upsert(&mut self, descriptor: ProviderDescriptor) -> Option<ProviderDescriptor> {
        let key = descriptor.model_key.clone();
        let previous = self.providers.insert(key.clone(), descriptor);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// Exact match on `model_key`, otherwise the fallback. Never fails.
    pub fn resolve(&self, model_key: &str) -> &ProviderDescriptor {
        self.get(model_key).unwrap_or_else(|| self.fallback())
    }

    /// Exact match only.
    pub fn get(&self, model_key: &str) -> Option<&ProviderDescriptor> {
        self.providers.get(model_key)
    }

    pub fn fallback(&self) -> &ProviderDescriptor {
        // Every constructor installs the fallback and nothing removes it.
        &self.providers[FALLBACK_KEY]
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ProviderDescriptor> {
        self.order.iter().filter_map(|key| self.providers.get(key))
    }

    /// Distinct credential variable names, in registration order.
    pub fn credential_envs(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for descriptor in self.iter() {
            if !names.contains(&descriptor.credential_env.as_str()) {
                names.push(&descriptor.credential_env);
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_every_builtin_key() {
        let registry = ProviderRegistry::builtin();
        for spec in PROVIDERS {
            assert_eq!(registry.resolve(spec.model_key).model_key, spec.model_key);
        }
    }

    #[test]
    fn test_resolve_unknown_uses_fallback() {
        let registry = ProviderRegistry::builtin();
        let descriptor = registry.resolve("some-random-model-xyz");
        assert!(descriptor.is_fallback());
        assert_eq!(descriptor.display_name, "DeepSeek");
        assert_eq!(
            descriptor.endpoint_url,
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_resolve_empty_uses_fallback() {
        let registry = ProviderRegistry::builtin();
        assert!(registry.resolve("").is_fallback());
    }

    #[test]
    fn test_resolve_is_exact_match() {
        let registry = ProviderRegistry::builtin();
        // Case and whitespace matter
        assert!(registry.resolve("ChatGPT").is_fallback());
        assert!(registry.resolve(" chatgpt").is_fallback());
        assert!(registry.resolve("qwen/qwen2.5-72b-instruct").is_fallback());
    }

    #[test]
    fn test_chatgpt_forces_model() {
        let registry = ProviderRegistry::builtin();
        let descriptor = registry.resolve("chatgpt");
        assert_eq!(descriptor.credential_env, "OPENAI_API_KEY");
        assert_eq!(descriptor.payload_overrides["model"], json!("gpt-3.5-turbo"));
        assert!(!descriptor.payload_overrides.contains_key("stream"));
    }

    #[test]
    fn test_siliconflow_disables_streaming() {
        let registry = ProviderRegistry::builtin();
        for key in ["Qwen/Qwen2.5-72B-Instruct", "Pro/THUDM/glm-4-9b-chat"] {
            let descriptor = registry.resolve(key);
            assert_eq!(descriptor.credential_env, "SILICONFLOW_API_KEY");
            assert_eq!(descriptor.payload_overrides["model"], json!(key));
            assert_eq!(descriptor.payload_overrides["stream"], json!(false));
        }
    }

    #[test]
    fn test_builtin_keys_unique_with_one_fallback() {
        let keys: Vec<&str> = PROVIDERS.iter().map(|s| s.model_key).collect();
        let mut unique = keys.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(keys.len(), unique.len(), "Duplicate model keys found");
        assert_eq!(keys.iter().filter(|k| **k == FALLBACK_KEY).count(), 1);
        assert_eq!(PROVIDERS.len(), 5);
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut registry = ProviderRegistry::builtin();
        let err = registry
            .register(ProviderDescriptor::new("chatgpt", "http://x", "X_KEY"))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKey("chatgpt".into()));
        // Original untouched
        assert_eq!(registry.resolve("chatgpt").display_name, "OpenAI");
    }

    #[test]
    fn test_register_new_provider() {
        let mut registry = ProviderRegistry::builtin();
        registry
            .register(
                ProviderDescriptor::new("mistral", "https://api.mistral.ai/v1/chat/completions", "MISTRAL_API_KEY")
                    .with_override("model", "mistral-small-latest"),
            )
            .unwrap();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.resolve("mistral").credential_env, "MISTRAL_API_KEY");
    }

    #[test]
    fn test_from_descriptors_requires_fallback() {
        let err = ProviderRegistry::from_descriptors(vec![ProviderDescriptor::new(
            "only",
            "http://x",
            "X_KEY",
        )])
        .unwrap_err();
        assert_eq!(err, RegistryError::MissingFallback(FALLBACK_KEY));
    }

    #[test]
    fn test_from_descriptors_rejects_duplicates() {
        let err = ProviderRegistry::from_descriptors(vec![
            ProviderDescriptor::new("default", "http://a", "A_KEY"),
            ProviderDescriptor::new("default", "http://b", "B_KEY"),
        ])
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateKey("default".into()));
    }

    #[test]
    fn test_new_binds_fallback_key() {
        let registry = ProviderRegistry::new(ProviderDescriptor::new("local", "http://l", "L_KEY"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("anything").endpoint_url, "http://l");
        assert!(registry.fallback().is_fallback());
    }

    #[test]
    fn test_from_config_overrides_and_extends() {
        let entries = vec![
            ProviderEntry {
                model_key: "default".into(),
                endpoint_url: "http://localhost:8000/v1/chat/completions".into(),
                credential_env: "LOCAL_API_KEY".into(),
                timeout_secs: Some(10),
                ..Default::default()
            },
            ProviderEntry {
                model_key: "mistral".into(),
                display_name: Some("Mistral".into()),
                endpoint_url: "https://api.mistral.ai/v1/chat/completions".into(),
                credential_env: "MISTRAL_API_KEY".into(),
                ..Default::default()
            },
        ];

        let registry = ProviderRegistry::from_config(&entries);
        assert_eq!(registry.len(), 6);

        let fallback = registry.resolve("unknown");
        assert_eq!(fallback.endpoint_url, "http://localhost:8000/v1/chat/completions");
        assert_eq!(fallback.display_name, "default");
        assert_eq!(fallback.timeout, Some(Duration::from_secs(10)));

        assert_eq!(registry.resolve("mistral").display_name, "Mistral");
        // Untouched built-in
        assert_eq!(registry.resolve("chatgpt").display_name, "OpenAI");
    }

    #[test]
    fn test_iter_keeps_registration_order() {
        let registry = ProviderRegistry::builtin();
        let keys: Vec<&str> = registry.iter().map(|d| d.model_key.as_str()).collect();
        let expected: Vec<&str> = PROVIDERS.iter().map(|s| s.model_key).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_credential_envs_deduplicated() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(
            registry.credential_envs(),
            vec![
                "DOUBAO_API_KEY",
                "OPENAI_API_KEY",
                "SILICONFLOW_API_KEY",
                "DEEPSEEK_API_KEY"
            ]
        );
    }
}
