//! Process configuration: default provider, sampling defaults and per-provider settings
//!
//! Loaded once at startup from the environment (optionally seeded from a `.env`
//! file) and treated as read-only afterwards.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use shared::{Credential, ProviderId, SamplingParams};
use tracing::debug;
use url::Url;

use crate::error::{GeneratorError, GeneratorResult};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PROVIDER: ProviderId = ProviderId::Gemini;

/// Settings for a single provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub default_model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub api_key: Option<Credential>,
}

impl ProviderConfig {
    /// Built-in defaults for a provider (no API key)
    pub fn defaults_for(provider: ProviderId) -> Self {
        let (model, base_url) = match provider {
            ProviderId::OpenAI => ("gpt-4o-mini", "https://api.openai.com"),
            ProviderId::Anthropic => ("claude-3-5-sonnet-20241022", "https://api.anthropic.com"),
            ProviderId::Gemini => ("gemini-1.5-flash", "https://generativelanguage.googleapis.com"),
            ProviderId::Ollama => ("llama3.2", "http://localhost:11434"),
        };

        Self {
            default_model: model.to_string(),
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Credential::new(api_key));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// One `ProviderConfig` per provider variant
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    pub gemini: ProviderConfig,
    pub ollama: ProviderConfig,
}

impl ProviderSettings {
    pub fn get(&self, provider: ProviderId) -> &ProviderConfig {
        match provider {
            ProviderId::OpenAI => &self.openai,
            ProviderId::Anthropic => &self.anthropic,
            ProviderId::Gemini => &self.gemini,
            ProviderId::Ollama => &self.ollama,
        }
    }

    pub fn get_mut(&mut self, provider: ProviderId) -> &mut ProviderConfig {
        match provider {
            ProviderId::OpenAI => &mut self.openai,
            ProviderId::Anthropic => &mut self.anthropic,
            ProviderId::Gemini => &mut self.gemini,
            ProviderId::Ollama => &mut self.ollama,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openai: ProviderConfig::defaults_for(ProviderId::OpenAI),
            anthropic: ProviderConfig::defaults_for(ProviderId::Anthropic),
            gemini: ProviderConfig::defaults_for(ProviderId::Gemini),
            ollama: ProviderConfig::defaults_for(ProviderId::Ollama),
        }
    }
}

/// Complete generator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub default_provider: ProviderId,
    pub sampling: SamplingParams,
    pub providers: ProviderSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_provider: DEFAULT_PROVIDER,
            sampling: SamplingParams::default(),
            providers: ProviderSettings::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load from `.env` (if present) and the process environment
    pub fn from_env() -> GeneratorResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment file {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an explicit env file, then the process environment
    pub fn from_env_file(path: &Path) -> GeneratorResult<Self> {
        dotenvy::from_path(path).map_err(|e| {
            GeneratorError::config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> GeneratorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::default();

        if let Some(provider) = get("LLM_PROVIDER") {
            config.default_provider = ProviderId::from_str(&provider)
                .map_err(|e| GeneratorError::config(format!("LLM_PROVIDER: {e}")))?;
        }
        if let Some(value) = get("LLM_TEMPERATURE") {
            config.sampling.temperature = parse_value("LLM_TEMPERATURE", &value)?;
        }
        if let Some(value) = get("LLM_MAX_TOKENS") {
            config.sampling.max_tokens = parse_value("LLM_MAX_TOKENS", &value)?;
        }
        if let Some(value) = get("LLM_TOP_P") {
            config.sampling.top_p = parse_value("LLM_TOP_P", &value)?;
        }
        config
            .sampling
            .validate()
            .map_err(|e| GeneratorError::config(e.to_string()))?;

        for provider in ProviderId::ALL {
            let prefix = provider.env_prefix();
            let settings = config.providers.get_mut(provider);

            let mut api_key = get(&format!("{prefix}_API_KEY"));
            if api_key.is_none() && provider == ProviderId::Gemini {
                api_key = get("GOOGLE_API_KEY");
            }
            settings.api_key = api_key.map(Credential::new);

            if let Some(model) = get(&format!("{prefix}_MODEL")) {
                settings.default_model = model;
            }
            if let Some(base_url) = get(&format!("{prefix}_BASE_URL")) {
                settings.base_url = base_url;
            }
            if let Some(timeout) = get(&format!("{prefix}_TIMEOUT")) {
                let seconds: u64 = parse_value(&format!("{prefix}_TIMEOUT"), &timeout)?;
                if seconds == 0 {
                    return Err(GeneratorError::config(format!("{prefix}_TIMEOUT must be positive")));
                }
                settings.timeout = Duration::from_secs(seconds);
            }

            Url::parse(&settings.base_url).map_err(|e| {
                GeneratorError::config(format!("{prefix}_BASE_URL '{}' is not a valid URL: {}", settings.base_url, e))
            })?;
        }

        Ok(config)
    }

    pub fn provider(&self, provider: ProviderId) -> &ProviderConfig {
        self.providers.get(provider)
    }

    /// Providers that can be called without a per-request credential
    pub fn ready_providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|p| *p == ProviderId::Ollama || self.provider(*p).api_key.is_some())
            .collect()
    }
}

fn parse_value<T>(key: &str, value: &str) -> GeneratorResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| GeneratorError::config(format!("{key}='{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = GeneratorConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.default_provider, ProviderId::Gemini);
        assert_eq!(config.sampling, SamplingParams::default());
        assert_eq!(config.provider(ProviderId::Ollama).base_url, "http://localhost:11434");
        assert_eq!(config.provider(ProviderId::OpenAI).timeout, DEFAULT_TIMEOUT);
        assert!(config.provider(ProviderId::Anthropic).api_key.is_none());
        assert_eq!(config.ready_providers(), vec![ProviderId::Ollama]);
    }

    #[test]
    fn test_environment_overrides() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[
            ("LLM_PROVIDER", "openai"),
            ("LLM_TEMPERATURE", "0.3"),
            ("LLM_MAX_TOKENS", "2048"),
            ("LLM_TOP_P", "0.5"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OLLAMA_BASE_URL", "http://gpu-box:11434/"),
            ("OLLAMA_TIMEOUT", "120"),
        ]))
        .unwrap();

        assert_eq!(config.default_provider, ProviderId::OpenAI);
        assert_eq!(config.sampling.temperature, 0.3);
        assert_eq!(config.sampling.max_tokens, 2048);
        assert_eq!(config.sampling.top_p, 0.5);

        let openai = config.provider(ProviderId::OpenAI);
        assert_eq!(openai.api_key.as_ref().unwrap().expose(), "sk-test");
        assert_eq!(openai.default_model, "gpt-4o");

        let ollama = config.provider(ProviderId::Ollama);
        assert_eq!(ollama.timeout, Duration::from_secs(120));
        assert_eq!(ollama.endpoint("/api/generate"), "http://gpu-box:11434/api/generate");
    }

    #[test]
    fn test_google_api_key_alias() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[("GOOGLE_API_KEY", "g-key")])).unwrap();
        assert_eq!(config.provider(ProviderId::Gemini).api_key.as_ref().unwrap().expose(), "g-key");

        let config = GeneratorConfig::from_lookup(lookup_from(&[
            ("GOOGLE_API_KEY", "g-key"),
            ("GEMINI_API_KEY", "primary"),
        ]))
        .unwrap();
        assert_eq!(config.provider(ProviderId::Gemini).api_key.as_ref().unwrap().expose(), "primary");
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = GeneratorConfig::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "   "),
            ("LLM_PROVIDER", ""),
        ]))
        .unwrap();
        assert!(config.provider(ProviderId::Anthropic).api_key.is_none());
        assert_eq!(config.default_provider, DEFAULT_PROVIDER);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let cases: &[(&str, &str)] = &[
            ("LLM_PROVIDER", "mistral"),
            ("LLM_TEMPERATURE", "warm"),
            ("LLM_TEMPERATURE", "3.5"),
            ("LLM_MAX_TOKENS", "-1"),
            ("LLM_TOP_P", "1.2"),
            ("GEMINI_TIMEOUT", "0"),
            ("OPENAI_BASE_URL", "not a url"),
        ];

        for &(key, value) in cases {
            let result = GeneratorConfig::from_lookup(lookup_from(&[(key, value)]));
            assert!(
                matches!(result, Err(GeneratorError::ConfigError { .. })),
                "{key}={value} should be rejected"
            );
        }
    }
}
