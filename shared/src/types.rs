//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::errors::{SharedError, SharedResult};

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Process identifier for the binaries in the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// One-shot command line generator
    Generator,
    /// HTTP adapter process
    WebServer,
}

impl ProcessId {
    /// Initialize the global process ID for the command line generator
    pub fn init_generator() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Generator)
    }

    /// Initialize the global process ID for the webserver
    pub fn init_webserver() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::WebServer)
    }

    /// Get the global process ID, or the generator id when none was initialized
    pub fn current() -> &'static ProcessId {
        static UNINITIALIZED: ProcessId = ProcessId::Generator;
        PROCESS_ID.get().unwrap_or(&UNINITIALIZED)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Generator => write!(f, "generator"),
            ProcessId::WebServer => write!(f, "webserver"),
        }
    }
}

/// LLM providers available in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAI,
    Anthropic,
    Gemini,
    /// Self-hosted Ollama instance
    Ollama,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::OpenAI,
        ProviderId::Anthropic,
        ProviderId::Gemini,
        ProviderId::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Gemini => "gemini",
            ProviderId::Ollama => "ollama",
        }
    }

    /// Prefix used for this provider's environment variables
    pub fn env_prefix(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "OPENAI",
            ProviderId::Anthropic => "ANTHROPIC",
            ProviderId::Gemini => "GEMINI",
            ProviderId::Ollama => "OLLAMA",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAI),
            "anthropic" => Ok(ProviderId::Anthropic),
            "gemini" | "google" => Ok(ProviderId::Gemini),
            "ollama" | "local" => Ok(ProviderId::Ollama),
            _ => Err(SharedError::UnknownProvider { name: s.to_string() }),
        }
    }
}

/// Opaque provider secret. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Build a credential from an optional raw value, ignoring blanks
    pub fn from_optional(secret: Option<&str>) -> Option<Self> {
        secret
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Fully resolved sampling parameters sent to a provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 0.9,
        }
    }
}

impl SamplingParams {
    /// Check every value is inside the range providers accept
    pub fn validate(&self) -> SharedResult<()> {
        validate_temperature(self.temperature)?;
        validate_max_tokens(self.max_tokens)?;
        validate_top_p(self.top_p)
    }
}

/// Per-call sampling values; anything left unset falls back to the defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingOverrides {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
}

impl SamplingOverrides {
    /// Overlay these values onto `defaults`
    pub fn resolve(&self, defaults: &SamplingParams) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            top_p: self.top_p.unwrap_or(defaults.top_p),
        }
    }

    pub fn validate(&self) -> SharedResult<()> {
        if let Some(temperature) = self.temperature {
            validate_temperature(temperature)?;
        }
        if let Some(max_tokens) = self.max_tokens {
            validate_max_tokens(max_tokens)?;
        }
        if let Some(top_p) = self.top_p {
            validate_top_p(top_p)?;
        }
        Ok(())
    }
}

fn validate_temperature(value: f64) -> SharedResult<()> {
    if (0.0..=2.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid("temperature", value))
    }
}

fn validate_max_tokens(value: u32) -> SharedResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(invalid("max_tokens", value))
    }
}

fn validate_top_p(value: f64) -> SharedResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid("top_p", value))
    }
}

fn invalid(field: &str, value: impl fmt::Display) -> SharedError {
    SharedError::InvalidSampling {
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Token usage information reported by a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
