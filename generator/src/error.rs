//! Generator error types

use shared::{ProviderId, SharedError};
use std::fmt;
use thiserror::Error;

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Classification of an outbound provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    Timeout,
    Transport,
    MalformedResponse,
}

impl ProviderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::Transport => "transport",
            ProviderErrorKind::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform failure of a provider call, whatever the backend
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{provider} request failed ({kind}): {message}")]
pub struct ProviderError {
    pub provider: ProviderId,
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(provider: ProviderId, kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            provider,
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::Timeout, message)
    }

    pub fn transport(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::Transport, message)
    }

    pub fn malformed(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorKind::MalformedResponse, message)
    }
}

/// Generator error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeneratorError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Unknown provider: {name}")]
    UnknownProvider { name: String },

    #[error("No credential available for provider {provider}")]
    MissingCredential { provider: ProviderId },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl GeneratorError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }

    /// Machine-readable kind, stable across releases
    pub fn kind(&self) -> &'static str {
        match self {
            GeneratorError::InvalidInput { .. } => "invalid_input",
            GeneratorError::UnknownProvider { .. } => "unknown_provider",
            GeneratorError::MissingCredential { .. } => "missing_credential",
            GeneratorError::Provider(_) => "provider_error",
            GeneratorError::ConfigError { .. } => "config",
        }
    }
}

impl From<SharedError> for GeneratorError {
    fn from(error: SharedError) -> Self {
        match error {
            SharedError::UnknownProvider { name } => GeneratorError::UnknownProvider { name },
            other @ SharedError::InvalidSampling { .. } => GeneratorError::invalid_input(other.to_string()),
        }
    }
}
