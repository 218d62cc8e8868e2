//! Tests for generator services
//!
//! Provider clients are exercised against a mocked transport; the real
//! transport is exercised against a local wiremock server.

pub mod providers;

use std::time::Duration;

use shared::ProviderId;

use crate::config::ProviderConfig;

/// Provider config pointed at a local test base URL
pub fn test_config(provider: ProviderId, api_key: Option<&str>) -> ProviderConfig {
    let config = ProviderConfig::defaults_for(provider)
        .with_base_url("http://llm.test")
        .with_timeout(Duration::from_secs(5));
    match api_key {
        Some(key) => config.with_api_key(key),
        None => config,
    }
}
