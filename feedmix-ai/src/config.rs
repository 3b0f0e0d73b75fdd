//! Configuration resolution for feedmix-ai
//!
//! Provides two-tier API key resolution with ENV → TOML priority.

use feedmix_common::config::TomlConfig;
use feedmix_common::{Error, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::services::GeminiSettings;

/// Environment variables checked for the Gemini key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["FEEDMIX_GEMINI_API_KEY", "GEMINI_API_KEY"];

/// Resolve the Gemini API key
///
/// **Priority:** ENV → TOML
pub fn resolve_gemini_api_key(toml_config: &TomlConfig) -> Result<String> {
    let env_key = API_KEY_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|k| is_valid_key(k)));
    let toml_key = toml_config
        .gemini_api_key
        .as_ref()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!("Gemini API key found in both environment and TOML. Using environment (highest priority).");
    }

    if let Some(key) = env_key {
        info!("Gemini API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("Gemini API key loaded from TOML config");
        return Ok(key.clone());
    }

    Err(Error::Config(
        "Gemini API key not configured. Please configure using one of:\n\
         1. Environment: FEEDMIX_GEMINI_API_KEY=your-key-here\n\
         2. TOML config: ~/.config/feedmix/feedmix.toml (gemini_api_key = \"your-key\")"
            .to_string(),
    ))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Client settings from the TOML config and a resolved key
pub fn gemini_settings(toml_config: &TomlConfig, api_key: String) -> GeminiSettings {
    GeminiSettings {
        api_key,
        base_url: toml_config.gemini_base_url.clone(),
        timeout: Duration::from_secs(toml_config.request_timeout_secs),
    }
}
