//! Configuration loading and config file resolution
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments (--config, --port)
//! 2. Environment variables (FEEDMIX_CONFIG, FEEDMIX_GEMINI_API_KEY)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! A missing TOML file is not fatal: a warning is logged and defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "FEEDMIX_CONFIG";

/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for post rewriting
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";

/// Default model for image re-rendering
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Bootstrap configuration loaded from TOML
///
/// Every field has a built-in default, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Gemini API key (ENV takes priority, see `resolve_gemini_api_key` in feedmix-ai)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,

    /// Base URL of the generative service
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Model used by the text transform client
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used by the image transform client
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Per-request timeout for outbound HTTP calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: default_gemini_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            request_timeout_secs: default_request_timeout_secs(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load from a file path
    ///
    /// Missing file → defaults plus a warning. Unreadable or malformed file → error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file not found at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Resolve the config file path
///
/// Priority: CLI argument → FEEDMIX_CONFIG → platform config dir.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: OS-dependent default location
    dirs::config_dir()
        .map(|d| d.join("feedmix").join("feedmix.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}
