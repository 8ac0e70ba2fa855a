//! Configuration loading and API key resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line arguments (applied by the service binary)
//! 2. Environment variables (`KALAKAR_*`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! API keys never have a compiled default: a key missing from both the
//! environment and the TOML file is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default HTTP port for kalakar-ai
pub const DEFAULT_PORT: u16 = 5730;

/// Environment variable overriding the bind address
pub const ENV_BIND_ADDRESS: &str = "KALAKAR_BIND_ADDRESS";

/// Environment variable overriding the port
pub const ENV_PORT: &str = "KALAKAR_PORT";

/// Environment variable overriding the bearer token
pub const ENV_API_TOKEN: &str = "KALAKAR_API_TOKEN";

/// Bootstrap configuration loaded from TOML file
///
/// Every field has a default so an empty file (or no file) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Interface to bind the HTTP server to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// External AI service settings
    #[serde(default)]
    pub ai: AiConfig,

    /// API authentication settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// Gemini (generative text) API key
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Google Cloud API key for Vision, Speech, Text-to-Speech and Translate
    #[serde(default)]
    pub google_api_key: Option<String>,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            logging: LoggingConfig::default(),
            ai: AiConfig::default(),
            auth: AuthConfig::default(),
            gemini_api_key: None,
            google_api_key: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// External AI service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Gemini model used for listing, story and intent generation
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Per-call timeout for every external AI request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Shared quota for generative calls across all requests
    #[serde(default = "default_generation_rps")]
    pub generation_requests_per_second: u32,

    #[serde(default = "default_gemini_endpoint")]
    pub gemini_endpoint: String,

    #[serde(default = "default_vision_endpoint")]
    pub vision_endpoint: String,

    #[serde(default = "default_speech_endpoint")]
    pub speech_endpoint: String,

    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,

    #[serde(default = "default_translate_endpoint")]
    pub translate_endpoint: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_model: default_gemini_model(),
            request_timeout_secs: default_request_timeout_secs(),
            generation_requests_per_second: default_generation_rps(),
            gemini_endpoint: default_gemini_endpoint(),
            vision_endpoint: default_vision_endpoint(),
            speech_endpoint: default_speech_endpoint(),
            tts_endpoint: default_tts_endpoint(),
            translate_endpoint: default_translate_endpoint(),
        }
    }
}

/// API authentication settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token required on authenticated routes (None disables auth)
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_generation_rps() -> u32 {
    10
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_vision_endpoint() -> String {
    "https://vision.googleapis.com/v1".to_string()
}

fn default_speech_endpoint() -> String {
    "https://speech.googleapis.com/v1".to_string()
}

fn default_tts_endpoint() -> String {
    "https://texttospeech.googleapis.com/v1".to_string()
}

fn default_translate_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

/// Default TOML path for a module: `<config_dir>/kalakar/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("kalakar").join(format!("{}.toml", module_name)))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// Load configuration for a module
///
/// An explicit path must exist. Without one, the platform default path is
/// used when present, otherwise compiled defaults apply. Environment
/// overrides are applied last.
pub fn load_config(explicit_path: Option<&Path>, module_name: &str) -> Result<TomlConfig> {
    let mut config = match explicit_path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_toml_config(path)?
        }
        None => match default_config_path(module_name).filter(|p| p.exists()) {
            Some(path) => {
                info!("Loading config from {}", path.display());
                load_toml_config(&path)?
            }
            None => {
                info!("No config file found, using compiled defaults");
                TomlConfig::default()
            }
        },
    };

    config.apply_env_overrides()?;
    Ok(config)
}

impl TomlConfig {
    /// Apply `KALAKAR_*` environment overrides on top of file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(bind) = std::env::var(ENV_BIND_ADDRESS) {
            if !bind.trim().is_empty() {
                self.bind_address = bind.trim().to_string();
            }
        }

        if let Ok(port) = std::env::var(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("{} is not a valid port: {}", ENV_PORT, e)))?;
        }

        if let Ok(token) = std::env::var(ENV_API_TOKEN) {
            if is_valid_key(&token) {
                self.auth.api_token = Some(token);
            }
        }

        Ok(())
    }
}

/// Resolve an API key from environment or TOML
///
/// **Priority:** ENV → TOML. Warns when both sources carry a key.
pub fn resolve_api_key(
    key_name: &str,
    env_var: &str,
    toml_value: Option<&str>,
) -> Result<String> {
    let env_key = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_key = toml_value.filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "{} found in environment and TOML. Using environment (highest priority).",
            key_name
        );
    }

    if let Some(key) = env_key {
        info!("{} loaded from environment variable", key_name);
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_key {
        info!("{} loaded from TOML config", key_name);
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "{} not configured. Set {} or add it to the TOML config file.",
        key_name, env_var
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
