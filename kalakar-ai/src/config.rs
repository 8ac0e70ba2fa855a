//! Configuration resolution for kalakar-ai
//!
//! Turns the layered `TomlConfig` (already carrying ENV overrides) into the
//! settings the external AI clients are built from. API keys resolve
//! ENV → TOML; a missing key stops the service at startup.

use kalakar_common::config::{resolve_api_key, TomlConfig};
use kalakar_common::{Error, Result};
use std::num::NonZeroU32;
use std::time::Duration;

/// Environment variable carrying the Gemini API key
pub const ENV_GEMINI_API_KEY: &str = "KALAKAR_GEMINI_API_KEY";

/// Environment variable carrying the Google Cloud API key
pub const ENV_GOOGLE_API_KEY: &str = "KALAKAR_GOOGLE_API_KEY";

/// Resolved settings for the external AI clients
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub gemini_api_key: String,
    pub google_api_key: String,
    pub gemini_model: String,
    pub request_timeout: Duration,
    pub generation_rate: NonZeroU32,
    pub gemini_endpoint: String,
    pub vision_endpoint: String,
    pub speech_endpoint: String,
    pub tts_endpoint: String,
    pub translate_endpoint: String,
}

impl AiSettings {
    /// Resolve settings from the loaded configuration
    pub fn resolve(config: &TomlConfig) -> Result<Self> {
        let gemini_api_key = resolve_api_key(
            "Gemini API key",
            ENV_GEMINI_API_KEY,
            config.gemini_api_key.as_deref(),
        )?;
        let google_api_key = resolve_api_key(
            "Google Cloud API key",
            ENV_GOOGLE_API_KEY,
            config.google_api_key.as_deref(),
        )?;

        if config.ai.request_timeout_secs == 0 {
            return Err(Error::Config(
                "ai.request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let generation_rate = NonZeroU32::new(config.ai.generation_requests_per_second)
            .ok_or_else(|| {
                Error::Config(
                    "ai.generation_requests_per_second must be greater than zero".to_string(),
                )
            })?;

        Ok(Self {
            gemini_api_key,
            google_api_key,
            gemini_model: config.ai.gemini_model.clone(),
            request_timeout: Duration::from_secs(config.ai.request_timeout_secs),
            generation_rate,
            gemini_endpoint: trim_endpoint(&config.ai.gemini_endpoint),
            vision_endpoint: trim_endpoint(&config.ai.vision_endpoint),
            speech_endpoint: trim_endpoint(&config.ai.speech_endpoint),
            tts_endpoint: trim_endpoint(&config.ai.tts_endpoint),
            translate_endpoint: trim_endpoint(&config.ai.translate_endpoint),
        })
    }
}

fn trim_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config_with_keys() -> TomlConfig {
        TomlConfig {
            gemini_api_key: Some("gemini-toml".to_string()),
            google_api_key: Some("google-toml".to_string()),
            ..TomlConfig::default()
        }
    }

    #[test]
    #[serial]
    fn test_resolve_from_toml() {
        std::env::remove_var(ENV_GEMINI_API_KEY);
        std::env::remove_var(ENV_GOOGLE_API_KEY);

        let settings = AiSettings::resolve(&config_with_keys()).unwrap();
        assert_eq!(settings.gemini_api_key, "gemini-toml");
        assert_eq!(settings.google_api_key, "google-toml");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.generation_rate.get(), 10);
    }

    #[test]
    #[serial]
    fn test_env_key_wins() {
        std::env::set_var(ENV_GEMINI_API_KEY, "gemini-env");
        std::env::remove_var(ENV_GOOGLE_API_KEY);

        let settings = AiSettings::resolve(&config_with_keys()).unwrap();
        assert_eq!(settings.gemini_api_key, "gemini-env");

        std::env::remove_var(ENV_GEMINI_API_KEY);
    }

    #[test]
    #[serial]
    fn test_missing_key_is_config_error() {
        std::env::remove_var(ENV_GEMINI_API_KEY);
        std::env::remove_var(ENV_GOOGLE_API_KEY);

        let config = TomlConfig {
            gemini_api_key: Some("gemini-toml".to_string()),
            ..TomlConfig::default()
        };
        assert!(matches!(AiSettings::resolve(&config), Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn test_zero_rate_rejected() {
        std::env::remove_var(ENV_GEMINI_API_KEY);
        std::env::remove_var(ENV_GOOGLE_API_KEY);

        let mut config = config_with_keys();
        config.ai.generation_requests_per_second = 0;
        assert!(AiSettings::resolve(&config).is_err());
    }

    #[test]
    fn test_trim_endpoint() {
        assert_eq!(trim_endpoint(" https://x.test/v1/ "), "https://x.test/v1");
    }
}
