//! Configuration loading and API key resolution tests
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate KALAKAR_* variables are marked with #[serial].

use kalakar_common::config::{
    load_config, load_toml_config, resolve_api_key, TomlConfig, DEFAULT_PORT, ENV_API_TOKEN,
    ENV_PORT,
};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_toml(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn clear_env() {
    env::remove_var(ENV_PORT);
    env::remove_var(ENV_API_TOKEN);
    env::remove_var("KALAKAR_BIND_ADDRESS");
    env::remove_var("KALAKAR_TEST_GEMINI_KEY");
}

#[test]
fn test_load_full_toml() {
    let file = write_toml(
        r#"
        bind_address = "0.0.0.0"
        port = 8080
        gemini_api_key = "gem-key"
        google_api_key = "gcp-key"

        [logging]
        level = "debug"

        [ai]
        gemini_model = "gemini-pro"
        request_timeout_secs = 20
        generation_requests_per_second = 2

        [auth]
        api_token = "s3cret"
        "#,
    );

    let config = load_toml_config(file.path()).unwrap();
    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.ai.gemini_model, "gemini-pro");
    assert_eq!(config.ai.request_timeout_secs, 20);
    assert_eq!(config.ai.generation_requests_per_second, 2);
    assert_eq!(config.auth.api_token.as_deref(), Some("s3cret"));
    assert_eq!(config.gemini_api_key.as_deref(), Some("gem-key"));
    assert_eq!(config.google_api_key.as_deref(), Some("gcp-key"));
    // Endpoints keep their defaults when not overridden
    assert!(config.ai.vision_endpoint.starts_with("https://vision.googleapis.com"));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let file = write_toml("port = \"not a number\"");
    let err = load_toml_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("Parse TOML failed"));
}

#[test]
#[serial]
fn test_explicit_missing_path_fails() {
    clear_env();
    let result = load_config(Some(std::path::Path::new("/nonexistent/kalakar.toml")), "kalakar-ai");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_env();
    let file = write_toml("port = 9000\n[auth]\napi_token = \"file-token\"\n");

    env::set_var(ENV_PORT, "9100");
    env::set_var(ENV_API_TOKEN, "env-token");

    let config = load_config(Some(file.path()), "kalakar-ai").unwrap();
    assert_eq!(config.port, 9100);
    assert_eq!(config.auth.api_token.as_deref(), Some("env-token"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_port_is_rejected() {
    clear_env();
    env::set_var(ENV_PORT, "seventy");

    let mut config = TomlConfig::default();
    assert!(config.apply_env_overrides().is_err());
    assert_eq!(config.port, DEFAULT_PORT);

    clear_env();
}

#[test]
#[serial]
fn test_api_key_env_has_priority() {
    clear_env();
    env::set_var("KALAKAR_TEST_GEMINI_KEY", "from-env");

    let key = resolve_api_key("Gemini API key", "KALAKAR_TEST_GEMINI_KEY", Some("from-toml")).unwrap();
    assert_eq!(key, "from-env");

    clear_env();
}

#[test]
#[serial]
fn test_api_key_falls_back_to_toml() {
    clear_env();
    let key = resolve_api_key("Gemini API key", "KALAKAR_TEST_GEMINI_KEY", Some(" from-toml ")).unwrap();
    assert_eq!(key, "from-toml");
}

#[test]
#[serial]
fn test_api_key_missing_everywhere() {
    clear_env();
    let err = resolve_api_key("Gemini API key", "KALAKAR_TEST_GEMINI_KEY", Some("   ")).unwrap_err();
    assert!(err.to_string().contains("KALAKAR_TEST_GEMINI_KEY"));
}
