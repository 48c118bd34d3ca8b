//! Configuration file loading and the `chatrelay config` template
//!
//! Verifies template generation, file loading, and that configuration
//! errors keep their underlying cause for diagnosis.

use chatrelay::cli::generate_config_template;
use chatrelay::config::{Config, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use chatrelay::error::AppError;
use std::error::Error;
use std::fs;
use std::str::FromStr;
use tempfile::TempDir;

/// Helper to create temporary directory for file operations
fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

// ─────────────────────────────────────────────────────────────────────────────
// Template
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_generated_template_loads_as_default_config() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, generate_config_template()).expect("Failed to write template");

    let config =
        Config::from_file(&config_path).expect("Generated template should load as valid Config");

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert!(config.server.cors_allowed_origins.is_empty());
    assert_eq!(config.upstream.base_url(), DEFAULT_BASE_URL);
    assert_eq!(config.upstream.model(), DEFAULT_MODEL);
    assert_eq!(config.upstream.api_key_env(), DEFAULT_API_KEY_ENV);
    assert_eq!(config.upstream.timeout_seconds(), None);
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn test_template_file_content_matches_generation() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");

    let template = generate_config_template();
    fs::write(&config_path, template).expect("Failed to write template");

    let content = fs::read_to_string(&config_path).expect("Failed to read back");
    assert_eq!(content, template);
}

#[test]
fn test_template_documents_credential_handling() {
    let template = generate_config_template();
    assert!(template.contains("api_key_env"));
    assert!(template.contains("environment"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_partial_file_fills_defaults() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[upstream]
model = "deepseek/deepseek-r1:free"
"#,
    )
    .unwrap();

    let config = Config::from_file(&config_path).expect("partial config should load");

    assert_eq!(config.upstream.model(), "deepseek/deepseek-r1:free");
    assert_eq!(config.upstream.base_url(), DEFAULT_BASE_URL);
    assert_eq!(config.server.port, 3000);
}

#[test]
fn test_load_without_path_uses_defaults() {
    let config = Config::load(None).expect("defaults should load");
    assert_eq!(config.upstream.model(), DEFAULT_MODEL);
}

#[test]
fn test_load_with_missing_explicit_file_fails() {
    let temp_dir = create_temp_dir();
    let missing = temp_dir.path().join("missing.toml");

    let result = Config::load(Some(missing.as_path()));

    assert!(matches!(result, Err(AppError::ConfigFileRead { .. })));
}

#[test]
fn test_invalid_values_report_path_and_reason() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[upstream]
timeout_seconds = 0
"#,
    )
    .unwrap();

    let err = Config::from_file(&config_path).expect_err("zero timeout should be rejected");
    match err {
        AppError::ConfigValidationFailed { path, reason } => {
            assert!(path.ends_with("config.toml"));
            assert!(reason.contains("timeout_seconds"));
        }
        other => panic!("expected ConfigValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_config_never_deserializes_a_key() {
    // An api key in the file is not a recognised field and is simply ignored;
    // the credential only ever comes from the environment.
    let config = Config::from_str(
        r#"
[upstream]
api_key = "sk-or-should-not-be-here"
"#,
    )
    .expect("unknown fields are ignored");
    let serialized = toml::to_string(&config).unwrap();
    assert!(!serialized.contains("sk-or-should-not-be-here"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error context
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_file_read_error_preserves_io_error() {
    let result = Config::from_file("/nonexistent/path/to/config.toml");
    let err = result.expect_err("Reading nonexistent file should fail");

    let err_string = err.to_string();
    assert!(
        err_string.contains("/nonexistent/path/to/config.toml"),
        "Error should include the file path, got: {}",
        err_string
    );

    let source = err.source().expect("Should have source error");
    assert!(
        source.is::<std::io::Error>(),
        "Source error should be io::Error, got: {:?}",
        source
    );
}

#[test]
fn test_config_parse_error_preserves_toml_error() {
    let invalid_toml = r#"
this is [[[[ not valid toml
it has {{{{ broken syntax
"#;

    let err = Config::from_str(invalid_toml).expect_err("Parsing invalid TOML should fail");

    let source = err.source().expect("Should have source error");
    assert!(
        source.is::<toml::de::Error>(),
        "Source error should be toml::de::Error, got: {:?}",
        source
    );
}
