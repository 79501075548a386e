//! Shared fixtures and helper functions for config tests.

use crate::config::AppConfig;
use ortho_config::MergeComposer;
use rstest::fixture;
use std::sync::Arc;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        nats_uri = "nats://bus.internal:4222"
        target = "https://ernest.internal"

        [cli]
        binary = "/usr/local/bin/ernest-cli"

        [bus]
        wait_timeout_secs = 30
        request_timeout_secs = 5
        buffer_capacity = 3

        [output]
        strict = true

        [definitions]
        base_dir = "/srv/definitions"
        output_dir = "/tmp/rendered"

        [session]
        user = "ci_admin"
        password = "secret"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        nats_uri = "nats://bus.internal:4222"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(config.nats_uri.is_none(), "nats_uri should be None");
    assert!(config.target.is_none(), "target should be None");
    assert_eq!(config.cli.binary, "ernest-cli", "cli.binary should be ernest-cli");
    assert_eq!(config.bus.wait_timeout_secs, 10);
    assert_eq!(config.bus.request_timeout_secs, 3);
    assert_eq!(config.bus.buffer_capacity, 1);
    assert!(!config.output.strict, "output.strict should be false");
    assert_eq!(config.definitions.base_dir.as_str(), "definitions");
    assert!(config.definitions.output_dir.is_none());
    assert!(config.session.credentials().is_none());
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for
/// precedence tests.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "nats_uri": "nats://from-file:4222",
            "target": "https://file.ernest"
        }),
        None,
    );

    composer.push_environment(json!({
        "nats_uri": "nats://from-env:4222"
    }));

    Ok(composer)
}
