//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use ortho_config::MergeComposer;
use rstest::fixture;

use crate::config::TransportConfig;

/// Fixture providing a `TransportConfig` parsed from a full TOML example.
#[fixture]
pub fn transport_config_from_full_toml() -> TransportConfig {
    let toml = r#"
        binary = "/usr/local/bin/docker"
        socket = "tcp://build-host:2376"
        username = "tester"
        temp_dir = "/var/tmp"

        [tls]
        enabled = true
        verify = true
        cacert = "/certs/ca.pem"
        cert = "/certs/cert.pem"
        key = "/certs/key.pem"

        [exec]
        interactive = true
        privileged = true
        tty = true
        detach = false
        working_dir = "/app"
        env_variables = ["A=1", "B=2"]
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing a `TransportConfig` parsed from a minimal TOML example.
#[fixture]
pub fn transport_config_from_partial_toml() -> TransportConfig {
    let toml = r#"
        socket = "unix:///tmp/docker.sock"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(TransportConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `TransportConfig`.
pub fn merge_config(
    composer: MergeComposer,
) -> Result<TransportConfig, Arc<ortho_config::OrthoError>> {
    TransportConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &TransportConfig) {
    assert!(config.binary.is_none(), "binary should be None");
    assert!(config.socket.is_none(), "socket should be None");
    assert!(config.username.is_none(), "username should be None");
    assert!(config.temp_dir.is_none(), "temp_dir should be None");
    assert!(!config.tls.enabled, "tls.enabled should be false");
    assert!(!config.tls.verify, "tls.verify should be false");
    assert!(!config.exec.privileged, "exec.privileged should be false");
    assert!(
        config.exec.env_variables.is_empty(),
        "exec.env_variables should be empty"
    );
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for
/// testing layer precedence.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "socket": "unix:///from/file.sock",
            "username": "file-user"
        }),
        None,
    );

    composer.push_environment(json!({
        "socket": "unix:///from/env.sock"
    }));

    Ok(composer)
}
