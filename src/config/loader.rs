//! Configuration loading with layered precedence.
//!
//! This module provides functions to load configuration with the precedence order
//! (lowest to highest): application defaults, configuration file, environment
//! variables, command-line arguments.
//!
//! # Why manual layer composition?
//!
//! The `OrthoConfig` derive provides `load()`, but it expects to own the whole
//! command line. Here the `Cli` struct owns subcommand dispatch while
//! `TransportConfig` holds only configuration values, so layers are composed
//! with `MergeComposer` directly. This also lets typed environment variables
//! fail fast instead of being silently ignored.
//!
//! # Environment variable handling
//!
//! Environment variables with unparseable values (e.g., `DOCKHAND_TLS_VERIFY=maybe`
//! instead of `true`/`false`) return an error immediately. String fields such as
//! `DOCKHAND_SOCKET` are always accepted. `DOCKHAND_EXEC_ENV_VARIABLES` is a
//! comma-separated list of `NAME=VALUE` entries.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{Cli, TransportConfig};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
    /// Comma-separated list of strings.
    List,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name (e.g., `DOCKHAND_SOCKET`).
    env_var: &'static str,
    /// The JSON path segments (e.g., `["tls", "verify"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    // Top-level fields
    EnvVarSpec {
        env_var: "DOCKHAND_BINARY",
        path: &["binary"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_SOCKET",
        path: &["socket"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_USERNAME",
        path: &["username"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_TEMP_DIR",
        path: &["temp_dir"],
        var_type: EnvVarType::String,
    },
    // TLS fields
    EnvVarSpec {
        env_var: "DOCKHAND_TLS_ENABLED",
        path: &["tls", "enabled"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_TLS_VERIFY",
        path: &["tls", "verify"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_TLS_CACERT",
        path: &["tls", "cacert"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_TLS_CERT",
        path: &["tls", "cert"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_TLS_KEY",
        path: &["tls", "key"],
        var_type: EnvVarType::String,
    },
    // Exec fields
    EnvVarSpec {
        env_var: "DOCKHAND_EXEC_INTERACTIVE",
        path: &["exec", "interactive"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_EXEC_PRIVILEGED",
        path: &["exec", "privileged"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_EXEC_TTY",
        path: &["exec", "tty"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_EXEC_DETACH",
        path: &["exec", "detach"],
        var_type: EnvVarType::Bool,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_EXEC_WORKING_DIR",
        path: &["exec", "working_dir"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "DOCKHAND_EXEC_ENV_VARIABLES",
        path: &["exec", "env_variables"],
        var_type: EnvVarType::List,
    },
];

/// Returns the list of environment variable names recognised by the config loader.
///
/// Tests use this to clear every `DOCKHAND_*` variable before loading.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
///
/// Uses `cap_std::fs_utf8` for capability-oriented filesystem access.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration from the process environment with full layer
/// precedence.
///
/// # Errors
///
/// See [`load_config_with_env`].
pub fn load_config(cli: &Cli) -> Result<TransportConfig> {
    load_config_with_env(cli, &mockable::DefaultEnv::new())
}

/// Load configuration with full layer precedence.
///
/// 1. Application defaults
/// 2. Configuration file (`--config`, or discovered via `DOCKHAND_CONFIG_PATH`
///    and XDG paths)
/// 3. Environment variables prefixed with `DOCKHAND_`, read from `env`
/// 4. Command-line arguments
///
/// Later sources override earlier ones. A `--config` path that does not exist
/// is an error.
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to:
/// - A missing or malformed configuration file
/// - Invalid typed environment variable values
pub fn load_config_with_env<E: mockable::Env>(cli: &Cli, env: &E) -> Result<TransportConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(TransportConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path = match &cli.config {
        Some(path) if path.exists() => Some(path.clone()),
        Some(path) => {
            return Err(ConfigError::FileNotFound {
                path: path.clone().into_std_path_buf(),
            }
            .into());
        }
        None => discover_config_file(),
    };

    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config = TransportConfig::merge_from_layers(composer.layers())
        .map_err(ConfigError::OrthoConfig)?;

    Ok(config)
}

fn discover_config_file() -> Option<Utf8PathBuf> {
    ConfigDiscovery::builder("dockhand")
        .env_var("DOCKHAND_CONFIG_PATH")
        .config_file_name("config.toml")
        .dotfile_name(".dockhand.toml")
        .build()
        .candidates()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| Utf8PathBuf::try_from(p).ok())
}

/// Collect `DOCKHAND_*` environment variables into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a boolean variable has an
/// unparseable value.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::Bool => match raw_value.parse::<bool>() {
                Ok(b) => Value::Bool(b),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected bool (true/false), got '{raw_value}'"),
                    }
                    .into());
                }
            },
            EnvVarType::List => Value::Array(
                raw_value
                    .split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(|entry| Value::String(entry.to_owned()))
                    .collect(),
            ),
        };

        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map.
///
/// For a path like `["tls", "verify"]`, this creates the intermediate `tls`
/// object if needed and inserts `verify` within it.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(field.to_owned(), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref socket) = cli.socket {
        overrides.insert("socket".to_owned(), Value::String(socket.clone()));
    }

    if let Some(ref binary) = cli.binary {
        overrides.insert("binary".to_owned(), Value::String(binary.clone()));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
