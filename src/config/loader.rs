//! Configuration loading with layered precedence.
//!
//! Precedence order (lowest to highest): application defaults, configuration
//! file, environment variables, command-line arguments.
//!
//! Layers are composed manually with `MergeComposer` because the `Cli`
//! struct owns subcommand dispatch, and because environment variables are
//! validated fail-fast: `ERNEST_HARNESS_BUS_WAIT_TIMEOUT_SECS=soon` is an
//! error rather than a silent fallback to the default.
//!
//! # Legacy environment variables
//!
//! The acceptance environment already exports `NATS_URI`, `CHECK_OUTPUT` and
//! `CURRENT_INSTANCE`. They are honoured as aliases of the prefixed variables;
//! when both are set the prefixed variable wins. `CHECK_OUTPUT` is a flag:
//! any non-empty value enables strict output checking.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Boolean value (`true`/`false`). Invalid values return an error.
    Bool,
    /// Presence flag: any non-empty value means `true`, empty means `false`.
    Flag,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name.
    env_var: &'static str,
    /// The JSON path segments (e.g., `["bus", "wait_timeout_secs"]`).
    path: &'static [&'static str],
    /// The expected value type.
    var_type: EnvVarType,
}

/// Table of all environment variables and their JSON paths.
///
/// Processed in order, so later entries override earlier ones that share a
/// path. Legacy aliases therefore come first.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    // Legacy aliases
    EnvVarSpec {
        env_var: "NATS_URI",
        path: &["nats_uri"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CURRENT_INSTANCE",
        path: &["target"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "CHECK_OUTPUT",
        path: &["output", "strict"],
        var_type: EnvVarType::Flag,
    },
    // Top-level fields
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_NATS_URI",
        path: &["nats_uri"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_TARGET",
        path: &["target"],
        var_type: EnvVarType::String,
    },
    // CLI fields
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_CLI_BINARY",
        path: &["cli", "binary"],
        var_type: EnvVarType::String,
    },
    // Bus fields
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_BUS_WAIT_TIMEOUT_SECS",
        path: &["bus", "wait_timeout_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_BUS_REQUEST_TIMEOUT_SECS",
        path: &["bus", "request_timeout_secs"],
        var_type: EnvVarType::U64,
    },
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_BUS_BUFFER_CAPACITY",
        path: &["bus", "buffer_capacity"],
        var_type: EnvVarType::U64,
    },
    // Output fields
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_OUTPUT_STRICT",
        path: &["output", "strict"],
        var_type: EnvVarType::Bool,
    },
    // Definition fields
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_DEFINITIONS_BASE_DIR",
        path: &["definitions", "base_dir"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_DEFINITIONS_OUTPUT_DIR",
        path: &["definitions", "output_dir"],
        var_type: EnvVarType::String,
    },
    // Session fields
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_SESSION_USER",
        path: &["session", "user"],
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "ERNEST_HARNESS_SESSION_PASSWORD",
        path: &["session", "password"],
        var_type: EnvVarType::String,
    },
];

/// Returns the list of environment variable names recognised by the loader.
///
/// Tests use this to clear every variable that could leak into a run.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
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

/// Load configuration with full layer precedence from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if configuration loading fails due to a malformed
/// configuration file, an invalid typed environment variable, or invalid bus
/// settings after merge.
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &mockable::DefaultEnv::new())
}

/// Load configuration reading environment variables through `env`.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with_env<E: mockable::Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    // Layer 1: Defaults.
    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Configuration file.
    let config_path: Option<Utf8PathBuf> =
        cli.config.clone().filter(|p| p.exists()).or_else(|| {
            let discovery = ConfigDiscovery::builder("ernest-harness")
                .env_var("ERNEST_HARNESS_CONFIG_PATH")
                .config_file_name("config.toml")
                .dotfile_name(".ernest-harness.toml")
                .build();
            discovery
                .candidates()
                .into_iter()
                .filter(|p| p.exists())
                .find_map(|p| Utf8PathBuf::try_from(p).ok())
        });

    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    // Layer 3: Environment variables.
    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    // Layer 4: CLI overrides.
    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let mut config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.normalise();
    config.bus.validate()?;

    Ok(config)
}

/// Parse one raw environment value according to its specification.
fn parse_env_value(spec: &EnvVarSpec, raw_value: String) -> Result<Value> {
    let value = match spec.var_type {
        EnvVarType::String => Value::String(raw_value),
        EnvVarType::Flag => Value::Bool(!raw_value.trim().is_empty()),
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
        EnvVarType::U64 => match raw_value.parse::<u64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => {
                return Err(ConfigError::InvalidValue {
                    field: spec.env_var.to_owned(),
                    reason: format!("expected unsigned integer, got '{raw_value}'"),
                }
                .into());
            }
        },
    };
    Ok(value)
}

/// Collect recognised environment variables into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed variable has an
/// unparseable value.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };
        let json_value = parse_env_value(spec, raw_value)?;
        insert_at_path(&mut root, spec.path, json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map, creating parents as needed.
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
fn build_cli_overrides(cli: &Cli) -> serde_json::Value {
    let mut overrides = serde_json::Map::new();

    if let Some(ref uri) = cli.nats_uri {
        overrides.insert("nats_uri".to_owned(), serde_json::Value::String(uri.clone()));
    }

    if let Some(ref target) = cli.target {
        overrides.insert("target".to_owned(), serde_json::Value::String(target.clone()));
    }

    if overrides.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::Value::Object(overrides)
    }
}
