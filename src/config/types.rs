//! Configuration data types for the harness.

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

/// Default bus URI used when nothing else is configured.
pub const DEFAULT_NATS_URI: &str = "nats://127.0.0.1:4222";

/// External CLI configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CliConfig {
    /// Name or path of the ernest CLI binary.
    pub binary: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            binary: String::from("ernest-cli"),
        }
    }
}

/// Message bus timing and buffering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BusConfig {
    /// How long a scenario waits for a single message.
    pub wait_timeout_secs: u64,

    /// How long a control-plane request waits for its reply.
    pub request_timeout_secs: u64,

    /// Default capacity of a subscription queue.
    pub buffer_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: 10,
            request_timeout_secs: 3,
            buffer_capacity: 1,
        }
    }
}

impl BusConfig {
    /// Validates that the timeouts and capacity are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first zero-valued field.
    pub fn validate(&self) -> crate::error::Result<()> {
        let zero_field = [
            ("bus.wait_timeout_secs", self.wait_timeout_secs == 0),
            ("bus.request_timeout_secs", self.request_timeout_secs == 0),
            ("bus.buffer_capacity", self.buffer_capacity == 0),
        ]
        .into_iter()
        .find_map(|(field, is_zero)| is_zero.then_some(field));

        match zero_field {
            Some(field) => Err(crate::error::ConfigError::InvalidValue {
                field: String::from(field),
                reason: String::from("must be greater than zero"),
            }
            .into()),
            None => Ok(()),
        }
    }
}

/// Output assertion configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Enforce sparse expected-line checks against CLI output.
    pub strict: bool,
}

/// Definition fixture locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefinitionsConfig {
    /// Directory holding `vcloud/` and `aws/` template directories.
    pub base_dir: Utf8PathBuf,

    /// Directory rendered definitions are written to. Defaults to a
    /// subdirectory of the system temporary directory.
    pub output_dir: Option<Utf8PathBuf>,
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            base_dir: Utf8PathBuf::from("definitions"),
            output_dir: None,
        }
    }
}

/// Credentials used to open a CLI session before a step file runs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Ernest user name.
    pub user: Option<String>,

    /// Ernest password.
    pub password: Option<String>,
}

impl SessionConfig {
    /// Returns the configured credentials when both halves are present.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.user.as_deref().zip(self.password.as_deref())
    }
}

/// Root harness configuration.
///
/// Loaded from configuration files, environment variables and command-line
/// arguments with layered precedence (lowest to highest): defaults,
/// configuration file, environment variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `ERNEST_HARNESS_CONFIG_PATH`
/// 2. `.ernest-harness.toml` in the current working directory
/// 3. `.ernest-harness.toml` in the home directory
/// 4. `~/.config/ernest-harness/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "ERNEST_HARNESS",
    post_merge_hook,
    discovery(
        app_name = "ernest-harness",
        env_var = "ERNEST_HARNESS_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".ernest-harness.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The message bus URI.
    pub nats_uri: Option<String>,

    /// The ernest instance the CLI should target.
    pub target: Option<String>,

    /// External CLI configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub cli: CliConfig,

    /// Bus timing configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub bus: BusConfig,

    /// Output assertion configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub output: OutputConfig,

    /// Definition fixture locations.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub definitions: DefinitionsConfig,

    /// Login credentials.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// The bus URI, falling back to [`DEFAULT_NATS_URI`].
    #[must_use]
    pub fn nats_uri(&self) -> &str {
        self.nats_uri.as_deref().unwrap_or(DEFAULT_NATS_URI)
    }

    /// Turn blank optional strings into `None`.
    ///
    /// Legacy variables such as `CURRENT_INSTANCE` are commonly exported
    /// empty; an empty target must behave like an absent one.
    pub fn normalise(&mut self) {
        blank_to_none(&mut self.nats_uri);
        blank_to_none(&mut self.target);
        blank_to_none(&mut self.session.user);
        blank_to_none(&mut self.session.password);
    }
}

/// Replace an empty or whitespace-only value with `None`.
fn blank_to_none(value: &mut Option<String>) {
    if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        *value = None;
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        self.normalise();
        Ok(())
    }
}
