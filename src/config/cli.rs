//! Command-line argument definitions for the harness binary.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

use crate::fixtures::Provider;

/// Command-line interface for the ernest harness.
#[derive(Debug, Parser)]
#[command(name = "ernest-harness")]
#[command(
    author,
    version,
    about = "Drive the ernest CLI and observe its message bus"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Message bus URI.
    #[arg(long, global = true)]
    pub nats_uri: Option<String>,

    /// Ernest instance to target.
    #[arg(long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the ernest CLI once and print its combined output.
    Invoke(InvokeArgs),

    /// Wait for messages on a bus subject and print their payloads.
    Wait(WaitArgs),

    /// Render a definition template for a fresh service name.
    Fixture(FixtureArgs),

    /// Execute a file of scenario steps.
    Steps(StepsArgs),
}

/// Arguments for the `invoke` subcommand.
#[derive(Debug, Parser)]
pub struct InvokeArgs {
    /// Arguments passed to the ernest CLI.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for the `wait` subcommand.
#[derive(Debug, Parser)]
pub struct WaitArgs {
    /// Subject to subscribe to (wildcards allowed).
    #[arg(required = true)]
    pub subject: String,

    /// Number of messages to wait for.
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Per-message timeout in seconds; defaults to the configured wait timeout.
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Provider selector for the `fixture` and `steps` subcommands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// vCloud definitions.
    #[default]
    Vcloud,
    /// AWS definitions.
    Aws,
}

impl From<ProviderArg> for Provider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Vcloud => Self::Vcloud,
            ProviderArg::Aws => Self::Aws,
        }
    }
}

/// Arguments for the `fixture` subcommand.
#[derive(Debug, Parser)]
pub struct FixtureArgs {
    /// Template file name, e.g. `aws1.yml`.
    #[arg(required = true)]
    pub template: String,

    /// Provider directory the template lives in.
    #[arg(long, value_enum, default_value_t = ProviderArg::Vcloud)]
    pub provider: ProviderArg,

    /// Prefix for the generated service name.
    #[arg(long, default_value = "harness")]
    pub prefix: String,
}

/// Arguments for the `steps` subcommand.
#[derive(Debug, Parser)]
pub struct StepsArgs {
    /// Path to the step file.
    #[arg(required = true)]
    pub file: Utf8PathBuf,

    /// Set the target, log in and recreate the `fake` datacenter for this
    /// provider before the script runs.
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,
}
