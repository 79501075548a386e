//! Configuration system for the ernest harness.
//!
//! Configuration loading and precedence merging is handled by the
//! `ortho_config` crate: CLI flags override environment variables, which
//! override configuration files, which override defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! nats_uri = "nats://127.0.0.1:4222"
//! target = "https://ernest.local"
//!
//! [cli]
//! binary = "ernest-cli"
//!
//! [bus]
//! wait_timeout_secs = 10
//! request_timeout_secs = 3
//! buffer_capacity = 1
//!
//! [output]
//! strict = false
//!
//! [definitions]
//! base_dir = "definitions"
//!
//! [session]
//! user = "ci_admin"
//! password = "secret"
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{Cli, Commands, FixtureArgs, InvokeArgs, ProviderArg, StepsArgs, WaitArgs};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::{
    AppConfig, BusConfig, CliConfig, DEFAULT_NATS_URI, DefinitionsConfig, OutputConfig,
    SessionConfig,
};
