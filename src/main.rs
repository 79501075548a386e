//! `ernest-harness` application entry point.
//!
//! Uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/ernest-harness/config.toml` or path from
//!    `ERNEST_HARNESS_CONFIG_PATH`)
//! 3. Environment variables (`ERNEST_HARNESS_*`, plus `NATS_URI`,
//!    `CHECK_OUTPUT` and `CURRENT_INSTANCE`)
//! 4. Command-line arguments

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use ernest_harness::bus::{MessageBus, NatsBus};
use ernest_harness::config::{
    AppConfig, Cli, Commands, FixtureArgs, InvokeArgs, StepsArgs, WaitArgs, load_config,
};
use ernest_harness::error::Result as HarnessResult;
use ernest_harness::fixtures::{DefinitionLibrary, ServiceName};
use ernest_harness::invoker::CliInvoker;
use ernest_harness::steps::{ScenarioContext, read_script};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Loads configuration, then dispatches to the subcommand handler. The
/// process exit code mirrors the CLI's for `invoke`.
fn main() -> EyreResult<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli).map_err(Report::from)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(&cli, &config)).map_err(Report::from)
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute the subcommand, returning domain-specific errors.
async fn run(cli: &Cli, config: &AppConfig) -> HarnessResult<ExitCode> {
    match &cli.command {
        Commands::Invoke(args) => invoke(config, args),
        Commands::Wait(args) => wait(config, args).await,
        Commands::Fixture(args) => fixture(config, args),
        Commands::Steps(args) => steps(config, args).await,
    }
}

async fn connect(config: &AppConfig) -> HarnessResult<Arc<dyn MessageBus>> {
    let request_timeout = Duration::from_secs(config.bus.request_timeout_secs);
    let bus = NatsBus::connect(config.nats_uri(), request_timeout).await?;
    Ok(Arc::new(bus))
}

/// Run the CLI once and echo its combined output.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn invoke(config: &AppConfig, args: &InvokeArgs) -> HarnessResult<ExitCode> {
    let invocation = CliInvoker::from_config(&config.cli).invoke(args.args.iter().cloned())?;
    print!("{}", invocation.output());

    let code = invocation.outcome().exit_code();
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}

/// Print the payloads of the next `count` messages on a subject.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn wait(config: &AppConfig, args: &WaitArgs) -> HarnessResult<ExitCode> {
    let bus = connect(config).await?;
    let timeout = Duration::from_secs(args.timeout.unwrap_or(config.bus.wait_timeout_secs));
    let capacity = args.count.max(config.bus.buffer_capacity);

    let mut subscription = bus.subscribe(&args.subject, capacity).await?;
    for _ in 0..args.count {
        let message = subscription.wait(timeout).await?;
        println!("{} {}", message.subject, message.payload_text());
    }
    subscription.unsubscribe();
    Ok(ExitCode::SUCCESS)
}

/// Render a definition for a fresh service name and print its path.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn fixture(config: &AppConfig, args: &FixtureArgs) -> HarnessResult<ExitCode> {
    let library = DefinitionLibrary::from_config(&config.definitions)?;
    let service = ServiceName::generate(&args.prefix);
    let path = library.resolve(args.provider.into(), &args.template, &service)?;
    println!("{service} {path}");
    Ok(ExitCode::SUCCESS)
}

/// Run a step script against the configured CLI and bus.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
async fn steps(config: &AppConfig, args: &StepsArgs) -> HarnessResult<ExitCode> {
    let script = read_script(&args.file)?;
    let bus = connect(config).await?;
    let mut context = ScenarioContext::new(config, CliInvoker::from_config(&config.cli), bus);
    if let Some(provider) = args.provider {
        context.basic_setup(provider.into()).await?;
    } else if context.login_configured()? {
        tracing::info!("logged in with configured session credentials");
    }

    let executed = context.run_script(&script).await?;
    println!("{executed} steps passed");
    Ok(ExitCode::SUCCESS)
}
