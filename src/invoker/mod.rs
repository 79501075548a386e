//! Invocation of the external ernest CLI.
//!
//! The CLI is run synchronously with stdin closed. Standard output and
//! standard error share one pipe, so the captured text interleaves the two
//! streams in the order the child wrote them. A non-zero exit is recorded
//! in the returned [`Invocation`] rather than raised; only a failure to run
//! the binary at all is an error.
//!
//! Process spawning sits behind the [`CommandRunner`] trait so callers can
//! substitute a scripted runner in tests.

use std::io::Read;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::config::CliConfig;
use crate::error::CliError;

/// Raw result of running a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    /// Interleaved stdout and stderr bytes.
    pub combined: Vec<u8>,

    /// Exit code, or `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

/// Behaviour required to run a program and capture its combined output.
pub trait CommandRunner {
    /// Run `program` with `args` to completion.
    ///
    /// # Errors
    ///
    /// Returns `CliError::SpawnFailed` when the program cannot be started and
    /// `CliError::CaptureFailed` when its output cannot be read.
    fn run(&self, program: &str, args: &[String]) -> Result<RawOutput, CliError>;
}

/// Runs programs as child processes of the harness.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<RawOutput, CliError> {
        let capture_failed = |error: &std::io::Error| CliError::CaptureFailed {
            binary: String::from(program),
            message: error.to_string(),
        };

        let (mut reader, writer) = std::io::pipe().map_err(|e| capture_failed(&e))?;
        let stderr_writer = writer.try_clone().map_err(|e| capture_failed(&e))?;

        // The command owns the parent's copies of the write end; it must be
        // dropped before reading or `read_to_end` never sees EOF.
        let mut child = {
            let mut command = Command::new(program);
            command
                .args(args)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(stderr_writer);
            command.spawn().map_err(|e| CliError::SpawnFailed {
                binary: String::from(program),
                message: e.to_string(),
            })?
        };

        let mut combined = Vec::new();
        let read_result = reader.read_to_end(&mut combined);
        let status = child.wait().map_err(|e| capture_failed(&e))?;
        read_result.map_err(|e| capture_failed(&e))?;

        Ok(RawOutput {
            combined,
            code: status.code(),
        })
    }
}

/// How a CLI invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The CLI exited with status zero.
    Success,
    /// The CLI exited with a non-zero status.
    CommandExit {
        /// The exit code.
        code: i32,
    },
    /// The CLI was killed by a signal.
    Terminated,
}

impl CommandOutcome {
    const fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::Success,
            Some(status) => Self::CommandExit { code: status },
            None => Self::Terminated,
        }
    }

    /// Process exit code to report for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::CommandExit { code } => code,
            Self::Terminated => 1,
        }
    }
}

/// A completed CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    binary: String,
    args: Vec<String>,
    output: String,
    outcome: CommandOutcome,
}

impl Invocation {
    /// The arguments the CLI was run with.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Combined stdout and stderr text.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Output split on newlines. A trailing newline yields a final empty line.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        crate::output::split_lines(&self.output)
    }

    /// How the invocation ended.
    #[must_use]
    pub const fn outcome(&self) -> CommandOutcome {
        self.outcome
    }

    /// Whether the CLI exited with status zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, CommandOutcome::Success)
    }

    /// The execution error for an unsuccessful invocation.
    #[must_use]
    pub fn error(&self) -> Option<CliError> {
        match self.outcome {
            CommandOutcome::Success => None,
            CommandOutcome::CommandExit { code } => Some(CliError::NonZeroExit {
                binary: self.binary.clone(),
                code,
            }),
            CommandOutcome::Terminated => Some(CliError::Terminated {
                binary: self.binary.clone(),
            }),
        }
    }
}

/// Runs the configured ernest CLI binary.
#[derive(Debug, Clone)]
pub struct CliInvoker<R = SystemRunner> {
    binary: String,
    runner: R,
}

impl CliInvoker<SystemRunner> {
    /// Create an invoker that spawns `binary` as a child process.
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self::with_runner(binary, SystemRunner)
    }

    /// Create an invoker for the binary named in `[cli]` configuration.
    #[must_use]
    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(config.binary.clone())
    }
}

impl<R: CommandRunner> CliInvoker<R> {
    /// Create an invoker backed by a custom runner.
    #[must_use]
    pub fn with_runner(binary: impl Into<String>, runner: R) -> Self {
        Self {
            binary: binary.into(),
            runner,
        }
    }

    /// The binary this invoker runs.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run the CLI once with `args`.
    ///
    /// # Errors
    ///
    /// Returns `CliError` when the binary cannot be started or its output
    /// cannot be captured. A non-zero exit is not an error; inspect
    /// [`Invocation::outcome`] instead.
    pub fn invoke<I, S>(&self, arguments: I) -> Result<Invocation, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = arguments.into_iter().map(Into::into).collect();
        debug!(binary = %self.binary, ?args, "invoking CLI");

        let raw = self.runner.run(&self.binary, &args)?;
        let outcome = CommandOutcome::from_code(raw.code);
        if let Some(code) = raw.code.filter(|status| *status != 0) {
            warn!(binary = %self.binary, code, "CLI exited with non-zero status");
        } else if raw.code.is_none() {
            warn!(binary = %self.binary, "CLI terminated by signal");
        }

        Ok(Invocation {
            binary: self.binary.clone(),
            args,
            output: String::from_utf8_lossy(&raw.combined).into_owned(),
            outcome,
        })
    }
}

/// Split a command line into CLI arguments on whitespace.
///
/// Runs of whitespace never produce empty arguments.
#[must_use]
pub fn split_args(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}
