//! Semantic error types for the ernest harness.
//!
//! Semantic error enums (via `thiserror`) cover the conditions a scenario
//! might inspect: a CLI that could not be spawned, a bus wait that timed out,
//! a payload that failed to decode, an assertion that did not hold. Opaque
//! errors (`eyre::Report`) are reserved for the binary boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while invoking the external ernest CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// The CLI binary could not be started.
    #[error("failed to start '{binary}': {message}")]
    SpawnFailed {
        /// The binary that was invoked.
        binary: String,
        /// A description of the spawn failure.
        message: String,
    },

    /// Output could not be read back from the child process.
    #[error("failed to capture output from '{binary}': {message}")]
    CaptureFailed {
        /// The binary that was invoked.
        binary: String,
        /// A description of the capture failure.
        message: String,
    },

    /// The CLI ran but exited with a non-zero status.
    #[error("'{binary}' exited with status {code}")]
    NonZeroExit {
        /// The binary that was invoked.
        binary: String,
        /// The exit code.
        code: i32,
    },

    /// The CLI was terminated by a signal.
    #[error("'{binary}' was terminated by a signal")]
    Terminated {
        /// The binary that was invoked.
        binary: String,
    },
}

/// Errors raised by the message bus.
#[derive(Debug, Error)]
pub enum BusError {
    /// Failed to connect to the bus.
    #[error("failed to connect to message bus at {uri}: {message}")]
    ConnectionFailed {
        /// The bus URI.
        uri: String,
        /// A description of the connection failure.
        message: String,
    },

    /// Failed to register interest in a subject.
    #[error("failed to subscribe to '{subject}': {message}")]
    SubscribeFailed {
        /// The subject.
        subject: String,
        /// A description of the failure.
        message: String,
    },

    /// Failed to publish a message.
    #[error("failed to publish to '{subject}': {message}")]
    PublishFailed {
        /// The subject.
        subject: String,
        /// A description of the failure.
        message: String,
    },

    /// A request received no reply.
    #[error("request on '{subject}' failed: {message}")]
    RequestFailed {
        /// The subject.
        subject: String,
        /// A description of the failure.
        message: String,
    },

    /// No message arrived within the allotted time.
    #[error("timed out after {millis} ms waiting for a message on '{subject}'")]
    Timeout {
        /// The subject being waited on.
        subject: String,
        /// The timeout in milliseconds.
        millis: u128,
    },

    /// The subscription was closed before a message arrived.
    #[error("subscription to '{subject}' closed")]
    Closed {
        /// The subject.
        subject: String,
    },

    /// A payload could not be decoded into the expected event.
    #[error("failed to decode message on '{subject}': {message}")]
    DecodeFailed {
        /// The subject the message arrived on.
        subject: String,
        /// A description of the decode failure.
        message: String,
    },

    /// A payload could not be encoded.
    #[error("failed to encode payload for '{subject}': {message}")]
    EncodeFailed {
        /// The subject the payload was destined for.
        subject: String,
        /// A description of the encode failure.
        message: String,
    },
}

/// Errors raised while preparing definition fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The template does not declare a top-level `name:` key.
    #[error("definition template '{path}' has no top-level name key")]
    MissingServiceName {
        /// The template path.
        path: PathBuf,
    },
}

/// Errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// A file or directory was not found.
    #[error("path not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Permission denied when accessing a path.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error at '{path}': {message}")]
    IoError {
        /// The path where the error occurred.
        path: PathBuf,
        /// A description of the I/O error.
        message: String,
    },
}

impl FilesystemError {
    /// Classify an I/O error at `path`.
    #[must_use]
    pub fn from_io(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path_buf = path.into();
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path: path_buf },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path: path_buf },
            _ => Self::IoError {
                path: path_buf,
                message: error.to_string(),
            },
        }
    }
}

/// Errors raised while parsing or executing scenario steps.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepError {
    /// No step template matches the text.
    #[error("no step matches '{text}'")]
    UnknownStep {
        /// The unmatched step text.
        text: String,
    },

    /// A captured argument could not be converted.
    #[error("invalid argument '{value}' in step '{text}': {reason}")]
    InvalidArgument {
        /// The step text.
        text: String,
        /// The captured value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An assertion step needs a CLI invocation but none was recorded.
    #[error("no CLI invocation has been recorded in this scenario")]
    NoInvocation,

    /// An assertion did not hold.
    #[error("assertion failed: {message}")]
    AssertionFailed {
        /// A description of the failed assertion.
        message: String,
    },

    /// A build finished in the `errored` state.
    #[error("service build '{id}' errored")]
    ServiceErrored {
        /// Build identifier.
        id: String,
    },
}

/// Top-level error type for the harness.
///
/// Aggregates all domain-specific errors. At the binary boundary these are
/// converted to `eyre::Report`.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while invoking the CLI.
    #[error(transparent)]
    Cli(#[from] CliError),

    /// An error occurred on the message bus.
    #[error(transparent)]
    Bus(#[from] BusError),

    /// An error occurred while preparing fixtures.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// An error occurred during filesystem operations.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// A scenario step failed.
    #[error(transparent)]
    Step(#[from] StepError),
}

/// A specialised `Result` type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
