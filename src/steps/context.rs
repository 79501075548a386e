//! Per-scenario execution state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{Step, parse_script};
use crate::bus::{ControlSubject, MessageBus, Subscription, publish_json, request_json};
use crate::config::AppConfig;
use crate::error::{BusError, CliError, ConfigError, HarnessError, StepError};
use crate::events::{
    DatacenterPayload, GroupPayload, ServiceDeletion, ServiceStatusPatch, Status, UserPayload,
};
use crate::fixtures::Provider;
use crate::invoker::{CliInvoker, CommandRunner, Invocation, SystemRunner, split_args};
use crate::output::{self, ExpectedLines, OutputPolicy};

/// Datacenter type sent with datacenter and service deletions.
const DELETION_TYPE: &str = "aws";

/// Datacenter recreated by [`ScenarioContext::basic_setup`].
const SETUP_DATACENTER: &str = "fake";

/// Password given to users recreated by the `exists` step.
const DEFAULT_USER_PASSWORD: &str = "pwd";

/// State owned by one scenario.
///
/// Each context has its own CLI invoker, bus handle and last invocation, so
/// independent contexts can run side by side.
pub struct ScenarioContext<R = SystemRunner> {
    invoker: CliInvoker<R>,
    bus: Arc<dyn MessageBus>,
    target_override: Option<String>,
    session: Option<(String, String)>,
    wait_timeout: Duration,
    request_timeout: Duration,
    buffer_capacity: usize,
    policy: OutputPolicy,
    last: Option<Invocation>,
}

impl<R> std::fmt::Debug for ScenarioContext<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("target_override", &self.target_override)
            .field("wait_timeout", &self.wait_timeout)
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> ScenarioContext<R> {
    /// Create a context from configuration, an invoker and a bus.
    #[must_use]
    pub fn new(config: &AppConfig, invoker: CliInvoker<R>, bus: Arc<dyn MessageBus>) -> Self {
        Self {
            invoker,
            bus,
            target_override: config.target.clone(),
            session: config
                .session
                .credentials()
                .map(|(user, password)| (String::from(user), String::from(password))),
            wait_timeout: Duration::from_secs(config.bus.wait_timeout_secs),
            request_timeout: Duration::from_secs(config.bus.request_timeout_secs),
            buffer_capacity: config.bus.buffer_capacity,
            policy: OutputPolicy {
                strict: config.output.strict,
            },
            last: None,
        }
    }

    /// Override the control-plane request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the per-message wait timeout.
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// How long a scenario waits for one bus message.
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// The bus this context talks to.
    #[must_use]
    pub fn bus(&self) -> &Arc<dyn MessageBus> {
        &self.bus
    }

    /// Run the CLI and record the invocation, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `CliError` when the CLI cannot be run at all.
    pub fn invoke<I, S>(&mut self, args: I) -> Result<&Invocation, CliError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = self.invoker.invoke(args)?;
        if let Some(error) = invocation.error() {
            info!(%error, "CLI reported an error; continuing");
        }
        Ok(self.last.insert(invocation))
    }

    /// The most recent invocation, if any.
    #[must_use]
    pub const fn last_invocation(&self) -> Option<&Invocation> {
        self.last.as_ref()
    }

    /// Output of the most recent invocation.
    ///
    /// # Errors
    ///
    /// Returns `StepError::NoInvocation` before the first invocation.
    pub fn last_output(&self) -> Result<&str, StepError> {
        self.last
            .as_ref()
            .map(Invocation::output)
            .ok_or(StepError::NoInvocation)
    }

    /// Check the last output against pinned lines, if strict checking is on.
    ///
    /// # Errors
    ///
    /// Returns `StepError` when there is no output or a pinned line differs.
    pub fn verify_output(&self, expected: &ExpectedLines) -> Result<(), StepError> {
        self.policy.verify(self.last_output()?, expected)
    }

    /// Subscribe with the configured queue capacity.
    ///
    /// # Errors
    ///
    /// Returns the bus's subscribe error.
    pub async fn subscribe(&self, subject: &str) -> Result<Subscription, BusError> {
        self.bus.subscribe(subject, self.buffer_capacity).await
    }

    /// Subscribe with an explicit queue capacity.
    ///
    /// # Errors
    ///
    /// Returns the bus's subscribe error.
    pub async fn subscribe_with_capacity(
        &self,
        subject: &str,
        capacity: usize,
    ) -> Result<Subscription, BusError> {
        self.bus.subscribe(subject, capacity).await
    }

    /// Wait up to the configured timeout for the next event on
    /// `subscription` and decode it.
    ///
    /// # Errors
    ///
    /// Returns `BusError::Timeout` when nothing arrives and
    /// `BusError::DecodeFailed` when the payload is not a `T`.
    pub async fn wait_event<T: DeserializeOwned>(
        &self,
        subscription: &mut Subscription,
    ) -> Result<T, BusError> {
        subscription.wait_event(self.wait_timeout).await
    }

    /// Consume status patches from `subscription` until one is terminal.
    ///
    /// Intermediate statuses such as `processing` are skipped.
    ///
    /// # Errors
    ///
    /// Returns `StepError::ServiceErrored` when the build errored, or the bus
    /// error when a patch does not arrive in time.
    pub async fn wait_until_done(
        &self,
        subscription: &mut Subscription,
    ) -> Result<Status, HarnessError> {
        loop {
            let patch: ServiceStatusPatch = self.wait_event(subscription).await?;
            let status = Status::from(patch.status.as_str());
            debug!(id = %patch.id, ?status, "service status");
            if status.is_failed() {
                return Err(StepError::ServiceErrored { id: patch.id }.into());
            }
            if status.is_terminal() {
                return Ok(status);
            }
        }
    }

    /// Prepare a scenario against `provider`.
    ///
    /// Points the CLI at the configured target, logs in with the session
    /// credentials and recreates the `fake` datacenter for the provider.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when no target is configured,
    /// or `CliError` when the CLI cannot be run.
    pub async fn basic_setup(&mut self, provider: Provider) -> Result<(), HarnessError> {
        let target = self
            .target_override
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired {
                field: String::from("target"),
            })?;
        self.invoke([String::from("target"), target])?;
        if !self.login_configured()? {
            warn!("no session credentials configured; skipping login");
        }
        self.ensure_datacenter(SETUP_DATACENTER, provider.dir_name())
            .await;
        info!(provider = provider.dir_name(), "scenario setup complete");
        Ok(())
    }

    /// Publish an `errored` status for build `id` on `service.set`.
    ///
    /// # Errors
    ///
    /// Returns the bus's publish error.
    pub async fn mark_service_errored(&self, id: &str) -> Result<(), BusError> {
        publish_json(
            self.bus.as_ref(),
            ControlSubject::ServiceSet.as_str(),
            &ServiceStatusPatch::errored(id),
        )
        .await
    }

    /// Send a control-plane request and ignore the outcome.
    async fn control_request<T: Serialize + Sync>(&self, subject: ControlSubject, payload: &T) {
        match request_json(self.bus.as_ref(), subject.as_str(), payload, self.request_timeout).await
        {
            Ok(reply) => debug!(subject = %subject, reply = %reply.payload_text(), "control request answered"),
            Err(error) => warn!(subject = %subject, %error, "control request failed; continuing"),
        }
    }

    /// Log in with the configured session credentials.
    ///
    /// Returns `false` without running the CLI when no credentials are
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns `CliError` when the CLI cannot be run.
    pub fn login_configured(&mut self) -> Result<bool, CliError> {
        let Some((user, password)) = self.session.clone() else {
            return Ok(false);
        };
        self.login(&user, &password)?;
        Ok(true)
    }

    fn login(&mut self, user: &str, password: &str) -> Result<(), CliError> {
        self.invoke(["login", "--user", user, "--password", password])?;
        Ok(())
    }

    /// Parse and execute one step.
    ///
    /// # Errors
    ///
    /// Returns `StepError` for unknown steps and failed assertions, and
    /// `CliError` when the CLI cannot be run.
    pub async fn run_text(&mut self, text: &str) -> Result<(), HarnessError> {
        let step = Step::parse(text)?;
        self.execute(&step).await
    }

    /// Execute every step of a script, stopping at the first failure.
    ///
    /// Returns the number of steps executed.
    ///
    /// # Errors
    ///
    /// Returns the failing step's error, annotated with its line number in
    /// the log.
    pub async fn run_script(&mut self, script: &str) -> Result<usize, HarnessError> {
        let lines = parse_script(script);
        for line in &lines {
            info!(line = line.number, step = %line.text, "step");
            if let Err(error) = self.run_text(&line.text).await {
                warn!(line = line.number, step = %line.text, %error, "step failed");
                return Err(error);
            }
        }
        Ok(lines.len())
    }

    /// Execute one step.
    ///
    /// # Errors
    ///
    /// Returns `StepError` for failed assertions and `CliError` when the CLI
    /// cannot be run. Control-plane failures are logged, not returned.
    pub async fn execute(&mut self, step: &Step) -> Result<(), HarnessError> {
        debug!(?step, "executing step");
        match step {
            Step::Target(target) => {
                let chosen = self.target_override.clone().unwrap_or_else(|| target.clone());
                self.invoke([String::from("target"), chosen])?;
            }
            Step::Login { user, password } => self.login(user, password)?,
            Step::Run(line) => {
                self.invoke(split_args(line))?;
            }
            Step::Logout => {
                self.invoke(["logout"])?;
            }
            Step::EnterText(input) => {
                self.invoke([input.as_str()])?;
            }
            Step::GroupAbsent(name) => self.delete_group(name).await,
            Step::UserAbsent(name) => self.delete_user(name).await,
            Step::DatacenterAbsent(name) => self.delete_datacenter(name, DELETION_TYPE).await,
            Step::ServiceAbsent(name) => self.delete_service(name).await,
            Step::GroupExists(name) => self.ensure_group(name).await,
            Step::UserExists(name) => self.ensure_user(name).await,
            Step::DatacenterExists(name) => self.ensure_datacenter(name, DELETION_TYPE).await,
            Step::OutputContains(needle) => output::contains(self.last_output()?, needle)?,
            Step::OutputNotContains(needle) => output::not_contains(self.last_output()?, needle)?,
            Step::UserInGroup { user, group } => {
                output::table_row(self.last_output()?, user, group)?;
            }
            Step::DatacenterInGroup { datacenter, group } => {
                output::table_row(self.last_output()?, datacenter, group)?;
            }
            Step::LineContains { number, needle } => {
                output::line_contains(self.last_output()?, *number, needle)?;
            }
        }
        Ok(())
    }

    async fn delete_service(&self, name: &str) {
        let payload = ServiceDeletion {
            name: String::from(name),
            kind: String::from(DELETION_TYPE),
        };
        self.control_request(ControlSubject::ServiceDelete, &payload)
            .await;
    }

    async fn ensure_group(&self, name: &str) {
        self.delete_group(name).await;
        let payload = GroupPayload {
            name: String::from(name),
        };
        self.control_request(ControlSubject::GroupSet, &payload).await;
    }

    async fn ensure_user(&self, name: &str) {
        self.delete_user(name).await;
        let payload = UserPayload {
            username: String::from(name),
            password: Some(String::from(DEFAULT_USER_PASSWORD)),
        };
        self.control_request(ControlSubject::UserSet, &payload).await;
    }

    /// Delete datacenter `name` of type `kind`, then create it again.
    async fn ensure_datacenter(&self, name: &str, kind: &str) {
        self.delete_datacenter(name, kind).await;
        let payload = DatacenterPayload {
            name: String::from(name),
            kind: None,
        };
        self.control_request(ControlSubject::DatacenterSet, &payload)
            .await;
    }

    async fn delete_group(&self, name: &str) {
        let payload = GroupPayload {
            name: String::from(name),
        };
        self.control_request(ControlSubject::GroupDelete, &payload)
            .await;
    }

    async fn delete_user(&self, name: &str) {
        let payload = UserPayload {
            username: String::from(name),
            password: None,
        };
        self.control_request(ControlSubject::UserDelete, &payload)
            .await;
    }

    async fn delete_datacenter(&self, name: &str, kind: &str) {
        let payload = DatacenterPayload {
            name: String::from(name),
            kind: Some(String::from(kind)),
        };
        self.control_request(ControlSubject::DatacenterDelete, &payload)
            .await;
    }
}

