//! Event payloads published by the orchestrator.
//!
//! These are passive wire-format records decoded from bus messages. JSON
//! keys are snake_case and every field defaults when absent, so a partial
//! payload decodes and assertions compare whatever was sent.

mod aws;
mod control;
mod execution;
mod vcloud;

pub use aws::{
    AwsDatacenter, AwsFirewallEvent, AwsInstanceEvent, AwsNetworkEvent, ElbEvent, ElbListener,
    S3Event, S3Grantee, SecurityGroupRule, SecurityGroupRules,
};
pub use control::{
    DatacenterPayload, GroupPayload, ServiceCreated, ServiceDeletion, ServiceStatusPatch,
    UserPayload,
};
pub use execution::{ExecutionEvent, ServiceOptions};
pub use vcloud::{
    Disk, FirewallEvent, FirewallRule, InstanceEvent, InstanceResource, NatEvent, NatRule,
    NetworkEvent, RouterEvent, VcloudDatacenter,
};

/// Lifecycle status carried by resource events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// No status reported yet. Treated as terminal.
    Unset,
    /// The resource is still being provisioned.
    Processing,
    /// Provisioning finished.
    Completed,
    /// Provisioning failed.
    Errored,
    /// Any other status string.
    Other(String),
}

impl Status {
    /// Whether no further status change is expected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Unset | Self::Completed | Self::Errored)
    }

    /// Whether provisioning failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Errored)
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match value {
            "" => Self::Unset,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "errored" => Self::Errored,
            other => Self::Other(String::from(other)),
        }
    }
}
