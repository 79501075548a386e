//! Bus subject names used by the orchestrator.
//!
//! Resource events follow `<resource>.<action>.<connector>`, for example
//! `network.create.aws-fake`. Control-plane subjects are two segments,
//! for example `service.create` or `group.del`.

use std::fmt;
use std::str::FromStr;

/// Kind of resource an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Networks and subnets.
    Network,
    /// Virtual machine instances.
    Instance,
    /// Firewalls and security groups.
    Firewall,
    /// NAT rule sets.
    Nat,
    /// vShield Edge routers.
    Router,
    /// Elastic load balancers.
    Elb,
    /// S3 buckets.
    S3,
    /// Command executions on instances.
    Execution,
    /// Instance bootstrap executions.
    Bootstrap,
}

impl ResourceKind {
    const ALL: [Self; 9] = [
        Self::Network,
        Self::Instance,
        Self::Firewall,
        Self::Nat,
        Self::Router,
        Self::Elb,
        Self::S3,
        Self::Execution,
        Self::Bootstrap,
    ];

    /// The subject segment for this resource.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Instance => "instance",
            Self::Firewall => "firewall",
            Self::Nat => "nat",
            Self::Router => "router",
            Self::Elb => "elb",
            Self::S3 => "s3",
            Self::Execution => "execution",
            Self::Bootstrap => "bootstrap",
        }
    }
}

/// Lifecycle action an event announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// The resource is being created.
    Create,
    /// The resource is being updated.
    Update,
    /// The resource is being deleted.
    Delete,
}

impl Action {
    const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Delete];

    /// The subject segment for this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Datacenter connector a resource event is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Connector {
    /// The fake AWS connector used in acceptance runs.
    AwsFake,
    /// The fake vCloud connector used in acceptance runs.
    VcloudFake,
    /// The provider-neutral fake connector used for executions.
    Fake,
    /// Any other connector name.
    Other(String),
}

impl Connector {
    /// The subject segment for this connector.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AwsFake => "aws-fake",
            Self::VcloudFake => "vcloud-fake",
            Self::Fake => "fake",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Connector {
    fn from(value: &str) -> Self {
        match value {
            "aws-fake" => Self::AwsFake,
            "vcloud-fake" => Self::VcloudFake,
            "fake" => Self::Fake,
            other => Self::Other(String::from(other)),
        }
    }
}

/// A fully qualified resource event subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceSubject {
    /// The resource segment.
    pub kind: ResourceKind,
    /// The action segment.
    pub action: Action,
    /// The connector segment.
    pub connector: Connector,
}

impl ResourceSubject {
    /// Build a subject from its three segments.
    #[must_use]
    pub const fn new(kind: ResourceKind, action: Action, connector: Connector) -> Self {
        Self {
            kind,
            action,
            connector,
        }
    }

    /// Wildcard matching every action and connector for `kind`.
    #[must_use]
    pub fn all_for(kind: ResourceKind) -> String {
        format!("{}.>", kind.as_str())
    }
}

impl fmt::Display for ResourceSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.kind.as_str(),
            self.action.as_str(),
            self.connector.as_str()
        )
    }
}

/// Error returned when a string is not a resource subject.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a <resource>.<action>.<connector> subject")]
pub struct InvalidSubject(pub String);

impl FromStr for ResourceSubject {
    type Err = InvalidSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidSubject(String::from(s));
        let mut segments = s.splitn(3, '.');
        let (Some(kind_segment), Some(action_segment), Some(connector_segment)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(invalid());
        };

        let kind = ResourceKind::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == kind_segment)
            .ok_or_else(invalid)?;
        let action = Action::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == action_segment)
            .ok_or_else(invalid)?;
        if connector_segment.is_empty() || connector_segment.contains('.') {
            return Err(invalid());
        }

        Ok(Self::new(kind, action, Connector::from(connector_segment)))
    }
}

/// Control-plane subjects the harness publishes or listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlSubject {
    /// A service build was created.
    ServiceCreate,
    /// A service build status changed.
    ServicePatch,
    /// Overwrite a service record.
    ServiceSet,
    /// Delete a service record.
    ServiceDelete,
    /// Create or update a group.
    GroupSet,
    /// Delete a group.
    GroupDelete,
    /// Create or update a user.
    UserSet,
    /// Delete a user.
    UserDelete,
    /// Create or update a datacenter.
    DatacenterSet,
    /// Delete a datacenter.
    DatacenterDelete,
}

impl ControlSubject {
    /// The subject string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServiceCreate => "service.create",
            Self::ServicePatch => "service.patch",
            Self::ServiceSet => "service.set",
            Self::ServiceDelete => "service.del",
            Self::GroupSet => "group.set",
            Self::GroupDelete => "group.del",
            Self::UserSet => "user.set",
            Self::UserDelete => "user.del",
            Self::DatacenterSet => "datacenter.set",
            Self::DatacenterDelete => "datacenter.del",
        }
    }
}

impl fmt::Display for ControlSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `subject` matches the subscription `pattern`.
///
/// `*` matches exactly one token and `>` matches one or more trailing tokens.
#[must_use]
pub fn subject_matches(pattern: &str, subject: &str) -> bool {
    let mut pattern_tokens = pattern.split('.');
    let mut subject_tokens = subject.split('.');

    loop {
        match (pattern_tokens.next(), subject_tokens.next()) {
            (Some(">"), Some(_)) => return pattern_tokens.next().is_none(),
            (Some("*"), Some(_)) => {}
            (Some(expected), Some(actual)) if expected == actual => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
