//! Control-plane records exchanged on `service.*`, `group.*`, `user.*` and
//! `datacenter.*` subjects.

use serde::{Deserialize, Serialize};

/// Announced on `service.create` when a build starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCreated {
    /// Build identifier.
    pub id: String,
}

/// Published on `service.patch` or `service.set` to change a build status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceStatusPatch {
    /// Build identifier.
    pub id: String,
    /// New status.
    pub status: String,
}

impl ServiceStatusPatch {
    /// Mark build `id` as errored.
    #[must_use]
    pub fn errored(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: String::from("errored"),
        }
    }
}

/// Group record for `group.set` and `group.del`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPayload {
    /// Group name.
    pub name: String,
}

/// User record for `user.set` and `user.del`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    /// User name.
    pub username: String,
    /// Password, sent only when creating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Datacenter record for `datacenter.set` and `datacenter.del`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatacenterPayload {
    /// Datacenter name.
    pub name: String,
    /// Datacenter type, sent only when deleting.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Service record for `service.del`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDeletion {
    /// Service name.
    pub name: String,
    /// Datacenter type.
    #[serde(rename = "type")]
    pub kind: String,
}
