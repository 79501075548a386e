use serde::{Deserialize, Serialize};

/// Credentials used to reach the execution endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOptions {
    /// Endpoint user.
    pub user: String,
    /// Endpoint password.
    pub password: String,
}

/// A command execution or bootstrap run on instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionEvent {
    /// Owning service identifier.
    pub service: String,
    /// Execution endpoint address.
    pub service_end_point: String,
    /// Execution name.
    pub name: String,
    /// Execution type, e.g. `salt`.
    pub execution_type: String,
    /// Command payload.
    pub execution_payload: String,
    /// Target expression.
    pub execution_target: String,
    /// Endpoint credentials.
    pub service_options: ServiceOptions,
    /// Lifecycle status.
    pub status: String,
}
