//! vCloud resource events.

use serde::{Deserialize, Serialize};

use super::Status;

/// vCloud datacenter credentials and location carried by every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcloudDatacenter {
    /// Datacenter name.
    pub datacenter_name: String,
    /// Datacenter user.
    pub datacenter_username: String,
    /// Datacenter password.
    pub datacenter_password: String,
    /// Datacenter region.
    pub datacenter_region: String,
    /// Datacenter type, e.g. `vcloud-fake`.
    pub datacenter_type: String,
}

/// A vCloud network was created or deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkEvent {
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: VcloudDatacenter,
    /// Network type.
    pub network_type: String,
    /// Network name.
    pub network_name: String,
    /// Network CIDR, e.g. `10.1.0.0/24`.
    pub network_subnet: String,
    /// Gateway address.
    pub network_gateway: String,
    /// Netmask.
    pub network_netmask: String,
    /// First assignable address.
    pub network_start_address: String,
    /// Last assignable address.
    pub network_end_address: String,
    /// Router the network hangs off.
    pub router_name: String,
    /// Router type.
    pub router_type: String,
    /// Router address.
    pub router_ip: String,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}

/// One attached disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disk {
    /// Disk slot.
    pub id: u32,
    /// Size in megabytes.
    pub size: u64,
}

/// Compute shape of an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceResource {
    /// Virtual CPU count.
    pub cpus: u32,
    /// Memory in megabytes.
    pub ram: u64,
    /// Assigned address.
    pub ip: String,
    /// Source catalog.
    pub catalog: String,
    /// Source image.
    pub image: String,
    /// Attached disks in definition order.
    pub disks: Vec<Disk>,
}

/// A vCloud instance lifecycle event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceEvent {
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: VcloudDatacenter,
    /// Instance name, e.g. `<service>-web-1`.
    pub instance_name: String,
    /// Instance type.
    pub instance_type: String,
    /// Compute shape.
    pub resource: InstanceResource,
    /// Network the instance is attached to.
    pub network_name: String,
    /// Router name.
    pub router_name: String,
    /// Router type.
    pub router_type: String,
    /// Router address.
    pub router_ip: String,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}

impl InstanceEvent {
    /// Lifecycle status.
    #[must_use]
    pub fn status(&self) -> Status {
        Status::from(self.status.as_str())
    }
}

/// One firewall rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallRule {
    /// Source address or `any`.
    pub source_ip: String,
    /// Source port or `any`.
    pub source_port: String,
    /// Destination address or `any`.
    pub destination_ip: String,
    /// Destination port or `any`.
    pub destination_port: String,
    /// Protocol, e.g. `tcp`.
    pub protocol: String,
}

/// A vShield Edge firewall event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallEvent {
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: VcloudDatacenter,
    /// Firewall type.
    pub firewall_type: String,
    /// Rules in definition order.
    pub rules: Vec<FirewallRule>,
    /// Router name.
    pub router_name: String,
    /// Router type.
    pub router_type: String,
    /// Router address.
    pub router_ip: String,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}

/// One NAT translation rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatRule {
    /// Network the rule applies to.
    pub network: String,
    /// Original address.
    pub origin_ip: String,
    /// Original port.
    pub origin_port: String,
    /// Translated address.
    pub translation_ip: String,
    /// Translated port.
    pub translation_port: String,
    /// `snat` or `dnat`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Protocol.
    pub protocol: String,
}

/// A NAT rule set event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatEvent {
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: VcloudDatacenter,
    /// NAT rule set name.
    pub nat_name: String,
    /// Rules in definition order.
    pub nat_rules: Vec<NatRule>,
    /// Router name.
    pub router_name: String,
    /// Router type.
    pub router_type: String,
    /// Router address.
    pub router_ip: String,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}

/// A vShield Edge router event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterEvent {
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: VcloudDatacenter,
    /// Router name.
    pub router_name: String,
    /// Router type.
    pub router_type: String,
    /// vCloud client name.
    pub client_name: String,
    /// vCloud API endpoint.
    pub vcloud_url: String,
    /// vShield Edge API endpoint.
    pub vse_url: String,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}
