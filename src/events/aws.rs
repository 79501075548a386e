//! AWS resource events.

use serde::{Deserialize, Serialize};

/// AWS datacenter credentials and location carried by every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsDatacenter {
    /// Region, e.g. `eu-west-1`.
    pub datacenter_region: String,
    /// Secret access key.
    pub datacenter_access_token: String,
    /// Access key id.
    pub datacenter_access_key: String,
    /// VPC identifier.
    pub datacenter_vpc_id: String,
}

/// An AWS subnet event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsNetworkEvent {
    /// Connector type, e.g. `aws-fake`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: AwsDatacenter,
    /// Subnet CIDR.
    pub network_subnet: String,
    /// Subnet identifier assigned by AWS.
    pub network_aws_id: String,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}

/// An AWS EC2 instance event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsInstanceEvent {
    /// Connector type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: AwsDatacenter,
    /// Instance name.
    pub instance_name: String,
    /// AMI identifier.
    pub instance_image: String,
    /// Instance type, e.g. `e1.micro`.
    pub instance_type: String,
    /// Subnet identifier.
    pub network_aws_id: String,
    /// Attached security group identifiers.
    pub security_group_aws_ids: Vec<String>,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}

/// One security group rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroupRule {
    /// Source or destination CIDR.
    pub ip: String,
    /// First port of the range.
    #[serde(alias = "from")]
    pub from_port: u16,
    /// Last port of the range.
    #[serde(alias = "to")]
    pub to_port: u16,
    /// Protocol, e.g. `tcp`.
    pub protocol: String,
}

/// Ingress and egress rule lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroupRules {
    /// Inbound rules in definition order.
    pub ingress: Vec<SecurityGroupRule>,
    /// Outbound rules in definition order.
    pub egress: Vec<SecurityGroupRule>,
}

/// An AWS security group event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsFirewallEvent {
    /// Connector type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: AwsDatacenter,
    /// Security group name.
    pub security_group_name: String,
    /// Rules.
    pub security_group_rules: SecurityGroupRules,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}

/// One load balancer listener.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElbListener {
    /// Listening port.
    pub from_port: u16,
    /// Instance port.
    pub to_port: u16,
    /// Protocol.
    pub protocol: String,
    /// Certificate ARN for TLS listeners.
    pub ssl_cert: String,
}

/// An elastic load balancer event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElbEvent {
    /// Connector type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: AwsDatacenter,
    /// Load balancer name.
    pub name: String,
    /// Whether the balancer is internal.
    pub is_private: bool,
    /// Listeners in definition order.
    pub listeners: Vec<ElbListener>,
    /// Instance names behind the balancer.
    pub instances: Vec<String>,
    /// Instance identifiers behind the balancer.
    pub instance_aws_ids: Vec<String>,
    /// Subnet names.
    pub networks: Vec<String>,
    /// Subnet identifiers.
    pub network_aws_ids: Vec<String>,
    /// Security group names.
    pub security_groups: Vec<String>,
    /// Security group identifiers.
    pub security_group_aws_ids: Vec<String>,
    /// Public DNS name.
    pub dns_name: String,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}

/// One S3 access grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Grantee {
    /// Grantee identifier.
    pub id: String,
    /// Grantee type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Granted permissions.
    pub permissions: String,
}

/// An S3 bucket event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Event {
    /// Connector type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Datacenter identity.
    #[serde(flatten)]
    pub datacenter: AwsDatacenter,
    /// Bucket name.
    pub name: String,
    /// Canned ACL.
    pub acl: String,
    /// Bucket region.
    pub bucket_location: String,
    /// Bucket URI.
    pub bucket_uri: String,
    /// Grants in definition order.
    pub grantees: Vec<S3Grantee>,
    /// Owning service identifier.
    pub service: String,
    /// Lifecycle status.
    pub status: String,
}
