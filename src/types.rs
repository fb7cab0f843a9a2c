use serde::Deserialize;

// Sentinel container id for records and references that carry no VPC.
// An unknown container never counts as a boundary crossing.
pub const UNKNOWN_VPC: &str = "Unknown VPC";

fn default_name() -> String {
    "Unknown".to_string()
}

fn default_vpc() -> String {
    UNKNOWN_VPC.to_string()
}

fn default_protocol() -> String {
    "-1".to_string()
}

fn default_port() -> i32 {
    -1
}

// One security group record as described by the cloud API (or a cached
// copy of the same response). Every optional field defaults so that
// best-effort data still builds.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityGroupRecord {
    #[serde(rename = "GroupId")]
    pub group_id: String,
    #[serde(rename = "GroupName", default = "default_name")]
    pub group_name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "VpcId", default = "default_vpc")]
    pub vpc_id: String,
    #[serde(rename = "IpPermissions", default)]
    pub permissions: Vec<PermissionRule>,
}

// A single ingress rule: who may reach the owning group, on which ports.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionRule {
    #[serde(rename = "FromPort", default = "default_port")]
    pub from_port: i32,
    #[serde(rename = "ToPort", default = "default_port")]
    pub to_port: i32,
    #[serde(rename = "IpProtocol", default = "default_protocol")]
    pub protocol: String,
    #[serde(rename = "UserIdGroupPairs", default)]
    pub group_references: Vec<GroupReference>,
    #[serde(rename = "IpRanges", default)]
    pub address_ranges: Vec<AddressRange>,
}

// Reference to another security group as a permission source. The target
// may be absent from the record set entirely.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupReference {
    #[serde(rename = "GroupId", default)]
    pub group_id: Option<String>,
    #[serde(rename = "VpcId", default = "default_vpc")]
    pub vpc_id: String,
}

// A CIDR block acting as a permission source.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressRange {
    #[serde(rename = "CidrIp", default)]
    pub cidr: Option<String>,
}

// Node variants for the relationship graph. Security group nodes are keyed
// by group id; address block nodes by their friendly label.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    SecurityGroup {
        id: String,
        name: String,
        description: String,
        vpc_id: String,
        is_highlighted: bool,
    },
    AddressBlock {
        label: String,
    },
}

impl Node {
    pub fn is_security_group(&self) -> bool {
        matches!(self, Node::SecurityGroup { .. })
    }

    pub fn is_address_block(&self) -> bool {
        matches!(self, Node::AddressBlock { .. })
    }
}

// A directed permission edge, pointing from the permission source to the
// group that declared the rule (ingress semantics).
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub label: String,
    // Raw protocol value ("-1" for all); the label carries the display form
    pub protocol: String,
    pub ports: String,
    pub is_cross_vpc: bool,
}
