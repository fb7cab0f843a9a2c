use ipnetwork::IpNetwork;
use std::net::Ipv6Addr;
use tracing::error;

use crate::config::MapperConfig;

/// Turn a CIDR block into a human-readable label.
///
/// Exact matches against the configured name table win, then valid blocks
/// are classified as private or public. Anything that fails to parse (or
/// parses but is neither, e.g. multicast) passes through unchanged; this
/// function never fails.
pub fn friendly_cidr_name(cidr: &str, config: &MapperConfig) -> String {
    if let Some(friendly) = config.common_cidrs.get(cidr) {
        return format!("{} ({})", friendly, cidr);
    }

    match cidr.parse::<IpNetwork>() {
        Ok(network) => {
            if is_private_network(&network) {
                format!("Private Network ({})", cidr)
            } else if is_global_network(&network) {
                format!("Public Network ({})", cidr)
            } else {
                cidr.to_string()
            }
        }
        Err(_) => cidr.to_string(),
    }
}

/// Format a port range for display: a single port collapses to one number.
/// A -1/-1 pair formats as "-1"; interpreting it as "all ports" is the
/// protocol layer's business, not the formatter's.
pub fn format_ports(from_port: i32, to_port: i32) -> String {
    if from_port == to_port {
        from_port.to_string()
    } else {
        format!("{}-{}", from_port, to_port)
    }
}

/// Display form of a protocol value: the "-1" wildcard reads as "All".
pub fn display_protocol(protocol: &str) -> &str {
    if protocol == "-1" { "All" } else { protocol }
}

// Structured view of a parsed CIDR block, for callers that need more than
// the display label.
#[derive(Debug, Clone, PartialEq)]
pub struct CidrInfo {
    pub network: String,
    pub netmask: String,
    pub num_addresses: u128,
    pub is_private: bool,
}

pub fn parse_cidr(cidr: &str) -> Option<CidrInfo> {
    match cidr.parse::<IpNetwork>() {
        Ok(network) => Some(CidrInfo {
            network: network.to_string(),
            netmask: network.mask().to_string(),
            num_addresses: address_count(&network),
            is_private: is_private_network(&network),
        }),
        Err(e) => {
            error!("Invalid CIDR block: {} - {}", cidr, e);
            None
        }
    }
}

fn address_count(network: &IpNetwork) -> u128 {
    let host_bits = match network {
        IpNetwork::V4(net) => 32 - u32::from(net.prefix()),
        IpNetwork::V6(net) => 128 - u32::from(net.prefix()),
    };
    if host_bits >= 128 {
        u128::MAX
    } else {
        1u128 << host_bits
    }
}

fn is_private_network(network: &IpNetwork) -> bool {
    match network {
        IpNetwork::V4(net) => {
            let ip = net.ip();
            ip.is_private() || ip.is_loopback() || ip.is_link_local()
        }
        IpNetwork::V6(net) => {
            let ip = net.ip();
            ip.is_loopback() || is_unique_local(&ip) || is_unicast_link_local(&ip)
        }
    }
}

fn is_global_network(network: &IpNetwork) -> bool {
    match network {
        IpNetwork::V4(net) => {
            let ip = net.ip();
            !(ip.is_unspecified() || ip.is_broadcast() || ip.is_multicast())
        }
        IpNetwork::V6(net) => {
            let ip = net.ip();
            !(ip.is_unspecified() || ip.is_multicast())
        }
    }
}

// fc00::/7
fn is_unique_local(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

// fe80::/10
fn is_unicast_link_local(ip: &Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}
