//! Target specification types with CIDR and hostname support.
//!
//! Targets reach the engine as plain host strings; name resolution happens
//! inside the connector so a lookup failure is just another closed port.
//! This module only validates and expands what the operator typed:
//! - Single IP addresses (IPv4 and IPv6)
//! - CIDR notation (192.168.1.0/24)
//! - Hostnames (example.com)
//! - Comma-separated lists of any of the above

use ipnetwork::IpNetwork;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Error type for target parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid target format: {0}")]
    InvalidFormat(String),
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),
    #[error("CIDR range too large: {0} addresses (max: {1})")]
    CidrTooLarge(u128, u128),
    #[error("no targets specified")]
    Empty,
}

/// One entry of a target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A single IP address.
    Single(IpAddr),
    /// A CIDR network range.
    Cidr(IpNetwork),
    /// A hostname, resolved at connect time.
    Hostname(String),
}

impl TargetSpec {
    /// Maximum number of hosts allowed in a CIDR range.
    pub const MAX_CIDR_HOSTS: u128 = 65536;

    /// Parse a target specification from a string.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TargetError::Empty);
        }

        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(Self::Single(ip));
        }

        if s.contains('/') {
            let network: IpNetwork = s
                .parse()
                .map_err(|_| TargetError::InvalidCidr(s.to_string()))?;

            let host_count = host_count(&network);
            if host_count > Self::MAX_CIDR_HOSTS {
                return Err(TargetError::CidrTooLarge(host_count, Self::MAX_CIDR_HOSTS));
            }

            return Ok(Self::Cidr(network));
        }

        if is_valid_hostname(s) {
            return Ok(Self::Hostname(s.to_string()));
        }

        Err(TargetError::InvalidFormat(s.to_string()))
    }

    /// Expand into the host strings the engine scans, in address order.
    ///
    /// IPv4 networks wider than /31 skip their network and broadcast addresses.
    pub fn expand(&self) -> Vec<String> {
        match self {
            Self::Single(ip) => vec![ip.to_string()],
            Self::Hostname(hostname) => vec![hostname.clone()],
            Self::Cidr(network) => network
                .iter()
                .filter(|ip| match (network, ip) {
                    (IpNetwork::V4(net), IpAddr::V4(addr)) if net.prefix() < 31 => {
                        *addr != net.network() && *addr != net.broadcast()
                    }
                    _ => true,
                })
                .map(|ip| ip.to_string())
                .collect(),
        }
    }
}

impl FromStr for TargetSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(ip) => write!(f, "{}", ip),
            Self::Cidr(network) => write!(f, "{}", network),
            Self::Hostname(hostname) => write!(f, "{}", hostname),
        }
    }
}

/// Parse a comma-separated target list into the ordered host list.
///
/// Every entry must be valid; an empty list is rejected.
pub fn parse_target_list(input: &str) -> Result<Vec<String>, TargetError> {
    let mut targets = Vec::new();
    for entry in input.split(',') {
        targets.extend(TargetSpec::parse(entry)?.expand());
    }

    if targets.is_empty() {
        return Err(TargetError::Empty);
    }

    Ok(targets)
}

fn host_count(network: &IpNetwork) -> u128 {
    match network {
        IpNetwork::V4(net) => u128::from(net.size()),
        IpNetwork::V6(net) => {
            let prefix = u32::from(net.prefix());
            if prefix == 0 {
                u128::MAX
            } else {
                1u128 << (128 - prefix)
            }
        }
    }
}

/// Check if a string is a syntactically valid hostname.
fn is_valid_hostname(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 {
        return false;
    }

    s.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.starts_with(|c: char| c.is_ascii_alphanumeric())
            && label.ends_with(|c: char| c.is_ascii_alphanumeric())
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
