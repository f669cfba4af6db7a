//! Interface addressing and validation.
//!
//! This file contains the validated representation of an interface's IPv4
//! address, prefix length, and optional gateway, plus the error taxonomy
//! for interface management.

use std::net::Ipv4Addr;

/// Errors raised by interface addressing and interface table management
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterfaceError {
    #[error("{value} must be an IPv4 address")]
    InvalidAddressFormat { value: String },

    #[error("{value} must be a number from 1 to 32")]
    InvalidPrefixLength { value: u8 },

    #[error("interface {name} already exists on this device")]
    DuplicateName { name: String },
}

/// A named attachment point with optional IPv4 addressing.
///
/// Fields are unset until configured; a setter either installs a validated
/// value or fails and leaves the prior value in place. `Clone` copies every
/// field, so an `Interface` used as a template never aliases the copy a
/// device ends up owning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    name: String,
    address: Option<Ipv4Addr>,
    prefix_len: Option<u8>,
    gateway: Option<Ipv4Addr>,
}

impl Interface {
    /// Create an unconfigured interface descriptor with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Interface {
            name: name.into(),
            address: None,
            prefix_len: None,
            gateway: None,
        }
    }

    /// Copy of this descriptor's validated fields under a new interface name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Interface {
            name: name.into(),
            address: self.address,
            prefix_len: self.prefix_len,
            gateway: self.gateway,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<Ipv4Addr> {
        self.address
    }

    pub fn prefix_len(&self) -> Option<u8> {
        self.prefix_len
    }

    pub fn gateway(&self) -> Option<Ipv4Addr> {
        self.gateway
    }

    /// Set the interface address. Invalid input leaves the prior value in place.
    pub fn set_address(&mut self, value: &str) -> Result<(), InterfaceError> {
        self.address = Some(parse_ipv4(value)?);
        Ok(())
    }

    /// Set the prefix length. Valid range is 1 to 32 inclusive.
    pub fn set_prefix_len(&mut self, value: u8) -> Result<(), InterfaceError> {
        if !(1..=32).contains(&value) {
            return Err(InterfaceError::InvalidPrefixLength { value });
        }
        self.prefix_len = Some(value);
        Ok(())
    }

    /// Set the gateway address. Invalid input leaves the prior value in place.
    pub fn set_gateway(&mut self, value: &str) -> Result<(), InterfaceError> {
        self.gateway = Some(parse_ipv4(value)?);
        Ok(())
    }

    /// True when both address and prefix length are set and `addr` falls
    /// inside the implied IPv4 network.
    pub fn subnet_contains(&self, addr: Ipv4Addr) -> bool {
        match (self.address, self.prefix_len) {
            (Some(own), Some(len)) => {
                let mask = u32::MAX << (32 - u32::from(len));
                (u32::from(own) & mask) == (u32::from(addr) & mask)
            }
            _ => false,
        }
    }
}

fn parse_ipv4(value: &str) -> Result<Ipv4Addr, InterfaceError> {
    value
        .parse::<Ipv4Addr>()
        .map_err(|_| InterfaceError::InvalidAddressFormat {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_address_valid() {
        let valid = vec!["192.168.1.1", "10.0.0.1", "172.16.0.1", "255.255.255.255", "0.0.0.0"];
        for input in valid {
            let mut iface = Interface::new("eth0");
            assert!(iface.set_address(input).is_ok(), "address {} should be valid", input);
            assert_eq!(iface.address(), Some(input.parse().unwrap()));
        }
    }

    #[test]
    fn test_set_address_invalid_keeps_prior_value() {
        let mut iface = Interface::new("eth0");

        // No prior value: stays unset
        assert_eq!(
            iface.set_address("not-an-ip"),
            Err(InterfaceError::InvalidAddressFormat {
                value: "not-an-ip".to_string()
            })
        );
        assert_eq!(iface.address(), None);

        // Prior value survives a failed set
        iface.set_address("192.168.1.1").unwrap();
        let invalid = vec!["300.1.1.1", "1.2.3", "", "::1", "192.168.1.1/24", "192.168.1.1 "];
        for input in invalid {
            assert!(iface.set_address(input).is_err(), "address {:?} should be rejected", input);
            assert_eq!(iface.address(), Some("192.168.1.1".parse().unwrap()));
        }
    }

    #[test]
    fn test_set_prefix_len_bounds() {
        let mut iface = Interface::new("eth0");

        assert_eq!(
            iface.set_prefix_len(0),
            Err(InterfaceError::InvalidPrefixLength { value: 0 })
        );
        assert_eq!(iface.prefix_len(), None);

        assert!(iface.set_prefix_len(1).is_ok());
        assert!(iface.set_prefix_len(32).is_ok());
        assert_eq!(iface.prefix_len(), Some(32));

        assert_eq!(
            iface.set_prefix_len(33),
            Err(InterfaceError::InvalidPrefixLength { value: 33 })
        );
        assert_eq!(iface.prefix_len(), Some(32));
    }

    #[test]
    fn test_set_gateway_validation() {
        let mut iface = Interface::new("eth0");
        assert!(iface.set_gateway("192.168.170.1").is_ok());
        assert!(iface.set_gateway("gateway").is_err());
        assert_eq!(iface.gateway(), Some("192.168.170.1".parse().unwrap()));
    }

    #[test]
    fn test_renamed_copies_fields() {
        let mut template = Interface::new("template");
        template.set_address("10.0.0.2").unwrap();
        template.set_prefix_len(24).unwrap();
        template.set_gateway("10.0.0.1").unwrap();

        let copy = template.renamed("eth0");
        assert_eq!(copy.name(), "eth0");
        assert_eq!(copy.address(), template.address());
        assert_eq!(copy.prefix_len(), template.prefix_len());
        assert_eq!(copy.gateway(), template.gateway());
    }

    #[test]
    fn test_subnet_contains() {
        let mut iface = Interface::new("eth0");

        // Unconfigured interface has no subnet
        assert!(!iface.subnet_contains("192.168.10.1".parse().unwrap()));

        iface.set_address("192.168.10.10").unwrap();
        iface.set_prefix_len(22).unwrap();

        // 192.168.10.10/22 covers 192.168.8.0 - 192.168.11.255
        assert!(iface.subnet_contains("192.168.8.1".parse().unwrap()));
        assert!(iface.subnet_contains("192.168.11.254".parse().unwrap()));
        assert!(!iface.subnet_contains("192.168.12.1".parse().unwrap()));
        assert!(!iface.subnet_contains("192.168.170.1".parse().unwrap()));

        // /32 matches the address alone
        iface.set_prefix_len(32).unwrap();
        assert!(iface.subnet_contains("192.168.10.10".parse().unwrap()));
        assert!(!iface.subnet_contains("192.168.10.11".parse().unwrap()));
    }
}
