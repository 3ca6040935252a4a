//! Common types used throughout pktgen
//!
//! [`MacAddr`] carries the MAC codec (string, integer and byte forms) and the
//! MAC increment policy. [`VlanId`] carries the VLAN increment policy.

use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Largest value representable in 48 bits
pub const MAC_MAX: u64 = (1 << 48) - 1;

/// Default VLAN ceiling: incrementing past it wraps back to 1
pub const VLAN_CEILING: u16 = 4000;

/// Highest VLAN ID an 802.1Q tag can carry
pub const VLAN_MAX: u16 = 4094;

/// MAC Address (6 bytes, big-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Zero MAC address (00:00:00:00:00:00)
    pub const ZERO: MacAddr = MacAddr([0x00; 6]);

    /// Broadcast MAC address (ff:ff:ff:ff:ff:ff)
    pub const BROADCAST: MacAddr = MacAddr([0xff; 6]);

    /// Create a new MAC address
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Get bytes as slice
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Convert to array
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Integer value of the address, first octet most significant
    pub fn to_u64(&self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |acc, &octet| (acc << 8) | u64::from(octet))
    }

    /// Build an address from its integer value
    ///
    /// # Example
    ///
    /// ```
    /// use pktgen_core::MacAddr;
    ///
    /// let mac = MacAddr::from_u64(0x0011_2233_4455).unwrap();
    /// assert_eq!(mac.to_string(), "00:11:22:33:44:55");
    /// assert!(MacAddr::from_u64(1 << 48).is_err());
    /// ```
    pub fn from_u64(value: u64) -> Result<Self, Error> {
        if value > MAC_MAX {
            return Err(Error::Range(value));
        }

        let be = value.to_be_bytes();
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&be[2..]);
        Ok(MacAddr(bytes))
    }

    /// Next address in sequence, wrapping modulo 2^48
    pub fn next(&self) -> Self {
        let value = (self.to_u64() + 1) & MAC_MAX;
        let be = value.to_be_bytes();
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&be[2..]);
        MacAddr(bytes)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(Error::format(
                s,
                format!("expected 6 colon-separated groups, found {}", parts.len()),
            ));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            // from_str_radix would also accept a leading '+'
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(Error::format(
                    s,
                    format!("group {} ('{}') is not 1-2 hex digits", i + 1, part),
                ));
            }
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|e| Error::format(s, format!("group {}: {}", i + 1, e)))?;
        }

        Ok(MacAddr(bytes))
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddr(bytes)
    }
}

impl From<MacAddr> for [u8; 6] {
    fn from(mac: MacAddr) -> Self {
        mac.0
    }
}

/// VLAN identifier carried in an 802.1Q tag
///
/// Untagged traffic is expressed as `Option<VlanId>::None` rather than 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VlanId(u16);

impl VlanId {
    /// Create a VLAN ID in the range 1..=4094
    pub fn new(id: u16) -> Result<Self, Error> {
        if !(1..=VLAN_MAX).contains(&id) {
            return Err(Error::invalid_parameter(
                "vlan".to_string(),
                format!("VLAN ID {} must be between 1 and {}", id, VLAN_MAX),
            ));
        }
        Ok(Self(id))
    }

    /// Raw numeric value
    pub fn get(self) -> u16 {
        self.0
    }

    /// Next VLAN ID, wrapping to 1 once `ceiling` is reached
    ///
    /// # Example
    ///
    /// ```
    /// use pktgen_core::{VlanId, VLAN_CEILING};
    ///
    /// let vlan = VlanId::new(4000).unwrap();
    /// assert_eq!(vlan.next_wrapping(VLAN_CEILING).get(), 1);
    /// ```
    pub fn next_wrapping(self, ceiling: u16) -> Self {
        if self.0 >= ceiling || self.0 >= VLAN_MAX {
            Self(1)
        } else {
            Self(self.0 + 1)
        }
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ethertype constants
pub mod ethertypes {
    pub const DOT1Q: u16 = 0x8100;
    /// IEEE 802 local experimental EtherType 1
    pub const LOCAL_EXPERIMENTAL: u16 = 0x88B5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_lowercase() {
        let mac: MacAddr = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn test_parse_single_digit_groups() {
        let mac: MacAddr = "0:1:a:B:c:f".parse().unwrap();
        assert_eq!(mac, MacAddr([0x00, 0x01, 0x0a, 0x0b, 0x0c, 0x0f]));
        assert_eq!(mac.to_string(), "00:01:0a:0b:0c:0f");
    }

    #[test]
    fn test_parse_wrong_group_count() {
        let result = "00:00:00:00:00".parse::<MacAddr>();
        assert!(matches!(result, Err(Error::Format { .. })));

        let result = "00:00:00:00:00:00:00".parse::<MacAddr>();
        assert!(matches!(result, Err(Error::Format { .. })));
    }

    #[test]
    fn test_parse_invalid_hex() {
        for bad in [
            "00:00:00:00:00:GG",
            "00:00:00:00:00:",
            "00:00:00:00:00:123",
            "00:00:00:00:00:+1",
            "00:00:00:00:00: 1",
        ] {
            let result = bad.parse::<MacAddr>();
            assert!(
                matches!(result, Err(Error::Format { .. })),
                "expected format error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_integer_conversion() {
        let mac = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(mac.to_u64(), 0x0011_2233_4455);
        assert_eq!(MacAddr::from_u64(0x0011_2233_4455).unwrap(), mac);
        assert_eq!(MacAddr::BROADCAST.to_u64(), MAC_MAX);
        assert_eq!(MacAddr::from_u64(MAC_MAX).unwrap(), MacAddr::BROADCAST);
    }

    #[test]
    fn test_from_u64_out_of_range() {
        assert!(matches!(
            MacAddr::from_u64(MAC_MAX + 1),
            Err(Error::Range(v)) if v == MAC_MAX + 1
        ));
        assert!(MacAddr::from_u64(u64::MAX).is_err());
    }

    #[test]
    fn test_string_integer_roundtrip() {
        for n in [0, 1, 0xff, 0x0100, 0x00ab_cdef_0123, MAC_MAX - 1, MAC_MAX] {
            let mac = MacAddr::from_u64(n).unwrap();
            let parsed: MacAddr = mac.to_string().parse().unwrap();
            assert_eq!(parsed, mac);
            assert_eq!(parsed.to_u64(), n);
        }
    }

    #[test]
    fn test_next_mac() {
        assert_eq!(MacAddr::ZERO.next().to_string(), "00:00:00:00:00:01");

        let mac: MacAddr = "00:00:00:00:00:ff".parse().unwrap();
        assert_eq!(mac.next().to_string(), "00:00:00:00:01:00");
    }

    #[test]
    fn test_next_mac_wraps() {
        assert_eq!(MacAddr::BROADCAST.next(), MacAddr::ZERO);
    }

    #[test]
    fn test_vlan_increment() {
        let vlan = |id| VlanId::new(id).unwrap();
        assert_eq!(vlan(1).next_wrapping(VLAN_CEILING).get(), 2);
        assert_eq!(vlan(3999).next_wrapping(VLAN_CEILING).get(), 4000);
        assert_eq!(vlan(4000).next_wrapping(VLAN_CEILING).get(), 1);
    }

    #[test]
    fn test_vlan_range() {
        assert!(VlanId::new(0).is_err());
        assert!(VlanId::new(1).is_ok());
        assert!(VlanId::new(4094).is_ok());
        assert!(VlanId::new(4095).is_err());
    }
}
