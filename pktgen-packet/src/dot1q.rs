//! 802.1Q VLAN tag
//!
//! This module implements IEEE 802.1Q VLAN tag parsing and building.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use pktgen_core::{Error, Result, VlanId, VLAN_MAX};
use std::fmt;

/// 802.1Q Tag Protocol Identifier (TPID)
pub const DOT1Q_TPID: u16 = pktgen_core::ethertypes::DOT1Q;

/// Minimum valid VLAN ID (1)
pub const DOT1Q_MIN_VLAN: u16 = 1;

/// Maximum valid VLAN ID (4094)
pub const DOT1Q_MAX_VLAN: u16 = VLAN_MAX;

/// Size of 802.1Q tag in bytes (4 bytes: 2 TPID + 2 TCI)
pub const DOT1Q_TAG_SIZE: usize = 4;

/// VLAN ID mask (12 bits)
const VLAN_ID_MASK: u16 = 0x0FFF;

/// Priority mask (3 bits, shifted left 13)
const PRIORITY_MASK: u16 = 0xE000;

/// DEI/CFI mask (1 bit, bit 12)
const DEI_MASK: u16 = 0x1000;

/// 802.1Q VLAN Tag
///
/// The tag is 4 bytes total: 2 bytes TPID (0x8100) + 2 bytes TCI.
///
/// TCI (Tag Control Information) format:
/// ```text
/// | PCP (3 bits) | DEI (1 bit) | VID (12 bits) |
/// |   Priority   | Drop Eligible |   VLAN ID    |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot1qTag {
    /// VLAN Identifier (1-4094)
    pub vlan_id: u16,
    /// Priority Code Point (0-7)
    pub priority: u8,
    /// Drop Eligible Indicator
    pub dei: bool,
}

impl Dot1qTag {
    /// Create a new 802.1Q tag with priority 0 and DEI cleared
    ///
    /// # Example
    ///
    /// ```
    /// use pktgen_packet::dot1q::Dot1qTag;
    ///
    /// let tag = Dot1qTag::new(100).unwrap();
    /// assert_eq!(tag.vlan_id, 100);
    /// assert_eq!(tag.priority, 0);
    /// assert!(!tag.dei);
    /// ```
    pub fn new(vlan_id: u16) -> Result<Self> {
        Self::with_priority(vlan_id, 0, false)
    }

    /// Create a new 802.1Q tag with all fields specified
    pub fn with_priority(vlan_id: u16, priority: u8, dei: bool) -> Result<Self> {
        if !Self::is_valid_vlan_id(vlan_id) {
            return Err(Error::InvalidParameter {
                name: "vlan_id".to_string(),
                reason: format!(
                    "Invalid VLAN ID: {}. Must be between {} and {}",
                    vlan_id, DOT1Q_MIN_VLAN, DOT1Q_MAX_VLAN
                ),
            });
        }

        if priority > 7 {
            return Err(Error::InvalidParameter {
                name: "priority".to_string(),
                reason: format!("Invalid priority: {}. Must be between 0 and 7", priority),
            });
        }

        Ok(Self {
            vlan_id,
            priority,
            dei,
        })
    }

    /// Check if a VLAN ID is valid (1-4094)
    pub fn is_valid_vlan_id(vlan_id: u16) -> bool {
        (DOT1Q_MIN_VLAN..=DOT1Q_MAX_VLAN).contains(&vlan_id)
    }

    /// Parse 802.1Q tag from bytes
    ///
    /// Expects 4 bytes: 2 bytes TPID (0x8100) + 2 bytes TCI
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < DOT1Q_TAG_SIZE {
            return Err(Error::PacketParsing(format!(
                "802.1Q tag too short: {} bytes, expected {}",
                data.len(),
                DOT1Q_TAG_SIZE
            )));
        }

        let mut buf = &data[..DOT1Q_TAG_SIZE];

        let tpid = buf.get_u16();
        if tpid != DOT1Q_TPID {
            return Err(Error::PacketParsing(format!(
                "Invalid TPID: 0x{:04X}, expected 0x{:04X}",
                tpid, DOT1Q_TPID
            )));
        }

        let tci = buf.get_u16();
        let priority = ((tci & PRIORITY_MASK) >> 13) as u8;
        let dei = (tci & DEI_MASK) != 0;
        let vlan_id = tci & VLAN_ID_MASK;

        if !Self::is_valid_vlan_id(vlan_id) {
            return Err(Error::PacketParsing(format!(
                "Invalid VLAN ID in tag: {}",
                vlan_id
            )));
        }

        Ok(Self {
            vlan_id,
            priority,
            dei,
        })
    }

    /// Append TPID and TCI to a buffer
    pub fn write_to<B: BufMut>(&self, buf: &mut B) {
        buf.put_u16(DOT1Q_TPID);
        buf.put_u16(self.tci());
    }

    /// Build 802.1Q tag bytes
    pub fn build(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(DOT1Q_TAG_SIZE);
        self.write_to(&mut buf);
        buf.freeze()
    }

    /// Get the TCI (Tag Control Information) as a 16-bit value
    pub fn tci(&self) -> u16 {
        let mut tci: u16 = 0;
        tci |= ((self.priority as u16) << 13) & PRIORITY_MASK;
        if self.dei {
            tci |= DEI_MASK;
        }
        tci |= self.vlan_id & VLAN_ID_MASK;
        tci
    }
}

impl From<VlanId> for Dot1qTag {
    fn from(vlan: VlanId) -> Self {
        Self {
            vlan_id: vlan.get(),
            priority: 0,
            dei: false,
        }
    }
}

impl fmt::Display for Dot1qTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VLAN {} (Priority: {}, DEI: {})",
            self.vlan_id,
            self.priority,
            if self.dei { "1" } else { "0" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlan_id_validation() {
        assert!(!Dot1qTag::is_valid_vlan_id(0));
        assert!(Dot1qTag::is_valid_vlan_id(1));
        assert!(Dot1qTag::is_valid_vlan_id(4094));
        assert!(!Dot1qTag::is_valid_vlan_id(4095));
    }

    #[test]
    fn test_tag_with_invalid_priority() {
        assert!(Dot1qTag::with_priority(100, 8, false).is_err());
    }

    #[test]
    fn test_tag_tci() {
        let tag = Dot1qTag::with_priority(100, 5, false).unwrap();
        // PCP 5 << 13 = 0xA000, VID 100 = 0x0064
        assert_eq!(tag.tci(), 0xA064);
    }

    #[test]
    fn test_tag_build_parse() {
        let tag = Dot1qTag::with_priority(100, 5, true).unwrap();
        let bytes = tag.build();

        assert_eq!(bytes.len(), DOT1Q_TAG_SIZE);
        assert_eq!(bytes[0..2], [0x81, 0x00]);
        assert_eq!(Dot1qTag::parse(&bytes).unwrap(), tag);
    }

    #[test]
    fn test_tag_parse_invalid_tpid() {
        let data = vec![0x88, 0x48, 0x00, 0x64];
        assert!(Dot1qTag::parse(&data).is_err());
    }

    #[test]
    fn test_tag_parse_too_short() {
        assert!(Dot1qTag::parse(&[0x81, 0x00]).is_err());
    }

    #[test]
    fn test_from_vlan_id() {
        let tag = Dot1qTag::from(VlanId::new(4000).unwrap());
        assert_eq!(tag.vlan_id, 4000);
        assert_eq!(tag.tci(), 4000);
    }

    #[test]
    fn test_tag_display() {
        let tag = Dot1qTag::with_priority(100, 5, true).unwrap();
        assert_eq!(tag.to_string(), "VLAN 100 (Priority: 5, DEI: 1)");
    }
}
