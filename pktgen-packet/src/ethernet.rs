//! Ethernet frame construction and parsing
//!
//! Ethernet II frames with an optional 802.1Q tag between the source
//! address and the EtherType.

use crate::dot1q::{Dot1qTag, DOT1Q_TAG_SIZE, DOT1Q_TPID};
use bytes::{BufMut, Bytes, BytesMut};
use pktgen_core::{ethertypes, Error, MacAddr, Result};
use std::fmt;

/// Common EtherType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtherType {
    /// IPv4 (0x0800)
    IPv4,
    /// ARP (0x0806)
    ARP,
    /// VLAN-tagged frame (0x8100)
    VLAN,
    /// IPv6 (0x86DD)
    IPv6,
    /// IEEE 802 local experimental (0x88B5)
    LocalExperimental,
    /// Custom EtherType
    Custom(u16),
}

impl EtherType {
    /// Convert EtherType to u16 value
    pub fn to_u16(self) -> u16 {
        match self {
            EtherType::IPv4 => 0x0800,
            EtherType::ARP => 0x0806,
            EtherType::VLAN => DOT1Q_TPID,
            EtherType::IPv6 => 0x86DD,
            EtherType::LocalExperimental => ethertypes::LOCAL_EXPERIMENTAL,
            EtherType::Custom(val) => val,
        }
    }

    /// Create EtherType from u16 value
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0800 => EtherType::IPv4,
            0x0806 => EtherType::ARP,
            DOT1Q_TPID => EtherType::VLAN,
            0x86DD => EtherType::IPv6,
            ethertypes::LOCAL_EXPERIMENTAL => EtherType::LocalExperimental,
            val => EtherType::Custom(val),
        }
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtherType::IPv4 => write!(f, "IPv4"),
            EtherType::ARP => write!(f, "ARP"),
            EtherType::VLAN => write!(f, "VLAN"),
            EtherType::IPv6 => write!(f, "IPv6"),
            EtherType::LocalExperimental => write!(f, "Local-Experimental"),
            EtherType::Custom(val) => write!(f, "0x{:04X}", val),
        }
    }
}

/// Ethernet II frame, optionally 802.1Q tagged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthernetFrame {
    /// Destination MAC address
    pub destination: MacAddr,
    /// Source MAC address
    pub source: MacAddr,
    /// 802.1Q tag, if the frame is tagged
    pub vlan: Option<Dot1qTag>,
    /// EtherType (the inner one when tagged)
    pub ethertype: EtherType,
    /// Payload data, shared between frames of a batch
    pub payload: Bytes,
}

impl EthernetFrame {
    /// Minimum Ethernet frame size (without FCS)
    pub const MIN_FRAME_SIZE: usize = 60;

    /// Ethernet header size (dst + src + type)
    pub const HEADER_SIZE: usize = 14;

    /// Create a new untagged Ethernet frame
    pub fn new(
        destination: MacAddr,
        source: MacAddr,
        ethertype: EtherType,
        payload: impl Into<Bytes>,
    ) -> Self {
        EthernetFrame {
            destination,
            source,
            vlan: None,
            ethertype,
            payload: payload.into(),
        }
    }

    /// Attach an 802.1Q tag
    pub fn with_vlan(mut self, tag: Dot1qTag) -> Self {
        self.vlan = Some(tag);
        self
    }

    /// Header size including the 802.1Q tag when present
    pub fn header_len(&self) -> usize {
        Self::HEADER_SIZE + self.vlan.map_or(0, |_| DOT1Q_TAG_SIZE)
    }

    /// Convert the frame to bytes
    ///
    /// Frames shorter than [`Self::MIN_FRAME_SIZE`] are zero padded.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(self.len());

        buffer.put_slice(self.destination.as_bytes());
        buffer.put_slice(self.source.as_bytes());

        if let Some(tag) = &self.vlan {
            tag.write_to(&mut buffer);
        }

        buffer.put_u16(self.ethertype.to_u16());
        buffer.put_slice(&self.payload);

        if buffer.len() < Self::MIN_FRAME_SIZE {
            buffer.resize(Self::MIN_FRAME_SIZE, 0);
        }

        buffer.to_vec()
    }

    /// Parse an Ethernet frame from bytes
    ///
    /// Padding cannot be told apart from payload, so everything after the
    /// header is returned as payload.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::HEADER_SIZE {
            return Err(Error::PacketParsing(format!(
                "Ethernet frame too short: {} bytes",
                data.len()
            )));
        }

        let mut destination = [0u8; 6];
        destination.copy_from_slice(&data[0..6]);
        let mut source = [0u8; 6];
        source.copy_from_slice(&data[6..12]);

        let mut offset = 12;
        let mut vlan = None;
        if u16::from_be_bytes([data[12], data[13]]) == DOT1Q_TPID {
            vlan = Some(Dot1qTag::parse(&data[offset..])?);
            offset += DOT1Q_TAG_SIZE;
            if data.len() < offset + 2 {
                return Err(Error::PacketParsing(
                    "Tagged frame truncated before EtherType".to_string(),
                ));
            }
        }

        let ethertype = EtherType::from_u16(u16::from_be_bytes([data[offset], data[offset + 1]]));
        offset += 2;

        Ok(EthernetFrame {
            destination: MacAddr(destination),
            source: MacAddr(source),
            vlan,
            ethertype,
            payload: Bytes::copy_from_slice(&data[offset..]),
        })
    }

    /// Get the total frame size in bytes
    pub fn len(&self) -> usize {
        (self.header_len() + self.payload.len()).max(Self::MIN_FRAME_SIZE)
    }

    /// Check if the frame is empty (never true, frames are padded)
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for EthernetFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.source, self.destination)?;
        if let Some(tag) = &self.vlan {
            write!(f, ", vlan {}", tag.vlan_id)?;
        }
        write!(
            f,
            ", type {}, payload {} bytes",
            self.ethertype,
            self.payload.len()
        )
    }
}
