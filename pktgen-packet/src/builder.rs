//! Frame batch builder
//!
//! Produces the ordered batch of frames for one generator run. Each frame
//! uses the field values current at its position; fields with their
//! increment flag set advance only after the frame has been built.

use crate::dot1q::Dot1qTag;
use crate::ethernet::{EtherType, EthernetFrame};
use bytes::Bytes;
use pktgen_core::{GeneratorConfig, GeneratorDefaults, Increments, MacAddr, VlanId};
use tracing::debug;

/// Upper bound on the up-front reservation for a batch
const CAPACITY_HINT: u64 = 1 << 16;

/// Builder for a batch of Ethernet frames
///
/// # Examples
///
/// ```
/// use pktgen_core::MacAddr;
/// use pktgen_packet::FrameBuilder;
///
/// let frames = FrameBuilder::new(MacAddr::ZERO, MacAddr::BROADCAST)
///     .increment_source(true)
///     .count(3)
///     .build();
///
/// let sources: Vec<String> = frames.iter().map(|f| f.source.to_string()).collect();
/// assert_eq!(
///     sources,
///     ["00:00:00:00:00:00", "00:00:00:00:00:01", "00:00:00:00:00:02"]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    source: MacAddr,
    destination: MacAddr,
    vlan: Option<VlanId>,
    increments: Increments,
    count: u64,
    payload_size: usize,
    default_payload_len: usize,
    payload_fill: u8,
    vlan_ceiling: u16,
    ethertype: EtherType,
}

impl FrameBuilder {
    /// Create a builder for a single untagged frame with default payload
    pub fn new(source: MacAddr, destination: MacAddr) -> Self {
        let defaults = GeneratorDefaults::default();
        Self {
            source,
            destination,
            vlan: None,
            increments: Increments::default(),
            count: 1,
            payload_size: 0,
            default_payload_len: defaults.payload_len,
            payload_fill: defaults.payload_fill,
            vlan_ceiling: defaults.vlan_ceiling,
            ethertype: EtherType::from_u16(defaults.ethertype),
        }
    }

    /// Create a builder from a parsed stream file
    ///
    /// `fallback_source` is used when the stream file has no `srcmac`;
    /// a missing `dstmac` falls back to broadcast.
    pub fn from_config(
        config: &GeneratorConfig,
        defaults: &GeneratorDefaults,
        fallback_source: MacAddr,
    ) -> Self {
        Self {
            source: config.source_mac.unwrap_or(fallback_source),
            destination: config.destination_mac.unwrap_or(MacAddr::BROADCAST),
            vlan: config.vlan,
            increments: config.increments,
            count: config.total_packets,
            payload_size: config.payload_size,
            default_payload_len: defaults.payload_len,
            payload_fill: defaults.payload_fill,
            vlan_ceiling: defaults.vlan_ceiling,
            ethertype: EtherType::from_u16(defaults.ethertype),
        }
    }

    /// Tag every frame, starting at this VLAN
    pub fn vlan(mut self, vlan: Option<VlanId>) -> Self {
        self.vlan = vlan;
        self
    }

    pub fn increment_source(mut self, enabled: bool) -> Self {
        self.increments.source_mac = enabled;
        self
    }

    pub fn increment_destination(mut self, enabled: bool) -> Self {
        self.increments.destination_mac = enabled;
        self
    }

    pub fn increment_vlan(mut self, enabled: bool) -> Self {
        self.increments.vlan = enabled;
        self
    }

    /// Number of frames to build
    pub fn count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Payload length in bytes, 0 for the default length
    pub fn payload_size(mut self, size: usize) -> Self {
        self.payload_size = size;
        self
    }

    /// EtherType written after the addresses (or after the tag)
    pub fn ethertype(mut self, ethertype: EtherType) -> Self {
        self.ethertype = ethertype;
        self
    }

    /// Effective payload length
    pub fn payload_len(&self) -> usize {
        if self.payload_size == 0 {
            self.default_payload_len
        } else {
            self.payload_size
        }
    }

    /// Build the frames in transmission order
    pub fn build(&self) -> Vec<EthernetFrame> {
        let payload = Bytes::from(vec![self.payload_fill; self.payload_len()]);

        let mut source = self.source;
        let mut destination = self.destination;
        let mut vlan = self.vlan;

        let hint = usize::try_from(self.count.min(CAPACITY_HINT)).unwrap_or(0);
        let mut frames = Vec::with_capacity(hint);
        for _ in 0..self.count {
            let mut frame =
                EthernetFrame::new(destination, source, self.ethertype, payload.clone());
            if let Some(id) = vlan {
                frame = frame.with_vlan(Dot1qTag::from(id));
            }
            frames.push(frame);

            if self.increments.source_mac {
                source = source.next();
            }
            if self.increments.destination_mac {
                destination = destination.next();
            }
            if self.increments.vlan {
                vlan = vlan.map(|id| id.next_wrapping(self.vlan_ceiling));
            }
        }

        debug!(
            frames = frames.len(),
            payload = payload.len(),
            tagged = self.vlan.is_some(),
            "Built frame batch"
        );

        frames
    }
}
