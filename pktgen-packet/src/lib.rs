//! Frame construction and parsing library for pktgen
//!
//! This crate builds the Ethernet frames pktgen transmits:
//!
//! - [`ethernet`] - Ethernet II frame construction and parsing
//! - [`dot1q`] - 802.1Q VLAN tags
//! - [`builder`] - Batch builder applying the MAC/VLAN increment policy
//!
//! # Quick Start
//!
//! ```rust
//! use pktgen_core::{MacAddr, VlanId};
//! use pktgen_packet::FrameBuilder;
//!
//! let src: MacAddr = "00:11:22:33:44:00".parse().unwrap();
//!
//! let frames = FrameBuilder::new(src, MacAddr::BROADCAST)
//!     .vlan(Some(VlanId::new(100).unwrap()))
//!     .increment_source(true)
//!     .increment_vlan(true)
//!     .count(4)
//!     .build();
//!
//! assert_eq!(frames.len(), 4);
//! assert_eq!(frames[3].source.to_string(), "00:11:22:33:44:03");
//! assert_eq!(frames[3].vlan.unwrap().vlan_id, 103);
//! ```

pub mod builder;
pub mod dot1q;
pub mod ethernet;

pub use builder::FrameBuilder;
pub use dot1q::Dot1qTag;
pub use ethernet::{EtherType, EthernetFrame};
