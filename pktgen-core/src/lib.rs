//! pktgen core library
//!
//! This crate provides the MAC and VLAN types, the stream file
//! configuration, interface lookup and error handling shared by the
//! pktgen crates.

pub mod config;
pub mod error;
pub mod interface;
pub mod types;

// Re-export commonly used types
pub use config::{
    GeneratorConfig, GeneratorDefaults, Increments, MAX_PAYLOAD_SIZE, MAX_TOTAL_PACKETS,
};
pub use error::{Error, Result};
pub use interface::Interface;
pub use types::*;
