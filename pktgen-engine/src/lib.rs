//! Generator driver and transmission for pktgen
//!
//! This crate ties the pieces together:
//!
//! - `Generator`: builds the frame batch for a stream file and sends it
//! - `Transmitter`: the transmit primitive, with a `pnet_datalink` backend
//! - `RateLimiter`: blocking packets-per-second pacing
//!
//! # Example
//!
//! ```no_run
//! use pktgen_core::{GeneratorConfig, GeneratorDefaults};
//! use pktgen_engine::{DatalinkTransmitter, Generator};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let defaults = GeneratorDefaults::default();
//!     let config = GeneratorConfig::from_path("input.txt", &defaults)?;
//!
//!     let stats = Generator::new(config, defaults).run(&mut DatalinkTransmitter::new())?;
//!     println!("{}", stats);
//!     Ok(())
//! }
//! ```

pub mod driver;
pub mod rate;
pub mod transmit;

pub use driver::Generator;
pub use rate::RateLimiter;
pub use transmit::{send_paced, DatalinkTransmitter, TransmitStats, Transmitter};
