//! Generator driver
//!
//! Turns one [`GeneratorConfig`] into a frame batch and hands it to a
//! [`Transmitter`] in a single pass. There are no retries: the first error
//! ends the run.

use crate::transmit::{TransmitStats, Transmitter};
use pktgen_core::{GeneratorConfig, GeneratorDefaults, MacAddr, Result};
use pktgen_packet::{EthernetFrame, FrameBuilder};
use tracing::info;

/// Packet generator for one stream file
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    defaults: GeneratorDefaults,
}

impl Generator {
    /// Create a generator from a parsed config and explicit defaults
    pub fn new(config: GeneratorConfig, defaults: GeneratorDefaults) -> Self {
        Self { config, defaults }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn defaults(&self) -> &GeneratorDefaults {
        &self.defaults
    }

    /// Interface frames are sent on
    pub fn interface(&self) -> &str {
        self.config.interface_or(&self.defaults)
    }

    /// Frame builder configured for this stream
    pub fn builder(&self, fallback_source: MacAddr) -> FrameBuilder {
        FrameBuilder::from_config(&self.config, &self.defaults, fallback_source)
    }

    /// Build the full frame batch without sending it
    pub fn frames(&self, fallback_source: MacAddr) -> Vec<EthernetFrame> {
        self.builder(fallback_source).build()
    }

    /// Build the batch and transmit it once
    pub fn run<T: Transmitter + ?Sized>(&self, transmitter: &mut T) -> Result<TransmitStats> {
        let interface = self.interface();

        let fallback_source = match self.config.source_mac {
            Some(_) => MacAddr::ZERO,
            None => transmitter
                .hardware_address(interface)
                .unwrap_or(MacAddr::ZERO),
        };

        let frames = self.frames(fallback_source);
        info!(
            interface,
            frames = frames.len(),
            pps = ?self.config.pps,
            "Transmitting frame batch"
        );

        transmitter.transmit(interface, frames, self.config.pps)
    }
}
