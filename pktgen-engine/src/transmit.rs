//! Link-layer transmission
//!
//! [`Transmitter`] is the seam between the generator driver and the
//! network. [`DatalinkTransmitter`] sends raw frames through
//! `pnet_datalink`; tests substitute their own implementation.

use crate::rate::RateLimiter;
use pktgen_core::{Error, Interface, MacAddr, Result};
use pktgen_packet::EthernetFrame;
use pnet_datalink::DataLinkSender;
use std::fmt;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace};

/// Transmission statistics for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmitStats {
    /// Frames handed to the interface
    pub packets_sent: u64,
    /// Bytes handed to the interface, padding included
    pub bytes_sent: u64,
    /// Wall time spent sending
    pub elapsed: Duration,
}

impl TransmitStats {
    /// Achieved rate in packets per second
    pub fn packets_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.packets_sent as f64 / secs
        } else {
            0.0
        }
    }
}

impl fmt::Display for TransmitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} packets, {} bytes in {:.3}s ({:.1} pps)",
            self.packets_sent,
            self.bytes_sent,
            self.elapsed.as_secs_f64(),
            self.packets_per_second()
        )
    }
}

/// Sends a batch of frames on a named interface
pub trait Transmitter {
    /// Hardware address of `interface`, used when no source MAC is configured
    fn hardware_address(&self, _interface: &str) -> Option<MacAddr> {
        None
    }

    /// Send `frames` in order, at most `pps` per second when set
    fn transmit(
        &mut self,
        interface: &str,
        frames: Vec<EthernetFrame>,
        pps: Option<u64>,
    ) -> Result<TransmitStats>;
}

/// Transmitter backed by a `pnet_datalink` Ethernet channel
#[derive(Debug, Default)]
pub struct DatalinkTransmitter;

impl DatalinkTransmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Transmitter for DatalinkTransmitter {
    fn hardware_address(&self, interface: &str) -> Option<MacAddr> {
        Interface::by_name(interface).ok()?.mac_address
    }

    fn transmit(
        &mut self,
        interface: &str,
        frames: Vec<EthernetFrame>,
        pps: Option<u64>,
    ) -> Result<TransmitStats> {
        let iface = Interface::by_name(interface).map_err(|e| match e {
            Error::InterfaceNotFound(name) => {
                Error::transmit(format!("interface '{}' not found", name))
            }
            other => other,
        })?;
        if !iface.is_up {
            debug!(interface = %iface.name, "Interface is down, sending anyway");
        }

        let mut tx: Box<dyn DataLinkSender> = iface.open_sender()?;
        send_paced(&frames, pps, |bytes| {
            tx.send_to(bytes, None)
                .unwrap_or_else(|| Err(io::Error::other("sender accepted no packet")))
        })
        .map(|stats| {
            info!(interface = %iface.name, %stats, "Transmission complete");
            stats
        })
    }
}

/// Serialize and send every frame through `send`, pacing with a
/// [`RateLimiter`] when `pps` is set
///
/// Stops at the first failed send.
pub fn send_paced<F>(
    frames: &[EthernetFrame],
    pps: Option<u64>,
    mut send: F,
) -> Result<TransmitStats>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    let mut limiter = pps.map(RateLimiter::new);
    let mut stats = TransmitStats::default();
    let start = Instant::now();

    for (idx, frame) in frames.iter().enumerate() {
        if let Some(limiter) = limiter.as_mut() {
            limiter.wait();
        }

        let bytes = frame.to_bytes();
        if let Err(e) = send(&bytes) {
            error!(frame = idx, error = %e, "Failed to send frame");
            return Err(Error::transmit(format!(
                "frame {} of {}: {}",
                idx + 1,
                frames.len(),
                e
            )));
        }

        trace!(frame = idx, size = bytes.len(), "Frame sent");
        stats.packets_sent += 1;
        stats.bytes_sent += bytes.len() as u64;
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}
