//! Network interface types

use crate::{Error, MacAddr, Result};
use pnet_datalink::{self, Channel, DataLinkSender, NetworkInterface};
use std::fmt;

/// Link-layer interface frames are transmitted on
#[derive(Debug, Clone)]
pub struct Interface {
    /// Interface name (e.g., "eth0", "en0")
    pub name: String,
    /// Interface index
    pub index: u32,
    /// Hardware address, if the interface has one
    pub mac_address: Option<MacAddr>,
    /// Is interface up?
    pub is_up: bool,
    /// Is this a loopback interface?
    pub is_loopback: bool,
}

impl From<&NetworkInterface> for Interface {
    fn from(iface: &NetworkInterface) -> Self {
        Self {
            name: iface.name.clone(),
            index: iface.index,
            mac_address: iface
                .mac
                .map(|mac| MacAddr([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])),
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
        }
    }
}

impl Interface {
    /// Get interface by name
    pub fn by_name(name: &str) -> Result<Self> {
        find(name).map(|iface| Interface::from(&iface))
    }

    /// List all available interfaces
    pub fn list_all() -> Vec<Self> {
        pnet_datalink::interfaces()
            .iter()
            .map(Interface::from)
            .collect()
    }

    /// Open a link-layer sender on this interface
    pub fn open_sender(&self) -> Result<Box<dyn DataLinkSender>> {
        let iface = find(&self.name)?;

        match pnet_datalink::channel(&iface, Default::default()) {
            Ok(Channel::Ethernet(tx, _rx)) => Ok(tx),
            Ok(_) => Err(Error::transmit(format!(
                "Unsupported channel type on {}",
                self.name
            ))),
            Err(e) => Err(Error::transmit(format!(
                "Failed to open channel on {}: {}",
                self.name, e
            ))),
        }
    }
}

fn find(name: &str) -> Result<NetworkInterface> {
    pnet_datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mac = self
            .mac_address
            .map(|mac| mac.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{} (index {}, {}, {})",
            self.name,
            self.index,
            mac,
            if self.is_up { "up" } else { "down" }
        )
    }
}
