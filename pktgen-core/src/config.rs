//! Generator configuration
//!
//! The stream file is a flat list of `key=value` lines:
//!
//! ```text
//! iface = eth1
//! srcmac = 00:11:22:33:44:00
//! dstmac = 00:aa:bb:cc:dd:00
//! vlan = 100
//! inc_srcmac = yes
//! inc_dstmac = no
//! inc_vlan = yes
//! totpkts = 1000
//! pps = 500
//! l2payload_size = 128
//! ```
//!
//! Any malformed line aborts parsing with [`Error::Config`].

use crate::types::{ethertypes, MacAddr, VlanId, VLAN_CEILING};
use crate::{Error, Result};
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Largest payload accepted for `l2payload_size` (Ethernet MTU)
pub const MAX_PAYLOAD_SIZE: usize = 1500;

/// Largest batch accepted for `totpkts`; the whole batch is held in memory
pub const MAX_TOTAL_PACKETS: u64 = 10_000_000;

/// Defaults the generator falls back on when the stream file is silent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDefaults {
    /// Interface used when neither the CLI nor the stream file names one
    pub interface: String,
    /// Payload length substituted for `l2payload_size = 0`
    pub payload_len: usize,
    /// VLAN ID at which incrementing wraps back to 1
    pub vlan_ceiling: u16,
    /// Stream file read when none is given on the command line
    pub config_path: PathBuf,
    /// Byte repeated to fill the payload
    pub payload_fill: u8,
    /// EtherType of generated frames (inner EtherType when tagged)
    pub ethertype: u16,
}

impl Default for GeneratorDefaults {
    fn default() -> Self {
        Self {
            interface: "eth0".to_string(),
            payload_len: 64,
            vlan_ceiling: VLAN_CEILING,
            config_path: PathBuf::from("input.txt"),
            payload_fill: 0x01,
            ethertype: ethertypes::LOCAL_EXPERIMENTAL,
        }
    }
}

/// Which frame fields advance between consecutive frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Increments {
    pub source_mac: bool,
    pub destination_mac: bool,
    pub vlan: bool,
}

/// Immutable snapshot of a parsed stream file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Interface named by `iface`, if any
    pub interface: Option<String>,
    pub source_mac: Option<MacAddr>,
    pub destination_mac: Option<MacAddr>,
    /// `None` when `vlan` is absent or 0
    pub vlan: Option<VlanId>,
    pub increments: Increments,
    pub total_packets: u64,
    /// 0 selects the default payload length
    pub payload_size: usize,
    /// Packets per second, `None` for unlimited
    pub pps: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interface: None,
            source_mac: None,
            destination_mac: None,
            vlan: None,
            increments: Increments::default(),
            total_packets: 1,
            payload_size: 0,
            pps: None,
        }
    }
}

impl GeneratorConfig {
    /// Read a stream file from disk
    pub fn from_path<P: AsRef<Path>>(path: P, defaults: &GeneratorDefaults) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading stream file");
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, defaults)
    }

    /// Parse a stream file from any reader
    pub fn from_reader<R: Read>(reader: R, defaults: &GeneratorDefaults) -> Result<Self> {
        let mut config = GeneratorConfig::default();

        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.map_err(|e| match e.kind() {
                ErrorKind::InvalidData => Error::config(idx + 1, "line is not valid UTF-8"),
                _ => Error::Io(e),
            })?;
            config.apply_line(idx + 1, &line, defaults)?;
        }

        Ok(config)
    }

    /// Parse a stream file held in memory
    ///
    /// # Example
    ///
    /// ```
    /// use pktgen_core::{GeneratorConfig, GeneratorDefaults};
    ///
    /// let config = GeneratorConfig::parse_str(
    ///     "srcmac = 00:11:22:33:44:55\ntotpkts = 10\ninc_srcmac = yes\n",
    ///     &GeneratorDefaults::default(),
    /// )
    /// .unwrap();
    /// assert_eq!(config.total_packets, 10);
    /// assert!(config.increments.source_mac);
    /// ```
    pub fn parse_str(text: &str, defaults: &GeneratorDefaults) -> Result<Self> {
        Self::from_reader(text.as_bytes(), defaults)
    }

    /// Replace the interface, e.g. with one given on the command line
    pub fn with_interface<S: Into<String>>(mut self, interface: S) -> Self {
        self.interface = Some(interface.into());
        self
    }

    /// Interface to transmit on, falling back to the defaults
    pub fn interface_or<'a>(&'a self, defaults: &'a GeneratorDefaults) -> &'a str {
        self.interface.as_deref().unwrap_or(defaults.interface.as_str())
    }

    fn apply_line(
        &mut self,
        line_no: usize,
        line: &str,
        defaults: &GeneratorDefaults,
    ) -> Result<()> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }

        let (key, value) = trimmed.split_once('=').ok_or_else(|| {
            Error::config(line_no, format!("expected key=value, got '{}'", trimmed))
        })?;
        if value.contains('=') {
            return Err(Error::config(
                line_no,
                format!("more than one '=' in '{}'", trimmed),
            ));
        }

        let key = key.trim();
        let value = value.trim();

        match key {
            "iface" => {
                if value.is_empty() {
                    return Err(Error::config(line_no, "iface must not be empty"));
                }
                self.interface = Some(value.to_string());
            }
            "srcmac" => self.source_mac = Some(parse_mac(line_no, key, value)?),
            "dstmac" => self.destination_mac = Some(parse_mac(line_no, key, value)?),
            "vlan" => {
                let vlan = parse_digits(line_no, key, value)?;
                self.vlan = match vlan {
                    0 => None,
                    id if id <= u64::from(defaults.vlan_ceiling) => {
                        let id = VlanId::new(id as u16)
                            .map_err(|e| Error::config(line_no, e.to_string()))?;
                        Some(id)
                    }
                    id => {
                        return Err(Error::config(
                            line_no,
                            format!(
                                "vlan {} exceeds the ceiling of {}",
                                id, defaults.vlan_ceiling
                            ),
                        ))
                    }
                };
            }
            "totpkts" => {
                let total = parse_digits(line_no, key, value)?;
                if total == 0 {
                    return Err(Error::config(line_no, "totpkts must be at least 1"));
                }
                if total > MAX_TOTAL_PACKETS {
                    return Err(Error::config(
                        line_no,
                        format!("totpkts {} exceeds {}", total, MAX_TOTAL_PACKETS),
                    ));
                }
                self.total_packets = total;
            }
            "pps" => {
                let pps = parse_digits(line_no, key, value)?;
                if pps == 0 {
                    return Err(Error::config(line_no, "pps must be at least 1"));
                }
                self.pps = Some(pps);
            }
            "l2payload_size" => {
                let size = parse_digits(line_no, key, value)?;
                if size > MAX_PAYLOAD_SIZE as u64 {
                    return Err(Error::config(
                        line_no,
                        format!("l2payload_size {} exceeds {}", size, MAX_PAYLOAD_SIZE),
                    ));
                }
                self.payload_size = size as usize;
            }
            "inc_srcmac" => self.increments.source_mac = parse_flag(line_no, key, value)?,
            "inc_dstmac" => self.increments.destination_mac = parse_flag(line_no, key, value)?,
            "inc_vlan" => self.increments.vlan = parse_flag(line_no, key, value)?,
            other => {
                warn!(line = line_no, key = other, "Ignoring unknown stream file key");
            }
        }

        Ok(())
    }
}

fn parse_digits(line_no: usize, key: &str, value: &str) -> Result<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::config(
            line_no,
            format!("{} expects digits only, got '{}'", key, value),
        ));
    }
    value
        .parse::<u64>()
        .map_err(|e| Error::config(line_no, format!("{}: {}", key, e)))
}

fn parse_flag(line_no: usize, key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(Error::config(
            line_no,
            format!("{} expects yes or no, got '{}'", key, value),
        )),
    }
}

fn parse_mac(line_no: usize, key: &str, value: &str) -> Result<MacAddr> {
    value
        .parse::<MacAddr>()
        .map_err(|e| Error::config(line_no, format!("{}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<GeneratorConfig> {
        GeneratorConfig::parse_str(text, &GeneratorDefaults::default())
    }

    fn assert_config_error(text: &str, expected_line: usize) {
        match parse(text) {
            Err(Error::Config { line, .. }) => assert_eq!(line, expected_line, "{:?}", text),
            other => panic!("expected config error for {:?}, got {:?}", text, other),
        }
    }

    #[test]
    fn test_defaults() {
        let defaults = GeneratorDefaults::default();
        assert_eq!(defaults.interface, "eth0");
        assert_eq!(defaults.payload_len, 64);
        assert_eq!(defaults.vlan_ceiling, 4000);
        assert_eq!(defaults.config_path, PathBuf::from("input.txt"));
        assert_eq!(defaults.payload_fill, 0x01);
    }

    #[test]
    fn test_empty_file() {
        let config = parse("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.total_packets, 1);
        assert_eq!(config.pps, None);
    }

    #[test]
    fn test_full_file() {
        let text = "\
iface = eth1
srcmac = 00:11:22:33:44:00
dstmac = 00:AA:BB:CC:DD:00
vlan = 100
inc_srcmac = yes
inc_dstmac = No
inc_vlan = YES
totpkts = 1000
pps = 500
l2payload_size = 128
";
        let config = parse(text).unwrap();
        assert_eq!(config.interface.as_deref(), Some("eth1"));
        assert_eq!(
            config.source_mac,
            Some(MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x00]))
        );
        assert_eq!(
            config.destination_mac.map(|m| m.to_string()),
            Some("00:aa:bb:cc:dd:00".to_string())
        );
        assert_eq!(config.vlan.map(VlanId::get), Some(100));
        assert_eq!(
            config.increments,
            Increments {
                source_mac: true,
                destination_mac: false,
                vlan: true,
            }
        );
        assert_eq!(config.total_packets, 1000);
        assert_eq!(config.pps, Some(500));
        assert_eq!(config.payload_size, 128);
    }

    #[test]
    fn test_demo_stream_file() {
        let config = parse(include_str!("../../demos/input.txt")).unwrap();
        assert_eq!(config.total_packets, 1000);
        assert_eq!(config.vlan.map(VlanId::get), Some(100));
    }

    #[test]
    fn test_vlan_zero_means_untagged() {
        let config = parse("vlan=0\ninc_vlan=yes\n").unwrap();
        assert_eq!(config.vlan, None);
        assert!(config.increments.vlan);
    }

    #[test]
    fn test_non_digit_integer() {
        assert_config_error("totpkts=abc", 1);
        assert_config_error("pps=-5", 1);
        assert_config_error("vlan=+1", 1);
        assert_config_error("l2payload_size=", 1);
    }

    #[test]
    fn test_bad_flag() {
        assert_config_error("inc_srcmac=true", 1);
        assert_config_error("totpkts=2\ninc_vlan=1", 2);
    }

    #[test]
    fn test_missing_equals() {
        assert_config_error("iface eth0", 1);
    }

    #[test]
    fn test_multiple_equals() {
        assert_config_error("iface=eth0=eth1", 1);
    }

    #[test]
    fn test_bad_mac() {
        assert_config_error("srcmac=00:00:00:00:00", 1);
        assert_config_error("dstmac=00:00:00:00:00:GG", 1);
    }

    #[test]
    fn test_out_of_range_values() {
        assert_config_error("totpkts=0", 1);
        assert_config_error("pps=0", 1);
        assert_config_error("vlan=4001", 1);
        assert_config_error("totpkts=99999999999999999999999", 1);
        assert_config_error("l2payload_size=1501", 1);
    }

    #[test]
    fn test_total_packets_limit() {
        let config = parse(&format!("totpkts={}", MAX_TOTAL_PACKETS)).unwrap();
        assert_eq!(config.total_packets, MAX_TOTAL_PACKETS);

        assert_config_error(&format!("totpkts={}", MAX_TOTAL_PACKETS + 1), 1);
        assert_config_error("totpkts=9223372036854775807", 1);
    }

    #[test]
    fn test_invalid_utf8_line() {
        let data: &[u8] = b"totpkts=2\nsrcmac=\xff\xfe\n";
        let result = GeneratorConfig::from_reader(data, &GeneratorDefaults::default());
        match result {
            Err(Error::Config { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines_and_comments() {
        let config = parse("# stream\n\n   \ntotpkts=3\n").unwrap();
        assert_eq!(config.total_packets, 3);
    }

    #[test]
    fn test_unknown_key_ignored() {
        let config = parse("colour=blue\ntotpkts=2").unwrap();
        assert_eq!(config.total_packets, 2);
    }

    #[test]
    fn test_later_key_wins() {
        let config = parse("totpkts=2\ntotpkts=7").unwrap();
        assert_eq!(config.total_packets, 7);
    }

    #[test]
    fn test_interface_resolution() {
        let defaults = GeneratorDefaults::default();

        let config = parse("totpkts=1").unwrap();
        assert_eq!(config.interface_or(&defaults), "eth0");

        let config = parse("iface=eth3").unwrap();
        assert_eq!(config.interface_or(&defaults), "eth3");

        let config = config.with_interface("veth0");
        assert_eq!(config.interface_or(&defaults), "veth0");
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!("pktgen-config-{}.txt", std::process::id()));
        std::fs::write(&path, "totpkts = 5\npps = 10\n").unwrap();

        let config = GeneratorConfig::from_path(&path, &GeneratorDefaults::default()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.total_packets, 5);
        assert_eq!(config.pps, Some(10));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = GeneratorConfig::from_path(
            "/nonexistent/pktgen/stream.txt",
            &GeneratorDefaults::default(),
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
