//! CLI interface for pktgen
//!
//! This crate provides the command-line interface: argument parsing and
//! the subcommand handlers the `pktgen` binary dispatches to.

pub mod args;
pub mod prompt;

pub use args::{Cli, Commands};

use pktgen_core::{GeneratorConfig, GeneratorDefaults, Interface, MacAddr, Result};
use pktgen_engine::{DatalinkTransmitter, Generator, TransmitStats, Transmitter};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Load a stream file into a generator
///
/// `iface`, when given, replaces the stream file's `iface`.
pub fn load_generator(
    stream_file: Option<PathBuf>,
    iface: Option<String>,
    defaults: GeneratorDefaults,
) -> Result<Generator> {
    let path = stream_file.unwrap_or_else(|| defaults.config_path.clone());
    let mut config = GeneratorConfig::from_path(&path, &defaults)?;

    if let Some(iface) = iface {
        if let Some(file_iface) = config.interface.as_deref().filter(|f| *f != iface) {
            info!(
                file = file_iface,
                cli = %iface,
                "Command-line interface overrides stream file"
            );
        }
        config = config.with_interface(iface);
    }

    Ok(Generator::new(config, defaults))
}

/// `pktgen send`
pub fn send(stream_file: Option<PathBuf>, iface: Option<String>) -> Result<TransmitStats> {
    let generator = load_generator(stream_file, iface, GeneratorDefaults::default())?;
    generator.run(&mut DatalinkTransmitter::new())
}

/// `pktgen build`: print the batch instead of sending it
pub fn build<W: Write>(stream_file: Option<PathBuf>, hex: bool, out: &mut W) -> Result<usize> {
    let generator = load_generator(stream_file, None, GeneratorDefaults::default())?;
    let fallback = DatalinkTransmitter::new()
        .hardware_address(generator.interface())
        .unwrap_or(MacAddr::ZERO);
    print_frames(&generator, fallback, hex, out)
}

/// Write one summary line per frame, plus a hex dump when `hex` is set
pub fn print_frames<W: Write>(
    generator: &Generator,
    fallback_source: MacAddr,
    hex: bool,
    out: &mut W,
) -> Result<usize> {
    let frames = generator.frames(fallback_source);

    writeln!(
        out,
        "{} frame(s) for {}, pps {}",
        frames.len(),
        generator.interface(),
        generator
            .config()
            .pps
            .map(|p| p.to_string())
            .unwrap_or_else(|| "unlimited".to_string())
    )?;

    for (idx, frame) in frames.iter().enumerate() {
        writeln!(out, "{:>6}  {}", idx + 1, frame)?;
        if hex {
            for (line, chunk) in frame.to_bytes().chunks(16).enumerate() {
                let bytes: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
                writeln!(out, "        {:04x}  {}", line * 16, bytes.join(" "))?;
            }
        }
    }

    Ok(frames.len())
}

/// `pktgen interfaces`
pub fn interfaces<W: Write>(out: &mut W) -> Result<()> {
    for iface in Interface::list_all() {
        let marker = if iface.is_loopback { " [loopback]" } else { "" };
        writeln!(out, "{}{}", iface, marker)?;
    }
    Ok(())
}
