//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pktgen")]
#[command(version, about = "Ethernet/VLAN packet generator", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the frames described by a stream file and transmit them
    Send {
        /// Stream file (key=value lines), defaults to input.txt
        #[arg(value_name = "STREAM_FILE")]
        stream_file: Option<PathBuf>,

        /// Interface to send on, overrides `iface` in the stream file
        #[arg(value_name = "IFACE")]
        iface: Option<String>,
    },

    /// Build the frames and print them without transmitting
    Build {
        /// Stream file (key=value lines), defaults to input.txt
        #[arg(value_name = "STREAM_FILE")]
        stream_file: Option<PathBuf>,

        /// Print a hex dump of every frame
        #[arg(long)]
        hex: bool,
    },

    /// List available network interfaces
    Interfaces,

    /// Ask for a name in the terminal and greet back
    Prompt,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
