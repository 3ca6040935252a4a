//! Error types for pktgen

use thiserror::Error;

/// Result type alias for pktgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pktgen
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed MAC address string
    #[error("Invalid MAC address '{input}': {reason}")]
    Format { input: String, reason: String },

    /// Integer outside the 48-bit address space
    #[error("Value 0x{0:x} is outside the 48-bit MAC address space")]
    Range(u64),

    /// Configuration file error
    #[error("Config error at line {line}: {reason}")]
    Config { line: usize, reason: String },

    /// Failure reported by the transmit primitive
    #[error("Transmit error: {0}")]
    Transmit(String),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// Invalid parameter error
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Packet parsing error
    #[error("Packet parsing error: {0}")]
    PacketParsing(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a MAC format error for the given input
    pub fn format<S: Into<String>, R: Into<String>>(input: S, reason: R) -> Self {
        Error::Format {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error for a 1-based line number
    pub fn config<S: Into<String>>(line: usize, reason: S) -> Self {
        Error::Config {
            line,
            reason: reason.into(),
        }
    }

    /// Create a transmit error with a custom message
    pub fn transmit<S: Into<String>>(msg: S) -> Self {
        Error::Transmit(msg.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::config(3, "expected digits");
        assert_eq!(err.to_string(), "Config error at line 3: expected digits");
    }

    #[test]
    fn test_range_error_display() {
        let err = Error::Range(0x1_0000_0000_0000);
        assert!(err.to_string().contains("0x1000000000000"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
