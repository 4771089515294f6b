//! # Register Bus Error Handling
//!
//! This module defines the RegBusError enum, which represents the different
//! error types that can occur in the regbus-rs crate.

use thiserror::Error;

/// Represents the different error types that can occur in the register bus crate.
#[derive(Debug, Error)]
pub enum RegBusError {
    /// Indicates a transport-level failure on the underlying bus.
    #[error("Bus I/O error: {0}")]
    Io(String),

    /// Indicates a CRC mismatch in a checksummed response word.
    #[error("Checksum mismatch in word {word_index}: expected 0x{expected:02X}, calculated 0x{calculated:02X}")]
    Checksum {
        word_index: usize,
        expected: u8,
        calculated: u8,
    },

    /// Indicates an unsupported multi-byte register width.
    #[error("Unsupported register width: {0} bytes (expected 2-4)")]
    UnsupportedWidth(usize),

    /// Indicates a command payload with an odd number of bytes.
    #[error("Odd command payload length: {0} bytes (words are 16-bit)")]
    OddPayloadLength(usize),

    /// Indicates a response buffer whose length is not a whole number of
    /// word+CRC groups.
    #[error("Malformed response length: {0} bytes (not a multiple of 3)")]
    MalformedResponse(usize),

    /// Indicates a short read from the transport.
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// Indicates a caller precondition violation not covered by a more
    /// specific variant.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RegBusError {
    /// Wraps a transport error message into the I/O variant.
    pub fn io<E: std::fmt::Display>(err: E) -> Self {
        RegBusError::Io(err.to_string())
    }
}
