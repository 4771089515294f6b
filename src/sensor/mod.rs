//! # Checksummed Sensor Protocol
//!
//! Command/response framing used by the checksum-aware sensor families:
//! 16-bit command identifiers, one CRC-8 byte per 16-bit data word on the
//! wire, and a mandatory settle delay between command and response.
//!
//! - [`crc`] - the CRC-8 generator and per-word verification.
//! - [`command`] - the [`ChecksumCommandChannel`](command::ChecksumCommandChannel)
//!   request/response protocol with per-channel statistics.

pub mod command;
pub mod crc;

pub use command::{ChannelStats, ChecksumCommandChannel};
pub use crc::{crc8, crc8_word};
