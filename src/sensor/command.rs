//! Command/response framing over a shared bus channel.
//!
//! A command is a 16-bit identifier sent MSB first. Data words accompanying
//! a command are 16-bit, each followed on the wire by one CRC-8 byte over
//! its two bytes. A response is read after a device-specific settle delay as
//! groups of three bytes (MSB, LSB, CRC); every group's checksum is verified
//! before any data is returned.

use crate::bus::{BusChannel, SharedBus};
use crate::constants::RESPONSE_GROUP_LEN;
use crate::error::RegBusError;
use crate::sensor::crc::{crc8_word, verify_word};
use crate::util::hex::encode_hex;
use bytes::{BufMut, BytesMut};
use log::{debug, warn};
use nom::{bytes::complete::take, IResult};

/// Per-channel transaction counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// Commands written to the bus, with or without data words.
    pub commands_sent: u64,
    /// Responses that decoded with every checksum intact.
    pub responses_received: u64,
    /// Transport failures surfaced to the caller.
    pub io_errors: u64,
    /// Responses rejected for a CRC mismatch.
    pub checksum_errors: u64,
}

/// Request/response protocol handle for one checksum-aware device.
///
/// The send-delay-receive triad of
/// [`request_response`](ChecksumCommandChannel::request_response) runs under
/// a single bus guard, so no other register traffic interleaves with an
/// in-flight command.
pub struct ChecksumCommandChannel<B: BusChannel> {
    bus: SharedBus<B>,
    stats: ChannelStats,
}

impl<B: BusChannel> ChecksumCommandChannel<B> {
    /// Binds a command channel to a bus handle.
    pub fn new(bus: SharedBus<B>) -> Self {
        ChecksumCommandChannel {
            bus,
            stats: ChannelStats::default(),
        }
    }

    /// The counters accumulated by this channel.
    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    /// Sends a bare command identifier, MSB first, in one transaction.
    pub fn send_command(&mut self, id: u16) -> Result<(), RegBusError> {
        let frame = id.to_be_bytes();
        self.tracked(|bus| bus.write_raw(&frame))?;
        self.stats.commands_sent += 1;
        Ok(())
    }

    /// Sends a command with data words; each word is followed on the wire by
    /// its CRC-8 byte. The whole frame goes out in one transaction.
    pub fn send_command_with_args(&mut self, id: u16, words: &[u16]) -> Result<(), RegBusError> {
        let frame = pack_command(id, words);
        debug!("cmd 0x{id:04X}: {}", encode_hex(&frame));
        self.tracked(|bus| bus.write_raw(&frame))?;
        self.stats.commands_sent += 1;
        Ok(())
    }

    /// Raw-byte variant of
    /// [`send_command_with_args`](ChecksumCommandChannel::send_command_with_args);
    /// the payload must split evenly into 16-bit words.
    pub fn send_command_with_data(&mut self, id: u16, data: &[u8]) -> Result<(), RegBusError> {
        if data.len() % 2 != 0 {
            return Err(RegBusError::OddPayloadLength(data.len()));
        }
        let words: Vec<u16> = data
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        self.send_command_with_args(id, &words)
    }

    /// Sends a command, blocks for the settle delay, reads
    /// `expected_words` word+CRC groups and returns the verified data bytes
    /// with the CRC bytes stripped.
    ///
    /// A single corrupted group fails the whole response with
    /// [`RegBusError::Checksum`]; no partially-valid data is returned.
    pub fn request_response(
        &mut self,
        id: u16,
        expected_words: usize,
        delay_ms: u64,
    ) -> Result<Vec<u8>, RegBusError> {
        let frame = id.to_be_bytes();
        let raw = self.tracked(|bus| {
            bus.write_raw(&frame)?;
            bus.delay(delay_ms);
            bus.read_raw(expected_words * RESPONSE_GROUP_LEN)
        })?;
        self.stats.commands_sent += 1;

        match decode_response(&raw) {
            Ok(data) => {
                self.stats.responses_received += 1;
                Ok(data)
            }
            Err(err) => {
                if matches!(err, RegBusError::Checksum { .. }) {
                    self.stats.checksum_errors += 1;
                    warn!("cmd 0x{id:04X}: {err} in response {}", encode_hex(&raw));
                }
                Err(err)
            }
        }
    }

    /// Reads a response whose words are big-endian 16-bit character codes
    /// (product-name and serial-number style commands); trailing NUL and
    /// whitespace are trimmed.
    pub fn request_ascii_response(
        &mut self,
        id: u16,
        expected_words: usize,
        delay_ms: u64,
    ) -> Result<String, RegBusError> {
        let data = self.request_response(id, expected_words, delay_ms)?;
        let text: String = data
            .chunks_exact(2)
            .map(|pair| {
                let code = u32::from(u16::from_be_bytes([pair[0], pair[1]]));
                char::from_u32(code).unwrap_or('?')
            })
            .collect();
        Ok(text
            .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string())
    }

    fn tracked<T>(
        &mut self,
        f: impl FnOnce(&mut B) -> Result<T, RegBusError>,
    ) -> Result<T, RegBusError> {
        let result = self.bus.transaction(f);
        if result.is_err() {
            self.stats.io_errors += 1;
        }
        result
    }
}

/// Packs a command identifier and its data words into one wire frame.
pub fn pack_command(id: u16, words: &[u16]) -> Vec<u8> {
    let mut frame = BytesMut::with_capacity(2 + words.len() * RESPONSE_GROUP_LEN);
    frame.put_u16(id);
    for &word in words {
        frame.put_u16(word);
        frame.put_u8(crc8_word(word));
    }
    frame.to_vec()
}

fn parse_group(input: &[u8]) -> IResult<&[u8], (u8, u8, u8)> {
    let (input, group) = take(RESPONSE_GROUP_LEN)(input)?;
    Ok((input, (group[0], group[1], group[2])))
}

/// Decodes a response buffer of word+CRC groups into the plain data bytes.
///
/// The buffer length must be a whole number of 3-byte groups; every group's
/// CRC is recomputed and compared before anything is returned.
pub fn decode_response(raw: &[u8]) -> Result<Vec<u8>, RegBusError> {
    if raw.len() % RESPONSE_GROUP_LEN != 0 {
        return Err(RegBusError::MalformedResponse(raw.len()));
    }

    let mut data = Vec::with_capacity(raw.len() / RESPONSE_GROUP_LEN * 2);
    let mut rest = raw;
    let mut word_index = 0;
    while !rest.is_empty() {
        let (remaining, (msb, lsb, transmitted)) = parse_group(rest)
            .map_err(|_| RegBusError::MalformedResponse(raw.len()))?;
        verify_word(msb, lsb, transmitted, word_index)?;
        data.push(msb);
        data.push(lsb);
        rest = remaining;
        word_index += 1;
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::crc::crc8;

    #[test]
    fn test_pack_command_interleaves_crcs() {
        let frame = pack_command(0x4600, &[0x0002]);
        assert_eq!(frame[..2], [0x46, 0x00]);
        assert_eq!(frame[2..4], [0x00, 0x02]);
        assert_eq!(frame[4], crc8(&[0x00, 0x02]));
    }

    #[test]
    fn test_decode_response_strips_crcs() {
        let raw = [0xBE, 0xEF, 0x92, 0x00, 0x00, 0x81];
        assert_eq!(decode_response(&raw).unwrap(), vec![0xBE, 0xEF, 0x00, 0x00]);
    }

    #[test]
    fn test_decode_response_rejects_ragged_length() {
        assert!(matches!(
            decode_response(&[0xBE, 0xEF]),
            Err(RegBusError::MalformedResponse(2))
        ));
    }
}
