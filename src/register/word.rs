//! Multi-byte register assembly and disassembly.

use crate::bus::{BusChannel, SharedBus};
use crate::constants::{AUTO_INCREMENT_FLAG, WORD_REGISTER_MAX_WIDTH, WORD_REGISTER_MIN_WIDTH};
use crate::error::RegBusError;

/// A 2-4 byte device register read and written as one integer.
///
/// Bytes are assembled big-endian (most-significant byte at the lowest
/// address). When the configured width is narrower than 32 bits and the top
/// bit of that width is set, the value is sign-extended, reproducing the
/// exact negative values signed sensor outputs encode.
///
/// The high bit of the configured address is the hardware's auto-increment
/// flag: it is sent on the wire so the device steps its address pointer
/// through the burst, and stripped from the value [`address`](WordRegister::address)
/// reports.
///
/// `as_int()` on a register that was never reloaded returns 0, which is
/// indistinguishable from a genuine zero reading. Reload first.
pub struct WordRegister<B: BusChannel> {
    bus: SharedBus<B>,
    address: u8,
    width: usize,
    scale: f32,
    bytes: [u8; WORD_REGISTER_MAX_WIDTH],
}

impl<B: BusChannel> WordRegister<B> {
    /// Binds an `width`-byte register to a bus handle and an address.
    ///
    /// Widths outside 2-4 bytes are rejected with
    /// [`RegBusError::UnsupportedWidth`].
    pub fn new(bus: SharedBus<B>, address: u8, width: usize) -> Result<Self, RegBusError> {
        if !(WORD_REGISTER_MIN_WIDTH..=WORD_REGISTER_MAX_WIDTH).contains(&width) {
            return Err(RegBusError::UnsupportedWidth(width));
        }
        Ok(WordRegister {
            bus,
            address,
            width,
            scale: 1.0,
            bytes: [0; WORD_REGISTER_MAX_WIDTH],
        })
    }

    /// Attaches a fixed-point scale applied by [`as_scaled`](WordRegister::as_scaled).
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// The flag-free device-local address.
    pub fn address(&self) -> u8 {
        self.address & !AUTO_INCREMENT_FLAG
    }

    /// The configured width in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Issues one burst read at the configured address (auto-increment flag
    /// included) and replaces the cached bytes.
    pub fn reload(&mut self) -> Result<(), RegBusError> {
        let (address, width) = (self.address, self.width);
        let bytes = self
            .bus
            .transaction(|bus| bus.read_burst(address, width))?;
        self.bytes[..width].copy_from_slice(&bytes);
        Ok(())
    }

    /// Assembles the cached bytes big-endian into a signed 32-bit value,
    /// sign-extending from the configured width.
    pub fn as_int(&self) -> i32 {
        let mut accumulator: u32 = 0;
        for &byte in &self.bytes[..self.width] {
            accumulator = (accumulator << 8) | u32::from(byte);
        }
        let bits = self.width * 8;
        if bits < 32 && accumulator & (1 << (bits - 1)) != 0 {
            accumulator |= u32::MAX << bits;
        }
        accumulator as i32
    }

    /// The assembled value multiplied by the configured scale.
    pub fn as_scaled(&self) -> f32 {
        self.as_int() as f32 * self.scale
    }

    /// Truncates `value` to the configured width, writes the bytes
    /// most-significant first in one burst, and updates the cache only if
    /// the write succeeded.
    pub fn write(&mut self, value: i32) -> Result<(), RegBusError> {
        let (address, width) = (self.address, self.width);
        let mut bytes = [0u8; WORD_REGISTER_MAX_WIDTH];
        for i in 0..width {
            bytes[i] = (value >> (8 * (width - 1 - i))) as u8;
        }
        self.bus
            .transaction(|bus| bus.write_burst(address, &bytes[..width]))?;
        self.bytes = bytes;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::MockBus;

    #[test]
    fn test_rejects_unsupported_widths() {
        let bus = SharedBus::new(MockBus::new());
        assert!(matches!(
            WordRegister::new(bus.clone(), 0x00, 1),
            Err(RegBusError::UnsupportedWidth(1))
        ));
        assert!(matches!(
            WordRegister::new(bus, 0x00, 5),
            Err(RegBusError::UnsupportedWidth(5))
        ));
    }

    #[test]
    fn test_auto_increment_flag_on_wire_but_not_reported() {
        let mock = MockBus::new();
        let bus = SharedBus::new(mock.clone());
        let mut reg = WordRegister::new(bus, 0x80 | 0x28, 3).unwrap();
        assert_eq!(reg.address(), 0x28);

        mock.queue_rx_data(&[0x01, 0x02, 0x03]);
        reg.reload().unwrap();
        // The register pointer transaction carries the flag
        assert_eq!(mock.tx_transactions(), vec![vec![0xA8]]);
    }

    #[test]
    fn test_sign_extension_from_three_bytes() {
        let mock = MockBus::new();
        let mut reg = WordRegister::new(SharedBus::new(mock.clone()), 0x00, 3).unwrap();
        mock.queue_rx_data(&[0x80, 0x00, 0x00]);
        reg.reload().unwrap();
        assert_eq!(reg.as_int(), 0x80_0000 - 0x100_0000);
    }

    #[test]
    fn test_write_emits_most_significant_first() {
        let mock = MockBus::new();
        let mut reg = WordRegister::new(SharedBus::new(mock.clone()), 0x10, 2).unwrap();
        reg.write(0x1234).unwrap();
        assert_eq!(mock.last_tx().unwrap(), vec![0x10, 0x12, 0x34]);
        assert_eq!(reg.as_int(), 0x1234);
    }
}
