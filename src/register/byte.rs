//! Single-byte register access with masked read-modify-write.

use crate::bus::{BusChannel, SharedBus};
use crate::error::RegBusError;
use log::debug;

/// A single-byte device register with a local cache.
///
/// The register is bound permanently to one bus handle and one device-local
/// address. `read` never touches the bus; callers that need freshness call
/// [`reload`](ByteRegister::reload) first.
///
/// The cache is zero-initialized. A register holding multiple independent
/// fields must be reloaded once before its first masked write, otherwise the
/// write silently clears the untouched fields. This is a documented
/// precondition rather than an implicit bus transaction on every write.
pub struct ByteRegister<B: BusChannel> {
    bus: SharedBus<B>,
    address: u8,
    value: u8,
}

impl<B: BusChannel> ByteRegister<B> {
    /// Binds a register to a bus handle and a device-local address.
    pub fn new(bus: SharedBus<B>, address: u8) -> Self {
        ByteRegister {
            bus,
            address,
            value: 0,
        }
    }

    /// The device-local address this register is bound to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// The raw cached value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Reads the register from the bus and replaces the cache.
    pub fn reload(&mut self) -> Result<(), RegBusError> {
        let address = self.address;
        self.value = self.bus.transaction(|bus| bus.read_byte(address))?;
        Ok(())
    }

    /// Returns `cached & mask` without a bus transaction.
    pub fn read(&self, mask: u8) -> u8 {
        self.value & mask
    }

    /// Computes `(cached & clear_mask) | set_bits`, writes the byte to the
    /// bus, and updates the cache only if the write succeeded.
    ///
    /// `clear_mask` is the preserved region: callers pass the complement of
    /// the field being written (`!field_mask`). `set_bits` must lie outside
    /// `clear_mask`, or the composition is ill-defined.
    ///
    /// The cache is never left claiming a value the device did not accept: a
    /// failed write leaves it at the pre-write state.
    pub fn write_masked(&mut self, clear_mask: u8, set_bits: u8) -> Result<(), RegBusError> {
        debug_assert_eq!(set_bits & clear_mask, 0, "set bits overlap preserved bits");
        let new_value = (self.value & clear_mask) | set_bits;
        let address = self.address;
        self.bus
            .transaction(|bus| bus.write_byte(address, new_value))?;
        debug!("reg 0x{address:02X}: 0x{:02X} -> 0x{new_value:02X}", self.value);
        self.value = new_value;
        Ok(())
    }

    /// Replaces the whole byte, cache discipline as in
    /// [`write_masked`](ByteRegister::write_masked).
    pub fn write(&mut self, value: u8) -> Result<(), RegBusError> {
        self.write_masked(0x00, value)
    }
}
