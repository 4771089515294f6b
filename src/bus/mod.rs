//! # Bus Transport Layer
//!
//! This module provides the abstraction over the physical half-duplex bus
//! that every register and command channel in this crate talks through.
//!
//! ## Features
//! - The [`BusChannel`] trait: raw read/write/delay primitives supplied by a
//!   platform binding, with addressed register operations layered on top.
//! - The [`SharedBus`] handle: a cloneable, coarse-grained lock around one
//!   transport, serializing each logical operation across the register
//!   objects that share it.
//! - A mock transport for hardware-free testing ([`mock::MockBus`]).
//!
//! ## Usage
//!
//! Platform bindings implement only the raw primitives; the addressed
//! operations are derived from them the way an I2C transaction is framed
//! (register pointer byte, then data):
//!
//! ```ignore
//! struct LinuxI2c { /* file descriptor, device address */ }
//!
//! impl BusChannel for LinuxI2c {
//!     fn write_raw(&mut self, bytes: &[u8]) -> Result<(), RegBusError> { /* ... */ }
//!     fn read_raw(&mut self, len: usize) -> Result<Vec<u8>, RegBusError> { /* ... */ }
//!     fn delay(&mut self, ms: u64) { std::thread::sleep(Duration::from_millis(ms)); }
//! }
//! ```

pub mod mock;

use crate::error::RegBusError;
use crate::util::hex::encode_hex;
use log::trace;
use std::sync::{Arc, Mutex, MutexGuard};

/// Blocking transport to one device on a shared bus.
///
/// All operations are synchronous: a call either completes the bus
/// transaction before returning, or fails with [`RegBusError::Io`]. Delays
/// block the calling thread; correctness of settle-delay protocols depends
/// on the delay elapsing, not merely being scheduled.
pub trait BusChannel {
    /// Writes the given bytes to the device in one bus transaction.
    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), RegBusError>;

    /// Reads `len` bytes from the device in one bus transaction.
    ///
    /// Implementations must return exactly `len` bytes or an error; the
    /// register layer treats a short read as a transport failure.
    fn read_raw(&mut self, len: usize) -> Result<Vec<u8>, RegBusError>;

    /// Blocks the calling thread for `ms` milliseconds.
    fn delay(&mut self, ms: u64);

    /// Writes one byte to a device-local register.
    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), RegBusError> {
        self.write_raw(&[register, value])
    }

    /// Writes a burst of bytes starting at a device-local register.
    fn write_burst(&mut self, register: u8, data: &[u8]) -> Result<(), RegBusError> {
        let mut frame = Vec::with_capacity(data.len() + 1);
        frame.push(register);
        frame.extend_from_slice(data);
        self.write_raw(&frame)
    }

    /// Reads one byte from a device-local register.
    fn read_byte(&mut self, register: u8) -> Result<u8, RegBusError> {
        let bytes = self.read_burst(register, 1)?;
        Ok(bytes[0])
    }

    /// Reads `len` bytes starting at a device-local register.
    fn read_burst(&mut self, register: u8, len: usize) -> Result<Vec<u8>, RegBusError> {
        self.write_raw(&[register])?;
        let bytes = self.read_raw(len)?;
        if bytes.len() != len {
            return Err(RegBusError::ShortRead {
                expected: len,
                actual: bytes.len(),
            });
        }
        trace!("read_burst reg=0x{register:02X} -> {}", encode_hex(&bytes));
        Ok(bytes)
    }
}

/// Cloneable handle to one shared [`BusChannel`].
///
/// Every register object bound to the same physical device holds a clone of
/// the same `SharedBus`. Each logical operation acquires the lock as a
/// scoped guard released on all exit paths; multi-step protocols (the
/// command channel's send-delay-receive triad) hold the guard for the whole
/// sequence so no other register's traffic interleaves.
pub struct SharedBus<B: BusChannel> {
    inner: Arc<Mutex<B>>,
}

impl<B: BusChannel> Clone for SharedBus<B> {
    fn clone(&self) -> Self {
        SharedBus {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: BusChannel> SharedBus<B> {
    /// Wraps a transport into a shareable handle.
    pub fn new(bus: B) -> Self {
        SharedBus {
            inner: Arc::new(Mutex::new(bus)),
        }
    }

    /// Runs one logical operation with exclusive access to the transport.
    ///
    /// The lock is held for the duration of the closure and released on all
    /// exit paths, including errors.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut B) -> Result<T, RegBusError>,
    ) -> Result<T, RegBusError> {
        let mut guard = self.lock();
        f(&mut guard)
    }

    fn lock(&self) -> MutexGuard<'_, B> {
        // A poisoned mutex means a panic mid-transaction; the bus state is
        // unknown either way, so continue with the inner value.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
