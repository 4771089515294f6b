//! # regbus-rs - A Rust Crate for I2C Register Access and Command Framing
//!
//! The regbus-rs crate provides the reusable register-access and
//! command-framing core that I2C peripheral drivers (real-time clocks,
//! accelerometers, pressure/CO2/air-quality sensors, LED/GPIO expanders)
//! are built on: how a logical register is read from and written to a
//! shared, slow, half-duplex bus without corrupting adjacent bits or
//! silently accepting corrupted data.
//!
//! ## Features
//!
//! - Masked read-modify-write over cached single-byte registers
//! - Multi-byte register assembly with sign extension and fixed-point scaling
//! - BCD encode/decode with independent flag bits, as used throughout the
//!   real-time-clock family
//! - The variable-width alarm-rate bitmask codec, including the ambiguous
//!   all-zero pattern resolved by day-of-week context
//! - Checksummed command/response framing (16-bit commands, CRC-8 per
//!   16-bit word, settle-delay scheduling) for the newer sensor families
//! - A mock bus channel for hardware-free testing
//!
//! ## Usage
//!
//! Drivers bind register objects to a [`SharedBus`] wrapping a platform
//! [`BusChannel`] implementation:
//!
//! ```rust
//! use regbus_rs::{ByteRegister, MockBus, SharedBus};
//!
//! let mock = MockBus::new();
//! let bus = SharedBus::new(mock.clone());
//!
//! let mut control = ByteRegister::new(bus, 0x0E);
//! mock.queue_rx_data(&[0x1C]);
//! control.reload().unwrap();
//! // Set bit 7, preserve everything else
//! control.write_masked(!0x80, 0x80).unwrap();
//! assert_eq!(control.read(0x80), 0x80);
//! ```
//!
//! All operations are synchronous and blocking: a call either completes its
//! bus transaction before returning, or fails with [`RegBusError`]. The
//! crate never retries; retry policy belongs to the calling driver.

pub mod bus;
pub mod constants;
pub mod error;
pub mod logging;
pub mod register;
pub mod rtc;
pub mod sensor;
pub mod util;

pub use crate::error::RegBusError;
pub use crate::logging::{init_logger, log_info};

// Core bus and register types
pub use bus::mock::MockBus;
pub use bus::{BusChannel, SharedBus};
pub use register::{bcd_decode, bcd_encode, BcdField, ByteRegister, WordRegister};

// RTC register blocks
pub use rtc::{compute_rate, AlarmRate, AlarmRegisterBlock, ClockRegisterBlock};

// Checksummed sensor protocol
pub use sensor::{crc8, crc8_word, ChannelStats, ChecksumCommandChannel};
