//! # Register Access Layer
//!
//! This module provides the typed register objects that device drivers bind
//! to a [`SharedBus`](crate::bus::SharedBus) and a fixed device-local
//! address:
//!
//! - [`ByteRegister`] - a cached single-byte register with masked
//!   read-modify-write.
//! - [`WordRegister`] - a 2-4 byte big-endian register with two's-complement
//!   sign extension and optional fixed-point scaling.
//! - [`BcdField`] - a decimal field layered on a [`ByteRegister`], with an
//!   independent flag bit untouched by the numeric codec.
//!
//! Each object exclusively owns its cached raw value; the cache changes only
//! on `reload()` and on a write that succeeded on the bus.

pub mod bcd;
pub mod byte;
pub mod word;

pub use bcd::{bcd_decode, bcd_encode, BcdField};
pub use byte::ByteRegister;
pub use word::WordRegister;
