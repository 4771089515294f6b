//! # RTC Register Blocks
//!
//! Multi-register structures of the real-time-clock family:
//!
//! - [`alarm`] - the variable-width alarm-rate bitmask codec and the
//!   stateful [`AlarmRegisterBlock`](alarm::AlarmRegisterBlock).
//! - [`clock`] - the seven-register BCD clock block decoded to and from
//!   calendar date/time.

pub mod alarm;
pub mod clock;

pub use alarm::{apply_rate, compute_rate, AlarmRate, AlarmRegisterBlock};
pub use clock::ClockRegisterBlock;
