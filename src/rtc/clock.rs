//! Seven-register BCD clock block decoded to calendar date/time.

use crate::bus::{BusChannel, SharedBus};
use crate::constants::{CENTURY_FLAG, DAY_OF_MONTH_VALUE_MASK, MONTH_VALUE_MASK};
use crate::error::RegBusError;
use crate::register::{bcd_decode, bcd_encode};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Offsets within the clock block.
const SECONDS: usize = 0;
const MINUTES: usize = 1;
const HOURS: usize = 2;
const WEEKDAY: usize = 3;
const DAY: usize = 4;
const MONTH: usize = 5;
const YEAR: usize = 6;
const BLOCK_LEN: usize = 7;

/// The RTC family's clock block: seconds, minutes, hours, weekday, day,
/// month (with the century flag in bit 7) and two-digit year, all BCD
/// except the plain 0-6 weekday.
///
/// Covers years 2000-2199; the century flag is the +100-years bit.
pub struct ClockRegisterBlock<B: BusChannel> {
    bus: SharedBus<B>,
    address: u8,
}

impl<B: BusChannel> ClockRegisterBlock<B> {
    /// Binds the clock block starting at `address` (the seconds register).
    pub fn new(bus: SharedBus<B>, address: u8) -> Self {
        ClockRegisterBlock { bus, address }
    }

    /// Burst-reads the block and decodes it to a calendar date/time.
    ///
    /// Registers holding an impossible calendar combination (a month of 13,
    /// a day of 0) fail with [`RegBusError::InvalidArgument`] rather than
    /// producing a wrong date.
    pub fn read_datetime(&mut self) -> Result<NaiveDateTime, RegBusError> {
        let address = self.address;
        let regs = self
            .bus
            .transaction(|bus| bus.read_burst(address, BLOCK_LEN))?;

        let second = bcd_decode(regs[SECONDS], 0x7F);
        let minute = bcd_decode(regs[MINUTES], 0x7F);
        let hour = bcd_decode(regs[HOURS], 0x3F);
        let day = bcd_decode(regs[DAY], DAY_OF_MONTH_VALUE_MASK);
        let month = bcd_decode(regs[MONTH], MONTH_VALUE_MASK);
        let century = if regs[MONTH] & CENTURY_FLAG != 0 { 100 } else { 0 };
        let year = 2000 + century + i32::from(bcd_decode(regs[YEAR], 0xFF));

        NaiveDate::from_ymd_opt(year, u32::from(month), u32::from(day))
            .and_then(|date| {
                date.and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
            })
            .ok_or_else(|| {
                RegBusError::InvalidArgument(format!(
                    "clock registers hold an invalid date: {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
                ))
            })
    }

    /// Encodes a calendar date/time and writes the block in one burst.
    ///
    /// Years outside 2000-2199 are not representable in two BCD digits plus
    /// the century flag and are rejected.
    pub fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), RegBusError> {
        let year = datetime.year();
        if !(2000..=2199).contains(&year) {
            return Err(RegBusError::InvalidArgument(format!(
                "year {year} outside the 2000-2199 clock range"
            )));
        }

        let mut regs = [0u8; BLOCK_LEN];
        regs[SECONDS] = bcd_encode(datetime.second() as u8);
        regs[MINUTES] = bcd_encode(datetime.minute() as u8);
        regs[HOURS] = bcd_encode(datetime.hour() as u8);
        regs[WEEKDAY] = datetime.weekday().num_days_from_sunday() as u8;
        regs[DAY] = bcd_encode(datetime.day() as u8);
        regs[MONTH] = bcd_encode(datetime.month() as u8);
        if year >= 2100 {
            regs[MONTH] |= CENTURY_FLAG;
        }
        regs[YEAR] = bcd_encode((year % 100) as u8);

        let address = self.address;
        self.bus
            .transaction(|bus| bus.write_burst(address, &regs))
    }
}
