//! Unit tests for the seven-register clock block.

use chrono::{NaiveDate, NaiveDateTime};
use regbus_rs::error::RegBusError;
use regbus_rs::{ClockRegisterBlock, MockBus, SharedBus};

fn clock_at(address: u8) -> (MockBus, ClockRegisterBlock<MockBus>) {
    let mock = MockBus::new();
    let clock = ClockRegisterBlock::new(SharedBus::new(mock.clone()), address);
    (mock, clock)
}

fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

/// Tests decoding a twenty-first-century date.
#[test]
fn test_read_datetime() {
    let (mock, mut clock) = clock_at(0x00);
    // 2024-02-29 23:59:58, Thursday (weekday register ignored on read)
    mock.queue_rx_data(&[0x58, 0x59, 0x23, 0x04, 0x29, 0x02, 0x24]);

    let dt = clock.read_datetime().unwrap();
    assert_eq!(dt, datetime(2024, 2, 29, 23, 59, 58));
}

/// Tests that writes and reads agree across both centuries.
#[test]
fn test_set_then_read_round_trip() {
    for dt in [
        datetime(2000, 1, 1, 0, 0, 0),
        datetime(2024, 8, 7, 12, 34, 56),
        datetime(2105, 3, 7, 4, 5, 6),
        datetime(2199, 12, 31, 23, 59, 59),
    ] {
        let (mock, mut clock) = clock_at(0x02);
        clock.set_datetime(&dt).unwrap();

        // Feed the written block (minus the register pointer) back
        let written = mock.last_tx().unwrap();
        assert_eq!(written[0], 0x02);
        mock.queue_rx_data(&written[1..]);

        assert_eq!(clock.read_datetime().unwrap(), dt, "round trip for {dt}");
    }
}

/// Tests the century flag on the write path.
#[test]
fn test_century_flag_written_for_2100s() {
    let (mock, mut clock) = clock_at(0x00);
    clock.set_datetime(&datetime(2130, 6, 15, 1, 2, 3)).unwrap();

    let written = mock.last_tx().unwrap();
    // Month register carries the century flag
    assert_eq!(written[6], 0x80 | 0x06);
    assert_eq!(written[7], 0x30);
}

/// Tests that out-of-range years are rejected before any bus traffic.
#[test]
fn test_year_range_enforced() {
    let (mock, mut clock) = clock_at(0x00);
    let result = clock.set_datetime(&datetime(1999, 12, 31, 0, 0, 0));

    assert!(matches!(result, Err(RegBusError::InvalidArgument(_))));
    assert!(mock.tx_transactions().is_empty());
}

/// Tests that nonsense register contents surface an error instead of a
/// fabricated date.
#[test]
fn test_invalid_registers_rejected() {
    let (mock, mut clock) = clock_at(0x00);
    // Day 0 does not exist
    mock.queue_rx_data(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x24]);

    assert!(clock.read_datetime().is_err());
}
