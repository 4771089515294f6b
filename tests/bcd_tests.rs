//! Unit tests for the BCD codec and the flag-carrying BCD field.

use regbus_rs::{bcd_decode, bcd_encode, BcdField, ByteRegister, MockBus, SharedBus};

fn seconds_field() -> (MockBus, BcdField<MockBus>) {
    let mock = MockBus::new();
    let register = ByteRegister::new(SharedBus::new(mock.clone()), 0x00);
    // Seconds layout: BCD value in bits 0-6, independent flag in bit 7
    let field = BcdField::new(register, 0x7F).with_flag_bit(0x80);
    (mock, field)
}

/// Tests the decode formula against hand-computed values.
#[test]
fn test_decode_known_values() {
    assert_eq!(bcd_decode(0x00, 0xFF), 0);
    assert_eq!(bcd_decode(0x42, 0xFF), 42);
    assert_eq!(bcd_decode(0x99, 0xFF), 99);
}

/// Tests that the mask drops flag bits from the tens digit.
#[test]
fn test_decode_ignores_flag_bit() {
    // 59 seconds with the flag bit set
    assert_eq!(bcd_decode(0xD9, 0x7F), 59);
}

/// Tests that writing the value leaves the flag bit alone.
#[test]
fn test_set_value_preserves_flag() {
    let (mock, mut field) = seconds_field();
    mock.queue_rx_data(&[0x80]); // flag set, value 0
    field.reload().unwrap();

    field.set_value(25).unwrap();

    assert_eq!(field.value(), 25);
    assert!(field.flag());
    assert_eq!(mock.last_tx().unwrap(), vec![0x00, 0x80 | 0x25]);
}

/// Tests that toggling the flag leaves the value alone.
#[test]
fn test_set_flag_preserves_value() {
    let (mock, mut field) = seconds_field();
    mock.queue_rx_data(&[0x59]);
    field.reload().unwrap();

    field.set_flag(true).unwrap();
    assert_eq!(field.value(), 59);
    assert!(field.flag());

    field.set_flag(false).unwrap();
    assert_eq!(field.value(), 59);
    assert!(!field.flag());
    assert_eq!(mock.last_tx().unwrap(), vec![0x00, 0x59]);
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// decode(encode(d)) == d for every two-digit decimal.
        #[test]
        fn prop_bcd_round_trip(d in 0u8..=99) {
            prop_assert_eq!(bcd_decode(bcd_encode(d), 0xFF), d);
        }

        /// Encoded nibbles are always valid decimal digits.
        #[test]
        fn prop_bcd_nibbles_are_digits(d in 0u8..=99) {
            let encoded = bcd_encode(d);
            prop_assert!(encoded >> 4 <= 9);
            prop_assert!(encoded & 0x0F <= 9);
        }
    }
}
