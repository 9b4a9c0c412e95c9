#![doc = r#"
Variable length integers

Delta-times and the payload lengths of meta and system exclusive events are
stored as big-endian base-128 integers. Each byte contributes its low seven
bits, most significant group first, and a set high bit means another byte
follows.

```text
0x00                 -> 0
0x7F                 -> 127
0x81 0x00            -> 128
0x81 0x80 0x00       -> 16384
```

There is no length limit on the wire. Decoding fails with
[`ParseError::IntegerOverflow`] once the value no longer fits in a `u64`
instead of wrapping.
"#]

use super::{ParseError, ReadResult, Reader, inv_data};
use alloc::vec::Vec;

const CONTINUE: u8 = 0b1000_0000;
const PAYLOAD: u8 = 0b0111_1111;

/// Reads one variable length integer, consuming at least one byte.
pub fn read(reader: &mut Reader<'_>) -> ReadResult<u64> {
    let mut acc: u64 = 0;
    loop {
        let byte = reader.read_u8()?;
        if acc > (u64::MAX >> 7) {
            return Err(inv_data(reader, ParseError::IntegerOverflow));
        }
        acc = (acc << 7) | u64::from(byte & PAYLOAD);
        if byte & CONTINUE == 0 {
            return Ok(acc);
        }
    }
}

/// Encodes a value in its shortest variable length form.
pub fn encode(mut value: u64) -> Vec<u8> {
    let mut bytes = alloc::vec![(value as u8) & PAYLOAD];
    value >>= 7;
    while value > 0 {
        bytes.push((value as u8) & PAYLOAD | CONTINUE);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}

#[cfg(test)]
fn decode(bytes: &[u8]) -> ReadResult<u64> {
    read(&mut Reader::from_byte_slice(bytes))
}

#[test]
fn literal_vectors() {
    assert_eq!(decode(&[0x00]).unwrap(), 0);
    assert_eq!(decode(&[0x01]).unwrap(), 1);
    assert_eq!(decode(&[0x7F]).unwrap(), 127);
    assert_eq!(decode(&[0x81, 0x00]).unwrap(), 1 << 7);
    assert_eq!(decode(&[0x81, 0x80, 0x00]).unwrap(), 1 << 14);
    assert_eq!(decode(&[0x81, 0x80, 0x80, 0x00]).unwrap(), 1 << 21);
    assert_eq!(
        decode(&[0b1000_0001, 0b1000_0001, 0b1000_0001, 0b0000_0001]).unwrap(),
        0b1_0000001_0000001_0000001
    );
    assert_eq!(
        decode(&[0xFF, 0x80, 0x80, 0x8C, 0x02]).unwrap(),
        0b1111111_0000000_0000000_0001100_0000010
    );
}

#[test]
fn stops_at_first_clear_high_bit() {
    let mut reader = Reader::from_byte_slice(&[0b1000_0111, 0b1001_0001, 0b1101_0101, 0, 0]);
    assert_eq!(read(&mut reader).unwrap(), 0b0000111_0010001_1010101_0000000);
    assert_eq!(reader.remaining(), 1);

    let mut reader = Reader::from_byte_slice(&[0b0000_0111, 0b1001_0001]);
    assert_eq!(read(&mut reader).unwrap(), 7);
    assert_eq!(reader.remaining(), 1);
}

#[test]
fn leading_zero_groups_are_allowed() {
    assert_eq!(decode(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]).unwrap(), 1);
}

#[test]
fn missing_terminator_is_truncation() {
    let err = decode(&[0x81, 0x80]).unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(err.position(), 2);
    assert!(decode(&[]).unwrap_err().is_truncated());
}

#[test]
fn overflow_is_reported() {
    // ten groups of seven bits is 70 bits
    let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
    let err = decode(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &super::ReaderErrorKind::ParseError(ParseError::IntegerOverflow)
    );
}

#[test]
fn largest_value_fits() {
    assert_eq!(decode(&encode(u64::MAX)).unwrap(), u64::MAX);
    assert_eq!(encode(u64::MAX).len(), 10);
}

#[test]
fn round_trip() {
    let mut value = 1u64;
    while let Some(next) = value.checked_mul(3) {
        for n in [value - 1, value, value + 1] {
            assert_eq!(decode(&encode(n)).unwrap(), n);
        }
        value = next;
    }
    assert_eq!(encode(0), [0x00]);
    assert_eq!(encode(127), [0x7F]);
    assert_eq!(encode(128), [0x81, 0x00]);
    assert_eq!(encode(0x0FFF_FFFF), [0xFF, 0xFF, 0xFF, 0x7F]);
}
