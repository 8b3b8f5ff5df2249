//! Tests for immediate encoding.

use super::codec::{decode_i32, encode_i32, read_i32};

#[test]
fn encode_is_big_endian() {
    assert_eq!(encode_i32(5), [0x00, 0x00, 0x00, 0x05]);
    assert_eq!(encode_i32(0x0102_0304), [0x01, 0x02, 0x03, 0x04]);
    assert_eq!(encode_i32(-1), [0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(encode_i32(i32::MIN), [0x80, 0x00, 0x00, 0x00]);
}

#[test]
fn decode_sign_extends() {
    assert_eq!(decode_i32([0xFF, 0xFF, 0xFF, 0xFE]), -2);
    assert_eq!(decode_i32([0x7F, 0xFF, 0xFF, 0xFF]), i32::MAX);
}

#[test]
fn roundtrip_edges() {
    for x in [0, 1, -1, 255, 256, -256, 4096, i32::MAX, i32::MIN, i32::MIN + 1] {
        assert_eq!(decode_i32(encode_i32(x)), x);
    }
}

#[test]
fn roundtrip_sweep() {
    let mut x = i32::MIN;
    loop {
        assert_eq!(decode_i32(encode_i32(x)), x, "roundtrip failed for {x}");
        match x.checked_add(65_521 * 257) {
            Some(next) => x = next,
            None => break,
        }
    }
}

#[test]
fn read_at_offset() {
    let code = [0x0A, 0x00, 0x00, 0x01, 0x00, 0xFF];
    assert_eq!(read_i32(&code, 1), Some(256));
    assert_eq!(read_i32(&code, 2), Some(0x0001_00FF));
}

#[test]
fn read_truncated() {
    let code = [0x0A, 0x00, 0x00];
    assert_eq!(read_i32(&code, 1), None);
    assert_eq!(read_i32(&code, 10), None);
    assert_eq!(read_i32(&code, usize::MAX), None);
}
