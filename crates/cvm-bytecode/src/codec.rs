//! Big-endian encoding of 32-bit immediates.

/// Width of one encoded immediate in bytes.
pub const IMMEDIATE_SIZE: usize = 4;

/// Encode a signed immediate as four big-endian bytes.
#[inline]
pub fn encode_i32(value: i32) -> [u8; IMMEDIATE_SIZE] {
    value.to_be_bytes()
}

/// Decode four big-endian bytes into a signed immediate.
#[inline]
pub fn decode_i32(bytes: [u8; IMMEDIATE_SIZE]) -> i32 {
    i32::from_be_bytes(bytes)
}

/// Read an immediate from `code` at `offset`.
///
/// Returns `None` when fewer than four bytes remain.
#[inline]
pub fn read_i32(code: &[u8], offset: usize) -> Option<i32> {
    let end = offset.checked_add(IMMEDIATE_SIZE)?;
    let bytes: [u8; IMMEDIATE_SIZE] = code.get(offset..end)?.try_into().ok()?;
    Some(decode_i32(bytes))
}
