//! Little-endian primitive codecs and slot swaps over plain byte slices.
//!
//! Shared by the heap and native byte media, which differ only in where
//! their bytes come from.

#[inline]
fn array<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

#[inline]
pub(crate) fn get_i8(bytes: &[u8], offset: usize) -> i8 {
    bytes[offset] as i8
}

#[inline]
pub(crate) fn get_i16(bytes: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes(array(bytes, offset))
}

#[inline]
pub(crate) fn get_i32(bytes: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(array(bytes, offset))
}

#[inline]
pub(crate) fn get_i64(bytes: &[u8], offset: usize) -> i64 {
    i64::from_le_bytes(array(bytes, offset))
}

#[inline]
pub(crate) fn get_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes(array(bytes, offset))
}

#[inline]
pub(crate) fn get_f64(bytes: &[u8], offset: usize) -> f64 {
    f64::from_le_bytes(array(bytes, offset))
}

#[inline]
pub(crate) fn put(bytes: &mut [u8], offset: usize, value: &[u8]) {
    bytes[offset..offset + value.len()].copy_from_slice(value);
}

/// Exchange slots `a` and `b` of `stride` bytes within one buffer.
pub(crate) fn swap_within(bytes: &mut [u8], stride: usize, a: usize, b: usize) {
    if a == b {
        return;
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let (left, right) = bytes.split_at_mut(hi * stride);
    left[lo * stride..(lo + 1) * stride].swap_with_slice(&mut right[..stride]);
}

/// Exchange slot `a` of `left` with slot `b` of `right`.
pub(crate) fn swap_between(left: &mut [u8], a: usize, right: &mut [u8], b: usize, stride: usize) {
    left[a * stride..(a + 1) * stride].swap_with_slice(&mut right[b * stride..(b + 1) * stride]);
}
