// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Little-endian encoding of the primitives the packed asset file is made
//! of. Fixed-size values implement [`Serialize`], variable-length byte
//! buffers and strings are written with a length prefix by
//! [`serialize_bytes`] and [`serialize_str`].

pub trait Serialize {
    /// The length of the buffer passed into [`Serialize::serialize`].
    const SERIALIZED_SIZE: usize;
    /// Serializes the value into the byte buffer. The length of `dst` must
    /// match the same type's [`Serialize::SERIALIZED_SIZE`] constant.
    fn serialize(&self, dst: &mut [u8]);
}

/// Writes `value` at `cursor` and advances the cursor past it.
///
/// ### Panics
///
/// If `dst` is too short.
#[inline(always)]
pub fn serialize<S: Serialize>(value: &S, dst: &mut [u8], cursor: &mut usize) {
    value.serialize(&mut dst[*cursor..(*cursor + S::SERIALIZED_SIZE)]);
    *cursor += S::SERIALIZED_SIZE;
}

/// Returns the amount of bytes [`serialize_bytes`] writes for `bytes`.
pub const fn serialized_bytes_size(bytes: &[u8]) -> usize {
    u32::SERIALIZED_SIZE + bytes.len()
}

/// Writes the length of `bytes` as a u32, then the bytes themselves.
///
/// ### Panics
///
/// If `dst` is too short, or `bytes` is longer than `u32::MAX`.
pub fn serialize_bytes(bytes: &[u8], dst: &mut [u8], cursor: &mut usize) {
    assert!(
        bytes.len() <= u32::MAX as usize,
        "byte buffers are limited to u32::MAX bytes",
    );
    serialize::<u32>(&(bytes.len() as u32), dst, cursor);
    dst[*cursor..*cursor + bytes.len()].copy_from_slice(bytes);
    *cursor += bytes.len();
}

/// Returns the amount of bytes [`serialize_str`] writes for `s`.
pub const fn serialized_str_size(s: &str) -> usize {
    u8::SERIALIZED_SIZE + s.len()
}

/// Writes the length of `s` as a u8, then the UTF-8 bytes of the string.
///
/// ### Panics
///
/// If `dst` is too short, or `s` is longer than 255 bytes.
pub fn serialize_str(s: &str, dst: &mut [u8], cursor: &mut usize) {
    assert!(s.len() <= u8::MAX as usize, "strings are limited to 255 bytes");
    serialize::<u8>(&(s.len() as u8), dst, cursor);
    dst[*cursor..*cursor + s.len()].copy_from_slice(s.as_bytes());
    *cursor += s.len();
}

macro_rules! impl_serialize_le {
    ($($t:ty),*) => {
        $(
            impl Serialize for $t {
                const SERIALIZED_SIZE: usize = size_of::<$t>();
                #[inline]
                fn serialize(&self, dst: &mut [u8]) {
                    assert_eq!(Self::SERIALIZED_SIZE, dst.len());
                    dst.copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_serialize_le!(u8, u16, u32, i32);
