// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The reading half of [`serialize`](super::serialize). Archives come from
//! outside the program, so every read is bounds-checked and returns None
//! instead of panicking when the data runs out.

pub trait Deserialize: Sized {
    /// The length of the buffer passed into [`Deserialize::deserialize`].
    const SERIALIZED_SIZE: usize;
    /// Deserializes the byte buffer into the value. The length of `src` must
    /// match the same type's [`Deserialize::SERIALIZED_SIZE`] constant.
    /// Returns None if the bytes are not a valid value.
    fn deserialize(src: &[u8]) -> Option<Self>;
}

/// Reads a value at `cursor` and advances the cursor past it. Returns None
/// if `src` ends before the value does.
#[inline(always)]
pub fn deserialize<D: Deserialize>(src: &[u8], cursor: &mut usize) -> Option<D> {
    let end = cursor.checked_add(D::SERIALIZED_SIZE)?;
    let value = D::deserialize(src.get(*cursor..end)?)?;
    *cursor = end;
    Some(value)
}

/// Reads a u32-length-prefixed byte buffer, borrowing it from `src`.
pub fn deserialize_bytes<'a>(src: &'a [u8], cursor: &mut usize) -> Option<&'a [u8]> {
    let mut inner_cursor = *cursor;
    let len = deserialize::<u32>(src, &mut inner_cursor)? as usize;
    let end = inner_cursor.checked_add(len)?;
    let bytes = src.get(inner_cursor..end)?;
    *cursor = end;
    Some(bytes)
}

/// Reads a u8-length-prefixed UTF-8 string, borrowing it from `src`.
pub fn deserialize_str<'a>(src: &'a [u8], cursor: &mut usize) -> Option<&'a str> {
    let mut inner_cursor = *cursor;
    let len = deserialize::<u8>(src, &mut inner_cursor)? as usize;
    let bytes = src.get(inner_cursor..inner_cursor + len)?;
    let s = core::str::from_utf8(bytes).ok()?;
    *cursor = inner_cursor + len;
    Some(s)
}

macro_rules! impl_deserialize_le {
    ($($t:ty),*) => {
        $(
            impl Deserialize for $t {
                const SERIALIZED_SIZE: usize = size_of::<$t>();
                #[inline]
                fn deserialize(src: &[u8]) -> Option<Self> {
                    Some(<$t>::from_le_bytes(src.try_into().ok()?))
                }
            }
        )*
    };
}

impl_deserialize_le!(u8, u16, u32, i32);

#[cfg(test)]
mod tests {
    use crate::resources::serialize::{serialize, serialize_bytes, serialize_str};

    use super::{deserialize, deserialize_bytes, deserialize_str};

    #[test]
    fn reads_what_was_written() {
        let mut buf = [0u8; 64];
        let mut cursor = 0;
        serialize::<u16>(&0xBEEF, &mut buf, &mut cursor);
        serialize::<i32>(&-7, &mut buf, &mut cursor);
        serialize::<u8>(&200, &mut buf, &mut cursor);
        serialize_str("fonts/mono.ttf", &mut buf, &mut cursor);
        serialize_bytes(&[1, 2, 3], &mut buf, &mut cursor);
        let written = cursor;

        let mut cursor = 0;
        assert_eq!(Some(0xBEEF), deserialize::<u16>(&buf, &mut cursor));
        assert_eq!(Some(-7), deserialize::<i32>(&buf, &mut cursor));
        assert_eq!(Some(200), deserialize::<u8>(&buf, &mut cursor));
        assert_eq!(Some("fonts/mono.ttf"), deserialize_str(&buf, &mut cursor));
        assert_eq!(Some(&[1u8, 2, 3][..]), deserialize_bytes(&buf, &mut cursor));
        assert_eq!(written, cursor);
    }

    #[test]
    fn truncated_input_is_rejected_without_moving_the_cursor() {
        let mut buf = [0u8; 16];
        let mut cursor = 0;
        serialize_bytes(&[9; 8], &mut buf, &mut cursor);

        let truncated = &buf[..10];
        let mut cursor = 0;
        assert_eq!(None, deserialize_bytes(truncated, &mut cursor));
        assert_eq!(0, cursor);
        assert_eq!(None, deserialize::<u32>(&truncated[8..], &mut cursor));
        assert_eq!(0, cursor);
        assert_eq!(None, deserialize_str(&[4, b'a', b'b'], &mut cursor));
    }
}
