// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The packed asset file: decoded assets concatenated into one flat blob.
//!
//! There's no header, version or checksum, just entries one after another:
//!
//! - `kind: u8` (0 = texture, 1 = font, 2 = audio)
//! - `path: u8 length + bytes`
//! - texture: `width: u32, height: u32, channels: u8, pixels: u32 length + bytes`
//! - font: `pixel_size: u32, glyph_count: u32`, then per glyph `code: u8,
//!   width: u32, height: u32, bearing_x: i32, bearing_y: i32, advance: u32,
//!   bitmap: u32 length + bytes`
//! - audio: `channels: u16, sample_rate: u32, bit_depth: u16, pcm: u32
//!   length + bytes`
//!
//! All integers are little-endian. Entries are read back in the order they
//! were written, so the reader must follow the exact same field order.

use platform_abstraction_layer::{DecodedAudio, DecodedImage, RasterizedGlyph};

use super::{
    assets::AssetKind,
    deserialize::{deserialize, deserialize_bytes, deserialize_str},
    serialize::{
        serialize, serialize_bytes, serialize_str, serialized_bytes_size, serialized_str_size,
        Serialize,
    },
};

const KIND_TEXTURE: u8 = 0;
const KIND_FONT: u8 = 1;
const KIND_AUDIO: u8 = 2;

const GLYPH_HEADER_SIZE: usize = u8::SERIALIZED_SIZE
    + u32::SERIALIZED_SIZE * 2
    + i32::SERIALIZED_SIZE * 2
    + u32::SERIALIZED_SIZE;

/// The decoded contents of an asset, to be written into a packed file.
#[derive(Debug, Clone, Copy)]
pub enum PackedPayload<'a> {
    /// An image, stored as decoded RGBA pixels.
    Texture(DecodedImage<'a>),
    /// A font, stored as its rasterized glyphs.
    Font {
        /// The size the glyphs were rasterized at, in pixels per em.
        pixel_size: u32,
        /// The glyphs, in any order.
        glyphs: &'a [RasterizedGlyph<'a>],
    },
    /// An audio clip, stored as interleaved PCM.
    Audio(DecodedAudio<'a>),
}

/// One asset to be written into a packed file.
#[derive(Debug, Clone, Copy)]
pub struct PackedEntry<'a> {
    /// The asset's path, relative to the root of the packed file.
    pub path: &'a str,
    /// The decoded asset.
    pub payload: PackedPayload<'a>,
}

impl PackedEntry<'_> {
    /// Returns the amount of bytes [`PackedEntry::write`] writes.
    pub fn serialized_size(&self) -> usize {
        let header = u8::SERIALIZED_SIZE + serialized_str_size(self.path);
        let payload = match self.payload {
            PackedPayload::Texture(image) => {
                u32::SERIALIZED_SIZE * 2 + u8::SERIALIZED_SIZE + serialized_bytes_size(image.pixels)
            }
            PackedPayload::Font { glyphs, .. } => {
                let glyphs_size: usize = glyphs
                    .iter()
                    .map(|glyph| GLYPH_HEADER_SIZE + serialized_bytes_size(glyph.bitmap))
                    .sum();
                u32::SERIALIZED_SIZE * 2 + glyphs_size
            }
            PackedPayload::Audio(audio) => {
                u16::SERIALIZED_SIZE * 2 + u32::SERIALIZED_SIZE + serialized_bytes_size(audio.pcm)
            }
        };
        header + payload
    }

    /// Writes the entry into `dst` at `cursor`, and advances the cursor.
    ///
    /// ### Panics
    ///
    /// If there's less than [`PackedEntry::serialized_size`] bytes left in
    /// `dst` after `cursor`, or if the path is longer than 255 bytes.
    pub fn write(&self, dst: &mut [u8], cursor: &mut usize) {
        let kind = match self.payload {
            PackedPayload::Texture(_) => KIND_TEXTURE,
            PackedPayload::Font { .. } => KIND_FONT,
            PackedPayload::Audio(_) => KIND_AUDIO,
        };
        serialize::<u8>(&kind, dst, cursor);
        serialize_str(self.path, dst, cursor);

        match self.payload {
            PackedPayload::Texture(DecodedImage {
                width,
                height,
                channels,
                pixels,
            }) => {
                serialize::<u32>(&width, dst, cursor);
                serialize::<u32>(&height, dst, cursor);
                serialize::<u8>(&channels, dst, cursor);
                serialize_bytes(pixels, dst, cursor);
            }
            PackedPayload::Font { pixel_size, glyphs } => {
                serialize::<u32>(&pixel_size, dst, cursor);
                serialize::<u32>(&(glyphs.len() as u32), dst, cursor);
                for glyph in glyphs {
                    serialize::<u8>(&glyph.code, dst, cursor);
                    serialize::<u32>(&glyph.width, dst, cursor);
                    serialize::<u32>(&glyph.height, dst, cursor);
                    serialize::<i32>(&glyph.bearing_x, dst, cursor);
                    serialize::<i32>(&glyph.bearing_y, dst, cursor);
                    serialize::<u32>(&glyph.advance, dst, cursor);
                    serialize_bytes(glyph.bitmap, dst, cursor);
                }
            }
            PackedPayload::Audio(DecodedAudio {
                channels,
                sample_rate,
                bit_depth,
                pcm,
            }) => {
                serialize::<u16>(&channels, dst, cursor);
                serialize::<u32>(&sample_rate, dst, cursor);
                serialize::<u16>(&bit_depth, dst, cursor);
                serialize_bytes(pcm, dst, cursor);
            }
        }
    }
}

/// An entry read from a packed file, borrowing from the file's bytes.
#[derive(Debug, Clone, Copy)]
pub struct ArchivedEntry<'a> {
    /// The asset's path, relative to the root of the packed file.
    pub path: &'a str,
    /// The decoded asset, borrowed from the file.
    pub payload: ArchivedPayload<'a>,
}

/// The contents of an [`ArchivedEntry`].
#[derive(Debug, Clone, Copy)]
pub enum ArchivedPayload<'a> {
    /// See [`PackedPayload::Texture`].
    Texture(DecodedImage<'a>),
    /// See [`PackedPayload::Font`].
    Font {
        /// The size the glyphs were rasterized at, in pixels per em.
        pixel_size: u32,
        /// The glyphs, parsed lazily.
        glyphs: ArchivedGlyphs<'a>,
    },
    /// See [`PackedPayload::Audio`].
    Audio(DecodedAudio<'a>),
}

impl ArchivedEntry<'_> {
    /// Returns the kind of asset this entry contains.
    pub fn kind(&self) -> AssetKind {
        match self.payload {
            ArchivedPayload::Texture(_) => AssetKind::Texture,
            ArchivedPayload::Font { .. } => AssetKind::Font,
            ArchivedPayload::Audio(_) => AssetKind::Audio,
        }
    }
}

/// The glyphs of an archived font, validated when the entry was read and
/// parsed again on iteration.
#[derive(Debug, Clone, Copy)]
pub struct ArchivedGlyphs<'a> {
    count: u32,
    data: &'a [u8],
}

impl<'a> ArchivedGlyphs<'a> {
    /// Returns the amount of glyphs.
    pub fn len(&self) -> usize {
        self.count as usize
    }

    /// Returns true if there are no glyphs.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns an iterator over the glyphs, in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = RasterizedGlyph<'a>> {
        let data = self.data;
        let mut cursor = 0;
        (0..self.count).map_while(move |_| read_glyph(data, &mut cursor))
    }
}

fn read_glyph<'a>(src: &'a [u8], cursor: &mut usize) -> Option<RasterizedGlyph<'a>> {
    let code = deserialize::<u8>(src, cursor)?;
    let width = deserialize::<u32>(src, cursor)?;
    let height = deserialize::<u32>(src, cursor)?;
    let bearing_x = deserialize::<i32>(src, cursor)?;
    let bearing_y = deserialize::<i32>(src, cursor)?;
    let advance = deserialize::<u32>(src, cursor)?;
    let bitmap = deserialize_bytes(src, cursor)?;
    if bitmap.len() != width as usize * height as usize {
        return None;
    }
    Some(RasterizedGlyph {
        code,
        width,
        height,
        bearing_x,
        bearing_y,
        advance,
        bitmap,
    })
}

/// Reads [`ArchivedEntry`]s out of a packed file, front to back.
pub struct PackedFileReader<'a> {
    src: &'a [u8],
    cursor: usize,
}

impl<'a> PackedFileReader<'a> {
    /// Creates a reader starting from the first entry of `src`.
    pub fn new(src: &'a [u8]) -> PackedFileReader<'a> {
        PackedFileReader { src, cursor: 0 }
    }

    /// Returns true if every entry has been read.
    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.src.len()
    }

    /// Reads the next entry. Returns None at the end of the file, or if the
    /// next entry is malformed or truncated, which can be told apart with
    /// [`PackedFileReader::is_at_end`].
    pub fn read_entry(&mut self) -> Option<ArchivedEntry<'a>> {
        let src = self.src;
        let mut cursor = self.cursor;
        let kind = deserialize::<u8>(src, &mut cursor)?;
        let path = deserialize_str(src, &mut cursor)?;

        let payload = match kind {
            KIND_TEXTURE => {
                let width = deserialize::<u32>(src, &mut cursor)?;
                let height = deserialize::<u32>(src, &mut cursor)?;
                let channels = deserialize::<u8>(src, &mut cursor)?;
                let pixels = deserialize_bytes(src, &mut cursor)?;
                let expected_len = (width as usize)
                    .checked_mul(height as usize)?
                    .checked_mul(4)?;
                if pixels.len() != expected_len {
                    return None;
                }
                ArchivedPayload::Texture(DecodedImage {
                    width,
                    height,
                    channels,
                    pixels,
                })
            }
            KIND_FONT => {
                let pixel_size = deserialize::<u32>(src, &mut cursor)?;
                let count = deserialize::<u32>(src, &mut cursor)?;
                let glyphs_start = cursor;
                for _ in 0..count {
                    read_glyph(src, &mut cursor)?;
                }
                ArchivedPayload::Font {
                    pixel_size,
                    glyphs: ArchivedGlyphs {
                        count,
                        data: &src[glyphs_start..cursor],
                    },
                }
            }
            KIND_AUDIO => ArchivedPayload::Audio(DecodedAudio {
                channels: deserialize::<u16>(src, &mut cursor)?,
                sample_rate: deserialize::<u32>(src, &mut cursor)?,
                bit_depth: deserialize::<u16>(src, &mut cursor)?,
                pcm: deserialize_bytes(src, &mut cursor)?,
            }),
            _ => return None,
        };

        self.cursor = cursor;
        Some(ArchivedEntry { path, payload })
    }
}

impl<'a> Iterator for PackedFileReader<'a> {
    type Item = ArchivedEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_entry()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    extern crate alloc;

    use alloc::vec::Vec;

    use platform_abstraction_layer::{DecodedAudio, DecodedImage, RasterizedGlyph};

    use super::{ArchivedPayload, PackedEntry, PackedFileReader, PackedPayload};

    pub fn write_archive(entries: &[PackedEntry]) -> Vec<u8> {
        let size = entries.iter().map(PackedEntry::serialized_size).sum();
        let mut archive = alloc::vec![0; size];
        let mut cursor = 0;
        for entry in entries {
            entry.write(&mut archive, &mut cursor);
        }
        assert_eq!(size, cursor);
        archive
    }

    pub const GLYPHS: [RasterizedGlyph; 2] = [
        RasterizedGlyph {
            code: b' ',
            width: 0,
            height: 0,
            bearing_x: 0,
            bearing_y: 0,
            advance: 5,
            bitmap: &[],
        },
        RasterizedGlyph {
            code: b'A',
            width: 2,
            height: 3,
            bearing_x: 1,
            bearing_y: 3,
            advance: 4,
            bitmap: &[1, 2, 3, 4, 5, 6],
        },
    ];

    pub fn sample_entries() -> [PackedEntry<'static>; 3] {
        [
            PackedEntry {
                path: "sprites/ship.png",
                payload: PackedPayload::Texture(DecodedImage {
                    width: 1,
                    height: 2,
                    channels: 3,
                    pixels: &[255, 0, 0, 255, 0, 255, 0, 255],
                }),
            },
            PackedEntry {
                path: "fonts/mono.ttf",
                payload: PackedPayload::Font {
                    pixel_size: 16,
                    glyphs: &GLYPHS,
                },
            },
            PackedEntry {
                path: "sfx/laser.wav",
                payload: PackedPayload::Audio(DecodedAudio {
                    channels: 2,
                    sample_rate: 44100,
                    bit_depth: 16,
                    pcm: &[0, 0, 1, 0, 2, 0, 3, 0],
                }),
            },
        ]
    }

    #[test]
    fn entries_are_read_back_in_order() {
        let archive = write_archive(&sample_entries());
        let mut reader = PackedFileReader::new(&archive);

        let texture = reader.read_entry().unwrap();
        assert_eq!("sprites/ship.png", texture.path);
        let ArchivedPayload::Texture(image) = texture.payload else {
            panic!("expected a texture");
        };
        assert_eq!((1, 2, 3), (image.width, image.height, image.channels));

        let font = reader.read_entry().unwrap();
        let ArchivedPayload::Font { pixel_size, glyphs } = font.payload else {
            panic!("expected a font");
        };
        assert_eq!(16, pixel_size);
        let glyphs: Vec<RasterizedGlyph> = glyphs.iter().collect();
        assert_eq!(2, glyphs.len());
        assert_eq!(b'A', glyphs[1].code);
        assert_eq!(&[1, 2, 3, 4, 5, 6], glyphs[1].bitmap);

        let audio = reader.read_entry().unwrap();
        let ArchivedPayload::Audio(audio) = audio.payload else {
            panic!("expected audio");
        };
        assert_eq!((2, 44100, 16), (audio.channels, audio.sample_rate, audio.bit_depth));

        assert!(reader.read_entry().is_none());
        assert!(reader.is_at_end());
    }

    #[test]
    fn truncated_files_are_detected() {
        let archive = write_archive(&sample_entries());
        let truncated = &archive[..archive.len() - 3];
        let mut reader = PackedFileReader::new(truncated);
        assert_eq!(2, reader.by_ref().count());
        assert!(!reader.is_at_end());

        let mut bad_kind = archive.clone();
        bad_kind[0] = 7;
        assert!(PackedFileReader::new(&bad_kind).read_entry().is_none());
    }
}
