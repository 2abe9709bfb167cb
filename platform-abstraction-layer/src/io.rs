// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Display};

/// The amount of glyphs rasterized for each font: one for each ASCII code
/// point, 0 through 127.
pub const FONT_GLYPH_COUNT: usize = 128;

/// Why an [`AssetSource`] could not produce an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// There's nothing at the given path.
    NotFound,
    /// The data at the path exists, but could not be decoded as the requested
    /// kind of asset.
    Malformed,
    /// The data is in a format or configuration this source can't produce,
    /// e.g. a font archived at a different pixel size than requested.
    Unsupported,
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotFound => write!(f, "asset not found"),
            DecodeError::Malformed => write!(f, "asset data is malformed"),
            DecodeError::Unsupported => write!(f, "asset data is not supported by this source"),
        }
    }
}

/// A decoded image, converted to 8-bit RGBA regardless of the source format.
#[derive(Debug, Clone, Copy)]
pub struct DecodedImage<'a> {
    /// Width of the image in pixels.
    pub width: u32,
    /// Height of the image in pixels.
    pub height: u32,
    /// The amount of channels in the source image, before conversion to RGBA.
    pub channels: u8,
    /// `width * height` RGBA pixels, row by row, top row first.
    pub pixels: &'a [u8],
}

/// One glyph of a font, rasterized into a single-channel coverage bitmap.
#[derive(Debug, Clone, Copy)]
pub struct RasterizedGlyph<'a> {
    /// The ASCII code point this glyph was rasterized for.
    pub code: u8,
    /// Width of the bitmap in pixels.
    pub width: u32,
    /// Height of the bitmap in pixels.
    pub height: u32,
    /// Horizontal offset from the pen position to the left edge of the bitmap.
    pub bearing_x: i32,
    /// Vertical offset from the baseline up to the top edge of the bitmap.
    pub bearing_y: i32,
    /// Horizontal distance from this glyph's pen position to the next one's,
    /// in pixels.
    pub advance: u32,
    /// `width * height` coverage values, row by row, top row first.
    pub bitmap: &'a [u8],
}

/// Decoded audio as interleaved PCM.
#[derive(Debug, Clone, Copy)]
pub struct DecodedAudio<'a> {
    /// The amount of interleaved channels in `pcm`.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Bits per sample. The samples are little-endian signed integers.
    pub bit_depth: u16,
    /// The interleaved samples.
    pub pcm: &'a [u8],
}

/// Somewhere assets can be listed and decoded from, e.g. a directory of loose
/// files, or a packed archive.
///
/// The decoding functions pass the decoded data to the given closure instead
/// of returning it, so that the source can keep ownership of the buffers and
/// the engine can copy whatever it needs into its own memory. The closure is
/// called only on success (once per glyph for fonts), and the returned
/// `Result` tells whether decoding succeeded.
pub trait AssetSource {
    /// Calls `found` for each asset file under `base_path`, with the file's
    /// path relative to `base_path`, using `/` as the separator. Files of any
    /// extension may be listed, the caller picks the ones it recognizes.
    fn list_assets(&self, base_path: &str, found: &mut dyn FnMut(&str));

    /// Decodes the image at `path` into RGBA pixels.
    fn decode_image(
        &self,
        path: &str,
        use_image: &mut dyn FnMut(DecodedImage),
    ) -> Result<(), DecodeError>;

    /// Rasterizes the glyphs for code points 0 to [`FONT_GLYPH_COUNT`] - 1 of
    /// the font at `path`, at `pixel_size` pixels per em.
    fn rasterize_font(
        &self,
        path: &str,
        pixel_size: u32,
        use_glyph: &mut dyn FnMut(RasterizedGlyph),
    ) -> Result<(), DecodeError>;

    /// Decodes the audio clip at `path`.
    fn decode_audio(
        &self,
        path: &str,
        use_audio: &mut dyn FnMut(DecodedAudio),
    ) -> Result<(), DecodeError>;
}
