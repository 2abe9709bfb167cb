// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

/// Platform-specific texture reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TextureRef(u64);

impl TextureRef {
    /// Creates a new [`TextureRef`]. Should only be created in the platform
    /// implementation, which also knows how the inner value is going to be
    /// used.
    pub fn new(id: u64) -> TextureRef {
        TextureRef(id)
    }

    /// Returns the inner value passed into [`TextureRef::new`]. Generally only
    /// relevant to the platform implementation.
    pub fn inner(self) -> u64 {
        self.0
    }
}

/// How texture coordinates outside of the 0..1 range are sampled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// The texture tiles infinitely.
    #[default]
    Repeat,
    /// The texture tiles infinitely, every other tile mirrored.
    MirroredRepeat,
    /// Coordinates are clamped to the edge pixels.
    ClampToEdge,
}

/// Sampler and storage options for [`Pal::create_texture`](crate::Pal::create_texture).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    /// Sampling behavior outside the 0..1 texture coordinate range.
    pub wrap: WrapMode,
    /// Whether the platform should generate a mip chain for the texture.
    pub generate_mipmaps: bool,
}

/// Descriptions of pixel data layouts, used to interpret the byte arrays passed
/// into uploading functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelFormat {
    /// 8-bit per channel RGBA colors, arranged in order: `[red, green, blue,
    /// alpha, red, ...]`.
    Rgba,
}

impl PixelFormat {
    /// Returns the amount of bytes each pixel takes up in a pixel buffer if
    /// that buffer is using this pixel format.
    ///
    /// E.g. for 8-bit RGBA, this returns 4, as each of the four channels takes
    /// up eight bits.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba => 4,
        }
    }
}
