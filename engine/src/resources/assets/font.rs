// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Asset type for bitmap fonts: ASCII glyphs rasterized at one pixel size,
//! packed into a single atlas texture.

use platform_abstraction_layer::TextureRef;

use crate::{collections::FixedVec, geom::UvRect};

/// The metrics and atlas location of one character.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Glyph {
    /// Width and height of the glyph's bitmap. Zero for glyphs with nothing
    /// to draw (e.g. space) and characters missing from the font.
    pub size: (u32, u32),
    /// Offset from the pen position to the left edge of the bitmap, and from
    /// the baseline up to the top edge of the bitmap.
    pub bearing: (i32, i32),
    /// How far to move the pen after drawing this glyph, in pixels.
    pub advance: u32,
    /// Where the bitmap is in the font's atlas.
    pub uv: UvRect,
}

/// A font rasterized into an atlas texture.
#[derive(Debug)]
pub struct FontAsset<'eng> {
    /// The atlas texture.
    pub texture: TextureRef,
    /// Width of the atlas texture in pixels.
    pub width: u32,
    /// Height of the atlas texture in pixels.
    pub height: u32,
    /// The size the glyphs were rasterized at, in pixels per em.
    pub pixel_size: u32,
    /// One glyph per code point, indexed by the code point.
    pub glyphs: FixedVec<'eng, Glyph>,
}

impl FontAsset<'_> {
    /// Returns the glyph for the character, if it's in the font's character
    /// set.
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        if c.is_ascii() {
            self.glyphs.get(c as usize)
        } else {
            None
        }
    }

    /// Returns the width (the sum of the advances) and height (the tallest
    /// glyph) of `text` laid out on one line. Characters without a glyph are
    /// skipped.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .fold((0, 0), |(width, height), glyph| {
                (width + glyph.advance, height.max(glyph.size.1))
            })
    }
}

#[cfg(test)]
mod tests {
    use platform_abstraction_layer::TextureRef;

    use crate::{allocators::LinearAllocator, collections::FixedVec, test_platform::TestPlatform};

    use super::{FontAsset, Glyph};

    #[test]
    fn measuring_text() {
        let platform = TestPlatform::new();
        let arena = LinearAllocator::new(&platform, 64 * 1024).unwrap();
        let mut glyphs = FixedVec::new(&arena, 128).unwrap();
        for code in 0..128u32 {
            let glyph = match code as u8 {
                b'a' => Glyph { size: (6, 7), advance: 8, ..Default::default() },
                b'b' => Glyph { size: (6, 10), advance: 8, ..Default::default() },
                b' ' => Glyph { advance: 4, ..Default::default() },
                _ => Glyph::default(),
            };
            assert!(glyphs.push(glyph).is_ok());
        }
        let font = FontAsset {
            texture: TextureRef::new(1),
            width: 0,
            height: 0,
            pixel_size: 16,
            glyphs,
        };

        assert_eq!((28, 10), font.measure("ab a"));
        assert_eq!((8, 7), font.measure("aé"));
        assert!(font.glyph('é').is_none());
        assert_eq!(4, font.glyph(' ').unwrap().advance);
    }
}
