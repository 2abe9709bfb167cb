// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::Context;
use fontdue::{Font, FontSettings};
use platform_abstraction_layer::{RasterizedGlyph, FONT_GLYPH_COUNT};
use tracing::{debug, trace};

/// One rasterized glyph with an owned coverage bitmap.
#[derive(Debug, Clone)]
pub struct ImportedGlyph {
    pub code: u8,
    pub width: u32,
    pub height: u32,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: u32,
    pub bitmap: Vec<u8>,
}

impl ImportedGlyph {
    pub fn as_rasterized(&self) -> RasterizedGlyph<'_> {
        RasterizedGlyph {
            code: self.code,
            width: self.width,
            height: self.height,
            bearing_x: self.bearing_x,
            bearing_y: self.bearing_y,
            advance: self.advance,
            bitmap: &self.bitmap,
        }
    }
}

/// Rasterizes the ASCII characters of the font at `pixel_size` pixels per em.
/// Characters the font has no glyph for are left out.
pub fn import(font_path: &Path, pixel_size: u32) -> anyhow::Result<Vec<ImportedGlyph>> {
    let font_bytes = fs::read(font_path).context("Failed to open font file for importing")?;
    let font = Font::from_bytes(
        font_bytes,
        FontSettings {
            scale: pixel_size as f32,
            ..FontSettings::default()
        },
    )
    .map_err(anyhow::Error::msg)
    .context("Failed to read font file as a font (unsupported format?)")?;

    let mut glyphs = Vec::with_capacity(FONT_GLYPH_COUNT);
    for code in 0..FONT_GLYPH_COUNT as u8 {
        let ch = code as char;
        if font.lookup_glyph_index(ch) == 0 {
            trace!("No glyph for {ch:?} in {}", font_path.display());
            continue;
        }
        let (metrics, bitmap) = font.rasterize(ch, pixel_size as f32);
        glyphs.push(ImportedGlyph {
            code,
            width: metrics.width as u32,
            height: metrics.height as u32,
            bearing_x: metrics.xmin,
            bearing_y: metrics.ymin + metrics.height as i32,
            advance: metrics.advance_width.round().max(0.0) as u32,
            bitmap,
        });
    }

    debug!(
        "Rasterized {} glyphs at {pixel_size}px from: {}",
        glyphs.len(),
        font_path.display(),
    );
    Ok(glyphs)
}
