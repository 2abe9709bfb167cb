// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use anyhow::Context;
use engine::{
    allocators::LinearAllocator,
    resources::{TileSheet, MAX_TILE_BYTES},
};
use image::RgbaImage;
use platform_desktop::{
    importers::font::{self, ImportedGlyph},
    DesktopPlatform,
};
use tracing::{debug, info};

const ARENA_SIZE: usize = 64 * 1024 * 1024;

pub fn run(font_path: &Path, out: &Path, pixel_size: u32) -> anyhow::Result<()> {
    let glyphs = font::import(font_path, pixel_size)
        .with_context(|| format!("Failed to import {}", font_path.display()))?;
    let image = pack_glyphs(&glyphs)?;
    image
        .save(out)
        .with_context(|| format!("Failed to write the atlas into {}", out.display()))?;
    info!("Wrote the atlas into {}", out.display());
    Ok(())
}

/// Packs the glyphs into an RGBA atlas in the order they were given.
pub fn pack_glyphs(glyphs: &[ImportedGlyph]) -> anyhow::Result<RgbaImage> {
    let platform = DesktopPlatform::new();
    let arena = LinearAllocator::new(&platform, ARENA_SIZE)
        .context("Failed to allocate memory for packing the atlas")?;
    let mut sheet = TileSheet::new(&arena, glyphs.len())
        .context("Not enough memory for the glyphs of the atlas")?;
    for glyph in glyphs {
        anyhow::ensure!(
            glyph.bitmap.len() <= MAX_TILE_BYTES,
            "The glyph for {:?} is {}x{} pixels, which is more than the {MAX_TILE_BYTES} pixels a tile can fit, try a smaller --size",
            glyph.code as char,
            glyph.width,
            glyph.height,
        );
        sheet.add_tile(glyph.width, glyph.height, &glyph.bitmap);
    }

    let atlas = sheet
        .generate(&arena)
        .context("Not enough memory for the atlas")?;
    anyhow::ensure!(
        atlas.width > 0 && atlas.height > 0,
        "The font has no visible glyphs"
    );
    for (i, glyph) in glyphs.iter().enumerate() {
        if let Some(tile) = atlas.tile(i) {
            debug!("{:?}: {:?}, uv: {:?}", glyph.code as char, tile.rect, tile.uv);
        }
    }
    info!(
        "Packed {} glyphs into a {}x{} atlas ({}x{} grid of {}x{} cells)",
        atlas.tile_count(),
        atlas.width,
        atlas.height,
        atlas.grid,
        atlas.grid,
        atlas.cell_width,
        atlas.cell_height,
    );

    RgbaImage::from_raw(atlas.width, atlas.height, atlas.pixels.to_vec())
        .context("Atlas pixel buffer does not match its dimensions")
}

#[cfg(test)]
mod tests {
    use platform_desktop::importers::font::ImportedGlyph;

    use super::pack_glyphs;

    fn glyph(code: u8, width: u32, height: u32, bitmap: &[u8]) -> ImportedGlyph {
        ImportedGlyph {
            code,
            width,
            height,
            bearing_x: 0,
            bearing_y: 0,
            advance: width,
            bitmap: bitmap.to_vec(),
        }
    }

    #[test]
    fn glyphs_are_packed_into_grid_cells() {
        let glyphs = [glyph(b'-', 2, 1, &[10, 20]), glyph(b'|', 1, 2, &[30, 40])];
        let image = pack_glyphs(&glyphs).unwrap();

        // Two tiles make a 2x2 grid of 2x2 cells.
        assert_eq!((4, 4), image.dimensions());
        assert_eq!([10, 10, 10, 255], image.get_pixel(0, 0).0);
        assert_eq!([20, 20, 20, 255], image.get_pixel(1, 0).0);
        assert_eq!([30, 30, 30, 255], image.get_pixel(2, 0).0);
        assert_eq!([40, 40, 40, 255], image.get_pixel(2, 1).0);
        assert_eq!([0, 0, 0, 0], image.get_pixel(0, 1).0);
        assert_eq!([0, 0, 0, 0], image.get_pixel(3, 3).0);
    }

    #[test]
    fn oversized_glyphs_are_an_error() {
        let glyphs = [glyph(b'W', 64, 64, &[0xFF; 64 * 64])];
        let err = pack_glyphs(&glyphs).unwrap_err();
        assert!(err.to_string().contains("64x64"), "{err}");
    }

    #[test]
    fn fonts_without_visible_glyphs_are_an_error() {
        let glyphs = [glyph(b' ', 0, 0, &[])];
        let err = pack_glyphs(&glyphs).unwrap_err();
        assert_eq!("The font has no visible glyphs", err.to_string());
    }
}
