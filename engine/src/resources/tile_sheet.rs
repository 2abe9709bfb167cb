// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Packing many small single-channel bitmaps (glyphs, sprite tiles) into one
//! RGBA texture.
//!
//! The layout is a uniform grid: every cell is as large as the largest tile
//! in each dimension, and the grid has `floor(sqrt(n)) + 1` cells per side.
//! This leaves unused cells at the end and unused space inside cells of
//! smaller tiles, but the placement of each tile is trivial to compute.

use arrayvec::ArrayVec;
use platform_abstraction_layer::PixelFormat;

use crate::{
    allocators::LinearAllocator,
    collections::FixedVec,
    geom::{PixelRect, UvRect},
};

/// The maximum amount of pixels in a single tile.
pub const MAX_TILE_BYTES: usize = 2048;

const ATLAS_FORMAT: PixelFormat = PixelFormat::Rgba;

struct Tile {
    width: u32,
    height: u32,
    data: ArrayVec<u8, MAX_TILE_BYTES>,
}

/// Collects tiles for [`TileSheet::generate`]. All tiles must be added before
/// generating, since the cell size depends on every tile.
pub struct TileSheet<'a> {
    tiles: FixedVec<'a, Tile>,
}

impl<'a> TileSheet<'a> {
    /// Creates a tile sheet with room for `max_tiles` tiles, allocated from
    /// `arena`. Returns None if the arena doesn't have enough space.
    pub fn new(arena: &'a LinearAllocator, max_tiles: usize) -> Option<TileSheet<'a>> {
        Some(TileSheet {
            tiles: FixedVec::new(arena, max_tiles)?,
        })
    }

    /// Copies a `width` by `height` single-channel bitmap into the sheet. The
    /// tile's index is the amount of tiles added before it.
    ///
    /// ### Panics
    ///
    /// If the tile has more than [`MAX_TILE_BYTES`] pixels, if `pixels` is
    /// shorter than `width * height`, or if the sheet is already full.
    pub fn add_tile(&mut self, width: u32, height: u32, pixels: &[u8]) {
        let len = width as usize * height as usize;
        assert!(
            len <= MAX_TILE_BYTES,
            "tile of {width}x{height} pixels does not fit in the {MAX_TILE_BYTES} byte tile buffer",
        );
        assert!(
            pixels.len() >= len,
            "tile of {width}x{height} pixels was given only {} bytes",
            pixels.len(),
        );
        let mut data = ArrayVec::new();
        // Can't fail, the length was checked above.
        let _ = data.try_extend_from_slice(&pixels[..len]);
        let added = self.tiles.push(Tile {
            width,
            height,
            data,
        });
        assert!(added.is_ok(), "tile sheet is full ({} tiles)", self.tiles.len());
    }

    /// Returns the amount of tiles added so far.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if no tiles have been added.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Returns the size of each grid cell: the widest tile's width and the
    /// tallest tile's height.
    pub fn cell_size(&self) -> (u32, u32) {
        self.tiles.iter().fold((0, 0), |(w, h), tile| {
            (w.max(tile.width), h.max(tile.height))
        })
    }

    /// Returns the amount of cells per side of the grid.
    pub fn grid_dimension(&self) -> u32 {
        if self.tiles.is_empty() {
            0
        } else {
            let n = self.tiles.len() as u32;
            let mut root = 0;
            while (root + 1) * (root + 1) <= n {
                root += 1;
            }
            root + 1
        }
    }

    /// Returns the width and height of the atlas [`TileSheet::generate`] would
    /// create, in pixels.
    pub fn atlas_size(&self) -> (u32, u32) {
        let (cell_width, cell_height) = self.cell_size();
        let grid = self.grid_dimension();
        (grid * cell_width, grid * cell_height)
    }

    /// Lays out the tiles and blits them into an RGBA atlas allocated from
    /// `arena`. Returns None if the atlas doesn't fit in the arena.
    pub fn generate<'b>(self, arena: &'b LinearAllocator) -> Option<Atlas<'b>> {
        profiling::function_scope!();
        let (cell_width, cell_height) = self.cell_size();
        let grid = self.grid_dimension();
        let (width, height) = self.atlas_size();
        let bpp = ATLAS_FORMAT.bytes_per_pixel();
        let stride = width as usize * bpp;

        let mut pixels = FixedVec::<u8>::new(arena, stride.checked_mul(height as usize)?)?;
        pixels.fill_with_zeroes();
        let mut placements = FixedVec::new(arena, self.tiles.len())?;

        for (i, tile) in self.tiles.iter().enumerate() {
            let col = i as u32 % grid;
            let row = i as u32 / grid;
            let cell = PixelRect::xywh(col * cell_width, row * cell_height, cell_width, cell_height);
            let rect = PixelRect::xywh(cell.x, cell.y, tile.width, tile.height);

            for y in 0..tile.height as usize {
                let src_row = &tile.data[y * tile.width as usize..(y + 1) * tile.width as usize];
                let dst_start = (rect.y as usize + y) * stride + rect.x as usize * bpp;
                let dst_row = &mut pixels[dst_start..dst_start + src_row.len() * bpp];
                for (dst, &value) in dst_row.chunks_exact_mut(bpp).zip(src_row) {
                    dst.copy_from_slice(&[value, value, value, 0xFF]);
                }
            }

            let placed = placements.push(TilePlacement {
                rect,
                uv: rect.to_uv(width, height),
                bounding_uv: cell.to_uv(width, height),
            });
            // The capacity is the tile count, so this can't fail.
            debug_assert!(placed.is_ok());
        }

        Some(Atlas {
            width,
            height,
            cell_width,
            cell_height,
            grid,
            pixels,
            placements,
        })
    }
}

/// Where a tile ended up in an [`Atlas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    /// The tile's content area, in atlas pixels.
    pub rect: PixelRect,
    /// The tile's content area in texture coordinates. Use these for drawing.
    pub uv: UvRect,
    /// The whole cell the tile was placed in, in texture coordinates.
    pub bounding_uv: UvRect,
}

/// The output of [`TileSheet::generate`].
pub struct Atlas<'a> {
    /// Width of the atlas in pixels, a multiple of `cell_width`.
    pub width: u32,
    /// Height of the atlas in pixels, a multiple of `cell_height`.
    pub height: u32,
    /// Width of each grid cell: the width of the widest tile.
    pub cell_width: u32,
    /// Height of each grid cell: the height of the tallest tile.
    pub cell_height: u32,
    /// The amount of cells per side.
    pub grid: u32,
    /// RGBA8 pixels, `width * height * 4` bytes. Cell areas not covered by a
    /// tile are transparent black.
    pub pixels: FixedVec<'a, u8>,
    placements: FixedVec<'a, TilePlacement>,
}

impl Atlas<'_> {
    /// Returns the pixel format of [`Atlas::pixels`].
    pub const fn format(&self) -> PixelFormat {
        ATLAS_FORMAT
    }

    /// Returns the amount of tiles in the atlas.
    pub fn tile_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns the placement of the tile at `index` (in the order the tiles
    /// were added), or None if there's no such tile.
    pub fn tile(&self, index: usize) -> Option<&TilePlacement> {
        self.placements.get(index)
    }

    /// Returns the tight texture coordinates of the tile at `index`.
    pub fn tile_uv(&self, index: usize) -> Option<UvRect> {
        self.placements.get(index).map(|placement| placement.uv)
    }
}

#[cfg(test)]
mod tests {
    use crate::{allocators::LinearAllocator, test_platform::TestPlatform};

    use super::{TileSheet, MAX_TILE_BYTES};

    const SIZES: [(u32, u32); 5] = [(8, 8), (16, 16), (4, 4), (8, 16), (16, 8)];

    fn five_tile_sheet<'a>(arena: &'a LinearAllocator<'a>) -> TileSheet<'a> {
        let mut sheet = TileSheet::new(arena, 8).unwrap();
        for (i, (w, h)) in SIZES.into_iter().enumerate() {
            let pixels = [i as u8 + 1; 256];
            sheet.add_tile(w, h, &pixels);
        }
        sheet
    }

    #[test]
    fn five_tiles_make_a_three_by_three_grid() {
        let platform = TestPlatform::new();
        let arena = LinearAllocator::new(&platform, 1024 * 1024).unwrap();
        let atlas = five_tile_sheet(&arena).generate(&arena).unwrap();

        assert_eq!((16, 16), (atlas.cell_width, atlas.cell_height));
        assert_eq!(3, atlas.grid);
        assert_eq!((48, 48), (atlas.width, atlas.height));
        assert_eq!(48 * 48 * 4, atlas.pixels.len());

        let uv = atlas.tile_uv(0).unwrap();
        assert_eq!([0.0, 0.0], uv.uv0);
        assert_eq!([8.0 / 48.0, 8.0 / 48.0], uv.uv1);

        // Row-major: the fourth tile wraps to the start of the second row.
        let fourth = atlas.tile(3).unwrap();
        assert_eq!((0, 16), (fourth.rect.x, fourth.rect.y));
        assert_eq!([0.0, 16.0 / 48.0], fourth.bounding_uv.uv0);
        assert_eq!([16.0 / 48.0, 32.0 / 48.0], fourth.bounding_uv.uv1);

        assert!(atlas.tile_uv(5).is_none());
    }

    #[test]
    fn tiles_stay_inside_the_atlas_and_uvs_round_trip() {
        let platform = TestPlatform::new();
        let arena = LinearAllocator::new(&platform, 8 * 1024 * 1024).unwrap();
        for count in 1..40u32 {
            let mut sheet = TileSheet::new(&arena, count as usize).unwrap();
            for i in 0..count {
                let (w, h) = (1 + i % 13, 1 + (i * 7) % 11);
                sheet.add_tile(w, h, &[0x80; MAX_TILE_BYTES]);
            }
            let atlas = sheet.generate(&arena).unwrap();
            let bounds = crate::geom::PixelRect::xywh(0, 0, atlas.width, atlas.height);
            for i in 0..count as usize {
                let tile = atlas.tile(i).unwrap();
                assert!(bounds.contains(&tile.rect));
                let w = (tile.uv.uv1[0] - tile.uv.uv0[0]) * atlas.width as f32;
                let h = (tile.uv.uv1[1] - tile.uv.uv0[1]) * atlas.height as f32;
                assert_eq!(tile.rect.w, (w + 0.5) as u32);
                assert_eq!(tile.rect.h, (h + 0.5) as u32);
            }
            for (i, a) in (0..count as usize).filter_map(|i| atlas.tile(i)).enumerate() {
                for b in (i + 1..count as usize).filter_map(|j| atlas.tile(j)) {
                    assert!(!a.rect.overlaps(&b.rect));
                }
            }
        }
    }

    #[test]
    fn zero_tiles_make_an_empty_atlas() {
        let platform = TestPlatform::new();
        let arena = LinearAllocator::new(&platform, 1024 * 1024).unwrap();
        let atlas = TileSheet::new(&arena, 4).unwrap().generate(&arena).unwrap();
        assert_eq!((0, 0, 0), (atlas.width, atlas.height, atlas.grid));
        assert!(atlas.pixels.is_empty());
        assert_eq!(0, atlas.tile_count());
    }

    #[test]
    fn empty_tiles_get_zero_uvs() {
        let platform = TestPlatform::new();
        let arena = LinearAllocator::new(&platform, 1024 * 1024).unwrap();
        let mut sheet = TileSheet::new(&arena, 2).unwrap();
        sheet.add_tile(0, 0, &[]);
        sheet.add_tile(0, 0, &[]);
        let atlas = sheet.generate(&arena).unwrap();
        assert_eq!((0, 0), (atlas.width, atlas.height));
        assert_eq!([0.0, 0.0], atlas.tile_uv(1).unwrap().uv1);
    }

    #[test]
    fn blit_broadcasts_gray_to_opaque_rgb() {
        let platform = TestPlatform::new();
        let arena = LinearAllocator::new(&platform, 1024 * 1024).unwrap();
        let mut sheet = TileSheet::new(&arena, 2).unwrap();
        sheet.add_tile(2, 1, &[10, 20]);
        sheet.add_tile(1, 1, &[30]);
        let atlas = sheet.generate(&arena).unwrap();

        // Two tiles: 2x2 grid of 2x1 cells, so the atlas is 4x2.
        assert_eq!((4, 2), (atlas.width, atlas.height));
        let row0 = &atlas.pixels[..16];
        assert_eq!(&[10, 10, 10, 255, 20, 20, 20, 255], &row0[..8]);
        assert_eq!(&[30, 30, 30, 255], &row0[8..12]);
        // The rest of the second tile's cell, and the unused row, stay clear.
        assert_eq!(&[0, 0, 0, 0], &row0[12..16]);
        assert!(atlas.pixels[16..].iter().all(|&b| b == 0));
    }

    #[test]
    #[should_panic]
    fn oversized_tile_is_fatal() {
        let platform = TestPlatform::new();
        let arena = LinearAllocator::new(&platform, 64 * 1024).unwrap();
        let mut sheet = TileSheet::new(&arena, 1).unwrap();
        sheet.add_tile(64, 33, &[0; 64 * 33]);
    }

    #[test]
    #[should_panic]
    fn overfilling_the_sheet_is_fatal() {
        let platform = TestPlatform::new();
        let arena = LinearAllocator::new(&platform, 64 * 1024).unwrap();
        let mut sheet = TileSheet::new(&arena, 1).unwrap();
        sheet.add_tile(1, 1, &[0]);
        sheet.add_tile(1, 1, &[0]);
    }
}
