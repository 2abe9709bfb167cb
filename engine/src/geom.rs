// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rectangles in pixel and texture space.

/// An integer axis-aligned rectangle, in pixels, with the origin at the
/// top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    /// The horizontal coordinate of the top-left corner of the rectangle.
    pub x: u32,
    /// The vertical coordinate of the top-left corner of the rectangle.
    pub y: u32,
    /// The width of the rectangle.
    pub w: u32,
    /// The height of the rectangle.
    pub h: u32,
}

impl PixelRect {
    /// Creates a new [`PixelRect`] from a given top-left corner and
    /// dimensions.
    pub const fn xywh(x: u32, y: u32, w: u32, h: u32) -> PixelRect {
        PixelRect { x, y, w, h }
    }

    /// Returns true if `other` is entirely inside this rectangle.
    pub const fn contains(&self, other: &PixelRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.w <= self.x + self.w
            && other.y + other.h <= self.y + self.h
    }

    /// Returns true if the two rectangles share any pixels.
    pub const fn overlaps(&self, other: &PixelRect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Converts the rectangle into normalized texture coordinates within a
    /// `width` by `height` texture. Zero dimensions produce zero coordinates
    /// along that axis.
    pub fn to_uv(&self, width: u32, height: u32) -> UvRect {
        let u = |px: u32| if width == 0 { 0.0 } else { px as f32 / width as f32 };
        let v = |px: u32| if height == 0 { 0.0 } else { px as f32 / height as f32 };
        UvRect {
            uv0: [u(self.x), v(self.y)],
            uv1: [u(self.x + self.w), v(self.y + self.h)],
        }
    }
}

/// A rectangle in normalized texture coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UvRect {
    /// The top-left corner.
    pub uv0: [f32; 2],
    /// The bottom-right corner.
    pub uv1: [f32; 2],
}
