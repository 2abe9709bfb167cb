// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use platform_abstraction_layer::{TextureParams, TextureRef};

/// An image uploaded to the GPU as-is.
#[derive(Debug, Clone, Copy)]
pub struct TextureAsset {
    /// The platform's handle to the uploaded texture.
    pub texture: TextureRef,
    /// Width of the texture in pixels.
    pub width: u32,
    /// Height of the texture in pixels.
    pub height: u32,
    /// The amount of color channels in the source image. The uploaded texture
    /// is always RGBA.
    pub channels: u8,
    /// The wrap mode and mipmap setting the texture was created with.
    pub params: TextureParams,
}
