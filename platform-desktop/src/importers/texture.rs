// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::Context;
use image::load_from_memory;
use platform_abstraction_layer::DecodedImage;
use tracing::debug;

/// An image converted to 8-bit RGBA.
#[derive(Debug, Clone)]
pub struct ImportedImage {
    pub width: u32,
    pub height: u32,
    /// The amount of channels in the source file.
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl ImportedImage {
    pub fn as_decoded(&self) -> DecodedImage<'_> {
        DecodedImage {
            width: self.width,
            height: self.height,
            channels: self.channels,
            pixels: &self.pixels,
        }
    }
}

pub fn import(image_path: &Path) -> anyhow::Result<ImportedImage> {
    let image_bytes = fs::read(image_path).context("Failed to open texture file for importing")?;
    let image = load_from_memory(&image_bytes)
        .context("Failed to read image file as an image (unsupported format?)")?;

    let channels = image.color().channel_count();
    let image = image.into_rgba8();
    let (width, height) = image.dimensions();
    debug!(
        "Read a {width}x{height} image with {channels} channels from: {}",
        image_path.display(),
    );

    Ok(ImportedImage {
        width,
        height,
        channels,
        pixels: image.into_raw(),
    })
}
