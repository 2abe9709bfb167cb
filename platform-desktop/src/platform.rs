// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    alloc::{self, Layout},
    cell::RefCell,
    ffi::c_void,
    fmt::Arguments,
    ptr,
};

use platform_abstraction_layer::{
    LogLevel, Pal, PixelFormat, TextureParams, TextureRef,
};
use tracing::{debug, error, info, trace, warn};

const MALLOC_ALIGN: usize = 64;

/// A texture created through [`DesktopPlatform`], kept in main memory.
#[derive(Debug, Clone)]
pub struct StoredTexture {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub params: TextureParams,
    pub pixels: Vec<u8>,
}

/// A [`Pal`] for running the engine without a window: logs go to `tracing`,
/// memory comes from the global allocator, and textures are stored in main
/// memory, where they can be inspected with [`DesktopPlatform::texture`].
#[derive(Default)]
pub struct DesktopPlatform {
    textures: RefCell<Vec<StoredTexture>>,
    max_texture_size: Option<u32>,
}

impl DesktopPlatform {
    /// Creates a platform with no limit on texture dimensions.
    pub fn new() -> DesktopPlatform {
        DesktopPlatform::default()
    }

    /// Creates a platform which refuses to create textures wider or taller
    /// than `max_texture_size`, like a GPU would.
    pub fn with_max_texture_size(max_texture_size: u32) -> DesktopPlatform {
        DesktopPlatform {
            max_texture_size: Some(max_texture_size),
            ..Default::default()
        }
    }

    /// Returns a copy of the texture, if it was created by this platform.
    pub fn texture(&self, texture: TextureRef) -> Option<StoredTexture> {
        let index = (texture.inner() as usize).checked_sub(1)?;
        self.textures.borrow().get(index).cloned()
    }

    /// Returns the amount of textures created so far.
    pub fn texture_count(&self) -> usize {
        self.textures.borrow().len()
    }
}

impl Pal for DesktopPlatform {
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
        params: TextureParams,
    ) -> Option<TextureRef> {
        if let Some(max) = self.max_texture_size {
            if width > max || height > max {
                warn!("Refusing to create a {width}x{height} texture, the maximum size is {max}.");
                return None;
            }
        }
        let expected_len = width as usize * height as usize * format.bytes_per_pixel();
        if pixels.len() != expected_len {
            error!(
                "Texture data is {} bytes, but a {width}x{height} {format:?} texture needs {expected_len}.",
                pixels.len(),
            );
            return None;
        }

        let mut textures = self.textures.borrow_mut();
        textures.push(StoredTexture {
            width,
            height,
            format,
            params,
            pixels: pixels.to_vec(),
        });
        debug!(
            "Created texture #{}: {width}x{height}, {:?}, mipmaps: {}",
            textures.len(),
            params.wrap,
            params.generate_mipmaps,
        );
        // Zero is never handed out, index + 1 is the handle.
        Some(TextureRef::new(textures.len() as u64))
    }

    fn log(&self, level: LogLevel, message: Arguments) {
        match level {
            LogLevel::Error => error!(target: "engine", "{message}"),
            LogLevel::Warn => warn!(target: "engine", "{message}"),
            LogLevel::Info => info!(target: "engine", "{message}"),
            LogLevel::Debug => debug!(target: "engine", "{message}"),
            LogLevel::Trace => trace!(target: "engine", "{message}"),
        }
    }

    fn malloc(&self, size: usize) -> *mut c_void {
        let Ok(layout) = Layout::from_size_align(size.max(1), MALLOC_ALIGN) else {
            return ptr::null_mut();
        };
        // Safety: the layout's size is non-zero.
        unsafe { alloc::alloc(layout) as *mut c_void }
    }

    unsafe fn free(&self, ptr: *mut c_void, size: usize) {
        let Ok(layout) = Layout::from_size_align(size.max(1), MALLOC_ALIGN) else {
            return;
        };
        // Safety: the caller guarantees ptr was returned by malloc with the
        // same size, so it was allocated with this same layout.
        unsafe { alloc::dealloc(ptr as *mut u8, layout) };
    }
}
