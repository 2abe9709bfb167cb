// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The traits the engine uses to reach everything outside of it: memory,
//! logging, texture uploads ([`Pal`]) and asset decoding ([`AssetSource`]).
//!
//! This is split off of the main engine crate so that the engine and the
//! platform implementations can be compiled independently.

#![no_std]
#![warn(missing_docs)]

mod io;
mod log;
mod render;

use core::{ffi::c_void, fmt::Arguments};

pub use io::*;
pub use log::*;
pub use render::*;

/// "Platform abstraction layer": a trait for using platform-dependent features
/// from the engine without depending on any platform directly.
///
/// All the functions have a `&self` parameter, so that the methods can access
/// some (possibly internally mutable) state, but still keeping the platform
/// object as widely usable as possible. None of these functions are hot, and
/// this trait is object safe, so using &dyn [`Pal`] should be fine
/// performance-wise.
pub trait Pal {
    /// Create a texture of the given size and format, filled with `pixels`,
    /// which are tightly packed rows in `format`. Returns None if the texture
    /// could not be created due to any reason (texture dimensions too large,
    /// out of vram, etc.).
    ///
    /// ## Implementation note
    ///
    /// These are never freed during the lifetime of the engine.
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
        params: TextureParams,
    ) -> Option<TextureRef>;

    /// Log a message. The engine does not have a global logger, all of its
    /// diagnostics go through here.
    fn log(&self, level: LogLevel, message: Arguments);

    /// Allocate the given amount of bytes (returning a null pointer on error).
    /// Not called often from the engine, memory is allocated in big chunks, so
    /// this can be slow and defensively implemented.
    ///
    /// The returned pointer must be aligned to at least 64 bytes.
    fn malloc(&self, size: usize) -> *mut c_void;

    /// Free the memory allocated by [`Pal::malloc`].
    ///
    /// ## Safety
    ///
    /// - `ptr` must have been returned by [`Pal::malloc`] of this same
    ///   platform, called with the same `size`.
    /// - Since the implementation is free to free the memory, the memory
    ///   pointed at by the given pointer shouldn't be accessed after calling
    ///   this.
    unsafe fn free(&self, ptr: *mut c_void, size: usize);
}
