// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

extern crate alloc;

use core::{cell::RefCell, ffi::c_void, fmt::Arguments};

use alloc::{format, string::String, vec::Vec};
use platform_abstraction_layer::{LogLevel, Pal, PixelFormat, TextureParams, TextureRef};

#[derive(Clone, Copy)]
#[repr(C, align(64))]
struct VeryAlignedThing([u8; 64]);
const VERY_ALIGNED_THING: VeryAlignedThing = VeryAlignedThing([0; 64]);

/// A texture handed to [`TestPlatform::create_texture`].
#[derive(Debug, Clone)]
pub struct UploadedTexture {
    pub width: u32,
    pub height: u32,
    pub params: TextureParams,
    pub pixels: Vec<u8>,
}

/// A [`Pal`] for tests: leaks-then-reclaims Vecs for malloc, and records
/// everything that's logged or uploaded so tests can inspect them.
#[derive(Default)]
pub struct TestPlatform {
    pub logs: RefCell<Vec<(LogLevel, String)>>,
    pub textures: RefCell<Vec<UploadedTexture>>,
    pub fail_uploads: bool,
}

impl TestPlatform {
    pub fn new() -> TestPlatform {
        TestPlatform::default()
    }

    pub fn logged(&self, level: LogLevel) -> usize {
        self.logs.borrow().iter().filter(|(l, _)| *l == level).count()
    }
}

impl Pal for TestPlatform {
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
        params: TextureParams,
    ) -> Option<TextureRef> {
        if self.fail_uploads {
            return None;
        }
        assert_eq!(
            width as usize * height as usize * format.bytes_per_pixel(),
            pixels.len()
        );
        let mut textures = self.textures.borrow_mut();
        textures.push(UploadedTexture {
            width,
            height,
            params,
            pixels: pixels.to_vec(),
        });
        Some(TextureRef::new(textures.len() as u64))
    }

    fn log(&self, level: LogLevel, message: Arguments) {
        self.logs.borrow_mut().push((level, format!("{message}")));
    }

    fn malloc(&self, size: usize) -> *mut c_void {
        let count = size.div_ceil(size_of::<VeryAlignedThing>());
        let vec: Vec<VeryAlignedThing> = alloc::vec![VERY_ALIGNED_THING; count];
        vec.leak().as_mut_ptr() as *mut c_void
    }

    unsafe fn free(&self, ptr: *mut c_void, size: usize) {
        let count = size.div_ceil(size_of::<VeryAlignedThing>());
        // Safety: ptr was leaked from a Vec<VeryAlignedThing> in malloc, with
        // the same length and capacity `count`.
        let vec: Vec<VeryAlignedThing> =
            unsafe { Vec::from_raw_parts(ptr as *mut VeryAlignedThing, count, count) };
        drop(vec);
    }
}
