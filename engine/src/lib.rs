// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The core of the asset pipeline: a registry of lazily loaded assets, and the
//! atlas packer used to turn rasterized fonts into textures.
//!
//! Everything platform-specific (decoding files, uploading textures, logging,
//! even memory) goes through the traits in [`platform_abstraction_layer`], so
//! this crate is `no_std` and does not allocate outside of the arenas it's
//! given.

#![no_std]
#![warn(missing_docs)]

pub mod allocators;
pub mod collections;
pub mod geom;
pub mod resources;
pub mod strings;

#[cfg(test)]
mod test_platform;

pub use platform_abstraction_layer;
