// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! The desktop implementation of the platform abstraction layer: a headless
//! [`Pal`](platform_abstraction_layer::Pal) which logs with `tracing`, and an
//! [`AssetSource`](platform_abstraction_layer::AssetSource) for loose asset
//! files on disk.

pub mod importers;
mod loose_source;
mod platform;

pub use loose_source::LooseAssetSource;
pub use platform::{DesktopPlatform, StoredTexture};
