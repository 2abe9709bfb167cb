// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Asset loading: the [`AssetRegistry`] that discovers and lazily loads
//! assets from an [`AssetSource`](platform_abstraction_layer::AssetSource),
//! the [`TileSheet`] atlas packer fonts are packed with, and the packed asset
//! file format along with the source that reads it.

mod assets;
mod deserialize;
pub mod packed_file;
mod packed_source;
mod registry;
mod serialize;
mod tile_sheet;

pub use assets::{
    AssetKind, AssetPayload, AssetRecord, AudioAsset, FontAsset, Glyph, LoadState, TextureAsset,
};
pub use packed_source::PackedAssetSource;
pub use registry::{AssetRegistry, FailurePolicy, LoadError, RegistryConfig};
pub use tile_sheet::{Atlas, TilePlacement, TileSheet, MAX_TILE_BYTES};
