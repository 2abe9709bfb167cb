// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use platform_abstraction_layer::{
    AssetSource, DecodeError, DecodedAudio, DecodedImage, RasterizedGlyph,
};

use crate::{allocators::LinearAllocator, collections::FixedVec};

use super::{
    assets::AssetKind,
    packed_file::{ArchivedEntry, ArchivedPayload, PackedFileReader},
};

/// An [`AssetSource`] serving already-decoded assets out of a packed asset
/// file (see [`packed_file`](super::packed_file)) held in memory.
pub struct PackedAssetSource<'a> {
    entries: FixedVec<'a, ArchivedEntry<'a>>,
}

impl<'a> PackedAssetSource<'a> {
    /// Indexes the entries of `archive`. Returns None if the archive is
    /// malformed or truncated, if an entry's contents don't match the kind of
    /// asset its path names, or if `arena` doesn't have space for the index.
    pub fn new(archive: &'a [u8], arena: &'a LinearAllocator) -> Option<PackedAssetSource<'a>> {
        profiling::function_scope!();
        let mut reader = PackedFileReader::new(archive);
        let count = reader.by_ref().count();
        if !reader.is_at_end() {
            return None;
        }

        let mut entries = FixedVec::new(arena, count)?;
        for entry in PackedFileReader::new(archive) {
            if AssetKind::from_path(entry.path) != Some(entry.kind()) {
                return None;
            }
            entries.push(entry).ok()?;
        }
        Some(PackedAssetSource { entries })
    }

    /// Returns the amount of entries in the archive.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, path: &str) -> Result<&ArchivedEntry<'a>, DecodeError> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .ok_or(DecodeError::NotFound)
    }
}

impl AssetSource for PackedAssetSource<'_> {
    fn list_assets(&self, base_path: &str, found: &mut dyn FnMut(&str)) {
        let base_path = base_path.trim_matches('/');
        for entry in self.entries.iter() {
            if base_path.is_empty() {
                found(entry.path);
            } else if let Some(relative) = entry
                .path
                .strip_prefix(base_path)
                .and_then(|rest| rest.strip_prefix('/'))
            {
                found(relative);
            }
        }
    }

    fn decode_image(
        &self,
        path: &str,
        use_image: &mut dyn FnMut(DecodedImage),
    ) -> Result<(), DecodeError> {
        match self.entry(path)?.payload {
            ArchivedPayload::Texture(image) => {
                use_image(image);
                Ok(())
            }
            _ => Err(DecodeError::Unsupported),
        }
    }

    fn rasterize_font(
        &self,
        path: &str,
        pixel_size: u32,
        use_glyph: &mut dyn FnMut(RasterizedGlyph),
    ) -> Result<(), DecodeError> {
        match self.entry(path)?.payload {
            // Glyphs are baked at one size when packing.
            ArchivedPayload::Font {
                pixel_size: packed_size,
                ..
            } if packed_size != pixel_size => Err(DecodeError::Unsupported),
            ArchivedPayload::Font { glyphs, .. } => {
                glyphs.iter().for_each(use_glyph);
                Ok(())
            }
            _ => Err(DecodeError::Unsupported),
        }
    }

    fn decode_audio(
        &self,
        path: &str,
        use_audio: &mut dyn FnMut(DecodedAudio),
    ) -> Result<(), DecodeError> {
        match self.entry(path)?.payload {
            ArchivedPayload::Audio(audio) => {
                use_audio(audio);
                Ok(())
            }
            _ => Err(DecodeError::Unsupported),
        }
    }
}
