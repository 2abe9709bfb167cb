// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

mod audio_clip;
mod font;
mod texture;

use core::cell::{Cell, OnceCell};

use enum_map::Enum;

use crate::strings::{extension, AssetId, AssetPath};

pub use audio_clip::AudioAsset;
pub use font::{FontAsset, Glyph};
pub use texture::TextureAsset;

/// The kinds of assets the registry knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum AssetKind {
    /// An image, uploaded as a texture.
    Texture,
    /// A font, rasterized into a glyph atlas texture.
    Font,
    /// An audio clip, decoded into PCM.
    Audio,
}

impl AssetKind {
    /// Returns the kind of asset files with the given extension are, or None
    /// if the extension is not recognized. Case-insensitive.
    pub fn from_extension(extension: &str) -> Option<AssetKind> {
        const KINDS: [(&str, AssetKind); 5] = [
            ("png", AssetKind::Texture),
            ("jpg", AssetKind::Texture),
            ("ttf", AssetKind::Font),
            ("ogg", AssetKind::Audio),
            ("wav", AssetKind::Audio),
        ];
        KINDS
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, kind)| *kind)
    }

    /// Returns the kind of asset the file at `path` is, based on its
    /// extension.
    pub fn from_path(path: &str) -> Option<AssetKind> {
        AssetKind::from_extension(extension(path)?)
    }
}

/// Where an [`AssetRecord`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Registered, but not loaded yet.
    Discovered,
    /// Loaded, and the payload is available. Final.
    Loaded,
    /// Loading was attempted and failed. Not retried until
    /// [`AssetRegistry::retry_failed`](super::AssetRegistry::retry_failed).
    Failed,
}

/// The loaded data of an asset. The variant always matches the record's
/// [`AssetKind`].
#[derive(Debug)]
pub enum AssetPayload<'eng> {
    /// The payload of an [`AssetKind::Texture`].
    Texture(TextureAsset),
    /// The payload of an [`AssetKind::Font`].
    Font(FontAsset<'eng>),
    /// The payload of an [`AssetKind::Audio`].
    Audio(AudioAsset<'eng>),
}

impl AssetPayload<'_> {
    /// Returns the kind of asset this payload belongs to.
    pub fn kind(&self) -> AssetKind {
        match self {
            AssetPayload::Texture(_) => AssetKind::Texture,
            AssetPayload::Font(_) => AssetKind::Font,
            AssetPayload::Audio(_) => AssetKind::Audio,
        }
    }
}

/// One registered asset. Created during discovery, payload filled in on the
/// first successful load and never changed after that.
///
/// Records are stored in a fixed arena that is never reallocated, so
/// references to them stay valid for as long as the registry lives.
#[derive(Debug)]
pub struct AssetRecord<'eng> {
    /// The hash of [`AssetRecord::name`].
    pub id: AssetId,
    /// The kind of asset, picked by the file extension.
    pub kind: AssetKind,
    /// The name the asset was registered under: its path relative to the
    /// discovery base path, without the extension.
    pub name: AssetPath,
    /// The path the asset is decoded from, relative to the root of the
    /// [`AssetSource`](platform_abstraction_layer::AssetSource).
    pub path: AssetPath,
    pub(super) state: Cell<LoadState>,
    pub(super) payload: OnceCell<AssetPayload<'eng>>,
}

impl<'eng> AssetRecord<'eng> {
    pub(super) fn new(id: AssetId, kind: AssetKind, name: AssetPath, path: AssetPath) -> Self {
        AssetRecord {
            id,
            kind,
            name,
            path,
            state: Cell::new(LoadState::Discovered),
            payload: OnceCell::new(),
        }
    }

    /// Returns where this asset is in its lifecycle.
    pub fn state(&self) -> LoadState {
        self.state.get()
    }

    /// Returns the loaded data, if the asset has been loaded.
    pub fn payload(&self) -> Option<&AssetPayload<'eng>> {
        self.payload.get()
    }

    /// Returns the texture data if this is a loaded texture.
    pub fn texture(&self) -> Option<&TextureAsset> {
        match self.payload.get()? {
            AssetPayload::Texture(texture) => Some(texture),
            _ => None,
        }
    }

    /// Returns the font data if this is a loaded font.
    pub fn font(&self) -> Option<&FontAsset<'eng>> {
        match self.payload.get()? {
            AssetPayload::Font(font) => Some(font),
            _ => None,
        }
    }

    /// Returns the audio data if this is a loaded audio clip.
    pub fn audio(&self) -> Option<&AudioAsset<'eng>> {
        match self.payload.get()? {
            AssetPayload::Audio(audio) => Some(audio),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AssetKind;

    #[test]
    fn kinds_by_extension() {
        assert_eq!(Some(AssetKind::Texture), AssetKind::from_path("sprites/ship.png"));
        assert_eq!(Some(AssetKind::Texture), AssetKind::from_path("bg.JPG"));
        assert_eq!(Some(AssetKind::Font), AssetKind::from_path("fonts/mono.ttf"));
        assert_eq!(Some(AssetKind::Audio), AssetKind::from_path("sfx\\laser.wav"));
        assert_eq!(Some(AssetKind::Audio), AssetKind::from_path("music.ogg"));
        assert_eq!(None, AssetKind::from_path("readme.txt"));
        assert_eq!(None, AssetKind::from_path("png"));
    }
}
