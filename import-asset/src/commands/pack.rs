// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::Context;
use engine::{
    resources::{
        packed_file::{PackedEntry, PackedPayload},
        AssetKind,
    },
    strings::ASSET_PATH_LENGTH,
};
use enum_map::EnumMap;
use platform_abstraction_layer::RasterizedGlyph;
use platform_desktop::{
    importers::{audio_clip, font, texture},
    LooseAssetSource,
};
use tracing::{debug, info, trace};

use crate::settings::ImportSettings;

pub fn run(assets: &Path, out: &Path, settings: &ImportSettings) -> anyhow::Result<()> {
    let archive = pack(assets, settings)?;
    fs::write(out, &archive)
        .with_context(|| format!("Failed to write the packed asset file {}", out.display()))?;
    info!("Wrote {} bytes into {}.", archive.len(), out.display());
    Ok(())
}

/// Decodes every recognized asset under `assets` into a packed asset file.
pub fn pack(assets: &Path, settings: &ImportSettings) -> anyhow::Result<Vec<u8>> {
    anyhow::ensure!(
        assets.is_dir(),
        "{} is not a directory",
        assets.display(),
    );

    let source = LooseAssetSource::new(assets);
    let pixel_size = settings.font_pixel_size();
    let mut archive = Vec::new();
    let mut counts = EnumMap::<AssetKind, usize>::default();

    for path in source.files("") {
        if settings.skips(&path) {
            debug!("Skipping {path}, as configured in the import settings.");
            continue;
        }
        let Some(kind) = AssetKind::from_path(&path) else {
            trace!("Skipping {path}, not a recognized asset file.");
            continue;
        };
        anyhow::ensure!(
            path.len() <= ASSET_PATH_LENGTH,
            "The path {path} is too long, asset paths can be at most {ASSET_PATH_LENGTH} bytes",
        );

        let full_path = assets.join(&path);
        let context = || format!("Failed to import {}", full_path.display());
        let entry = match kind {
            AssetKind::Texture => {
                let image = texture::import(&full_path).with_context(context)?;
                write_entry(&mut archive, &path, PackedPayload::Texture(image.as_decoded()))
            }
            AssetKind::Font => {
                let imported = font::import(&full_path, pixel_size).with_context(context)?;
                let glyphs: Vec<RasterizedGlyph> =
                    imported.iter().map(|glyph| glyph.as_rasterized()).collect();
                write_entry(
                    &mut archive,
                    &path,
                    PackedPayload::Font {
                        pixel_size,
                        glyphs: &glyphs,
                    },
                )
            }
            AssetKind::Audio => {
                let audio = audio_clip::import(&full_path).with_context(context)?;
                write_entry(&mut archive, &path, PackedPayload::Audio(audio.as_decoded()))
            }
        };
        debug!("Packed {kind:?} {path} ({entry} bytes).");
        counts[kind] += 1;
    }

    info!(
        "Packed {} textures, {} fonts and {} audio clips from {}.",
        counts[AssetKind::Texture],
        counts[AssetKind::Font],
        counts[AssetKind::Audio],
        assets.display(),
    );
    Ok(archive)
}

fn write_entry(archive: &mut Vec<u8>, path: &str, payload: PackedPayload) -> usize {
    let entry = PackedEntry { path, payload };
    let size = entry.serialized_size();
    let mut cursor = archive.len();
    archive.resize(cursor + size, 0);
    entry.write(archive, &mut cursor);
    size
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use engine::{
        allocators::LinearAllocator,
        resources::{AssetKind, AssetRegistry, PackedAssetSource, RegistryConfig},
    };
    use platform_desktop::DesktopPlatform;

    use crate::settings::ImportSettings;

    use super::pack;

    fn asset_dir() -> PathBuf {
        let dir = env::temp_dir().join(format!("import-asset-pack-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("sprites")).unwrap();
        fs::create_dir_all(dir.join("drafts")).unwrap();
        image::RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 4]))
            .save(dir.join("sprites/ship.png"))
            .unwrap();
        image::RgbaImage::new(2, 2)
            .save(dir.join("drafts/alien.png"))
            .unwrap();
        fs::write(dir.join("readme.txt"), b"not an asset").unwrap();
        dir
    }

    #[test]
    fn packed_assets_load_through_the_registry() {
        let dir = asset_dir();
        let settings = ImportSettings::V1 {
            font_pixel_size: 32,
            skip: vec![String::from("drafts/")],
        };
        let archive = pack(&dir, &settings).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let platform = DesktopPlatform::new();
        let arena = LinearAllocator::new(&platform, 4 * 1024 * 1024).unwrap();
        let source = PackedAssetSource::new(&archive, &arena).unwrap();
        assert_eq!(1, source.len());

        let mut registry =
            AssetRegistry::new(&platform, &source, &arena, RegistryConfig::DEFAULT).unwrap();
        assert_eq!(1, registry.discover(""));
        let ship = registry
            .find("sprites/ship", AssetKind::Texture)
            .unwrap()
            .texture()
            .unwrap();
        assert_eq!((4, 4, 4), (ship.width, ship.height, ship.channels));

        let stored = platform.texture(ship.texture).unwrap();
        assert_eq!(&[1, 2, 3, 4], &stored.pixels[..4]);
        assert!(registry.find("drafts/alien", AssetKind::Texture).is_none());
    }

    #[test]
    fn packing_a_missing_directory_fails() {
        let dir = env::temp_dir().join("import-asset-this-directory-does-not-exist");
        assert!(pack(&dir, &ImportSettings::default()).is_err());
    }
}
