// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{
    io,
    path::{Path, PathBuf},
};

use platform_abstraction_layer::{
    AssetSource, DecodeError, DecodedAudio, DecodedImage, RasterizedGlyph,
};
use tracing::warn;
use walkdir::WalkDir;

use crate::importers::{audio_clip, font, texture};

/// An [`AssetSource`] reading asset files from a directory, decoding them on
/// every request.
pub struct LooseAssetSource {
    root: PathBuf,
}

impl LooseAssetSource {
    /// Creates a source for the files under `root`. Asset paths are relative
    /// to it.
    pub fn new(root: impl Into<PathBuf>) -> LooseAssetSource {
        LooseAssetSource { root: root.into() }
    }

    /// Returns every file under `base_path`, relative to it, with `/` as the
    /// separator, sorted by name.
    pub fn files(&self, base_path: &str) -> Vec<String> {
        let base_dir = self.root.join(base_path);
        let mut files = Vec::new();
        for entry in WalkDir::new(&base_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry under {}: {err}", base_dir.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&base_dir) else {
                continue;
            };
            let Some(relative) = relative.to_str() else {
                warn!("Skipping non-UTF-8 path: {}", entry.path().display());
                continue;
            };
            files.push(relative.replace('\\', "/"));
        }
        files
    }

    fn decode<T>(
        &self,
        path: &str,
        import: impl FnOnce(&Path) -> anyhow::Result<T>,
    ) -> Result<T, DecodeError> {
        let full_path = self.root.join(path);
        import(&full_path).map_err(|err| {
            warn!("Failed to decode {}: {err:#}", full_path.display());
            to_decode_error(&err)
        })
    }
}

fn to_decode_error(err: &anyhow::Error) -> DecodeError {
    let not_found = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::NotFound);
    if not_found {
        DecodeError::NotFound
    } else {
        DecodeError::Malformed
    }
}

impl AssetSource for LooseAssetSource {
    fn list_assets(&self, base_path: &str, found: &mut dyn FnMut(&str)) {
        for file in self.files(base_path) {
            found(&file);
        }
    }

    fn decode_image(
        &self,
        path: &str,
        use_image: &mut dyn FnMut(DecodedImage),
    ) -> Result<(), DecodeError> {
        let image = self.decode(path, texture::import)?;
        use_image(image.as_decoded());
        Ok(())
    }

    fn rasterize_font(
        &self,
        path: &str,
        pixel_size: u32,
        use_glyph: &mut dyn FnMut(RasterizedGlyph),
    ) -> Result<(), DecodeError> {
        let glyphs = self.decode(path, |path| font::import(path, pixel_size))?;
        for glyph in &glyphs {
            use_glyph(glyph.as_rasterized());
        }
        Ok(())
    }

    fn decode_audio(
        &self,
        path: &str,
        use_audio: &mut dyn FnMut(DecodedAudio),
    ) -> Result<(), DecodeError> {
        let audio = self.decode(path, audio_clip::import)?;
        use_audio(audio.as_decoded());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use platform_abstraction_layer::{AssetSource, DecodeError};

    use super::LooseAssetSource;

    fn test_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("platform-desktop-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn wav_bytes(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let block_align = channels * 2;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&channels.to_le_bytes());
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            wav.extend_from_slice(&sample.to_le_bytes());
        }
        wav
    }

    #[test]
    fn lists_files_relative_to_the_base_path() {
        let dir = test_dir("listing");
        fs::create_dir_all(dir.join("assets/sprites")).unwrap();
        fs::write(dir.join("assets/sprites/ship.png"), b"").unwrap();
        fs::write(dir.join("assets/notes.txt"), b"").unwrap();
        fs::write(dir.join("outside.png"), b"").unwrap();

        let source = LooseAssetSource::new(&dir);
        let mut listed = Vec::new();
        source.list_assets("assets", &mut |path| listed.push(path.to_string()));
        assert_eq!(vec!["notes.txt", "sprites/ship.png"], listed);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn decodes_images_to_rgba() {
        let dir = test_dir("image");
        let mut image = image::RgbImage::new(3, 2);
        image.put_pixel(1, 0, image::Rgb([10, 20, 30]));
        image.save(dir.join("tile.png")).unwrap();

        let source = LooseAssetSource::new(&dir);
        let mut decoded = None;
        source
            .decode_image("tile.png", &mut |image| {
                decoded = Some((image.width, image.height, image.channels, image.pixels.to_vec()));
            })
            .unwrap();
        let (width, height, channels, pixels) = decoded.unwrap();
        assert_eq!((3, 2, 3), (width, height, channels));
        assert_eq!(3 * 2 * 4, pixels.len());
        assert_eq!(&[10, 20, 30, 255], &pixels[4..8]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn decodes_wav_audio() {
        let dir = test_dir("audio");
        let samples = [0, 1000, -1000, 2000, -2000, 3000];
        fs::write(dir.join("laser.wav"), wav_bytes(2, 22050, &samples)).unwrap();

        let source = LooseAssetSource::new(&dir);
        let mut decoded = None;
        source
            .decode_audio("laser.wav", &mut |audio| {
                decoded = Some((audio.channels, audio.sample_rate, audio.bit_depth, audio.pcm.to_vec()));
            })
            .unwrap();
        let (channels, sample_rate, bit_depth, pcm) = decoded.unwrap();
        assert_eq!((2, 22050, 16), (channels, sample_rate, bit_depth));
        let expected: Vec<u8> = samples.iter().flat_map(|s: &i16| s.to_le_bytes()).collect();
        assert_eq!(expected, pcm);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_and_corrupt_files_are_told_apart() {
        let dir = test_dir("errors");
        fs::write(dir.join("broken.png"), b"not a png").unwrap();
        fs::write(dir.join("broken.ttf"), b"not a font").unwrap();

        let source = LooseAssetSource::new(&dir);
        assert_eq!(
            Err(DecodeError::NotFound),
            source.decode_image("missing.png", &mut |_| {}),
        );
        assert_eq!(
            Err(DecodeError::Malformed),
            source.decode_image("broken.png", &mut |_| {}),
        );
        assert_eq!(
            Err(DecodeError::Malformed),
            source.rasterize_font("broken.ttf", 16, &mut |_| {}),
        );

        fs::remove_dir_all(&dir).unwrap();
    }
}
