// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::fmt::{self, Display};

use enum_map::EnumMap;
use platform_abstraction_layer::{
    AssetSource, DecodeError, LogLevel, Pal, PixelFormat, TextureParams, WrapMode, FONT_GLYPH_COUNT,
};

use crate::{
    allocators::LinearAllocator,
    collections::FixedVec,
    geom::UvRect,
    strings::{canonical_name, join_path, AssetId},
};

use super::{
    assets::{AssetKind, AssetPayload, AssetRecord, AudioAsset, FontAsset, Glyph, LoadState},
    tile_sheet::{TileSheet, MAX_TILE_BYTES},
    TextureAsset,
};

/// What the registry does when asked for an asset that failed to load
/// before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Remember the failure, and fail subsequent loads without decoding
    /// again, until [`AssetRegistry::retry_failed`].
    CacheFailures,
    /// Try decoding again on every load.
    Retry,
}

/// Tunables of an [`AssetRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// The amount of assets that can be discovered in total.
    pub max_assets: usize,
    /// The size fonts are rasterized at, in pixels per em.
    pub font_pixel_size: u32,
    /// Texture parameters for image assets.
    pub texture_params: TextureParams,
    /// Texture parameters for font atlases.
    pub font_texture_params: TextureParams,
    /// The size of the temporary arena glyphs are packed in, in bytes.
    pub scratch_arena_size: usize,
    /// What to do when an asset that failed to load is loaded again.
    pub failure_policy: FailurePolicy,
}

impl RegistryConfig {
    /// Room for 2048 assets, 32 pixel fonts, and cached failures.
    pub const DEFAULT: RegistryConfig = RegistryConfig {
        max_assets: 2048,
        font_pixel_size: 32,
        texture_params: TextureParams {
            wrap: WrapMode::Repeat,
            generate_mipmaps: true,
        },
        font_texture_params: TextureParams {
            wrap: WrapMode::Repeat,
            generate_mipmaps: false,
        },
        scratch_arena_size: 8 * 1024 * 1024,
        failure_policy: FailurePolicy::CacheFailures,
    };
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig::DEFAULT
    }
}

/// Why [`AssetRegistry::try_load`] couldn't return an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// No asset with the identity and kind was discovered.
    NotRegistered,
    /// The asset source failed to decode the asset.
    DecodeFailed(DecodeError),
    /// The platform refused to create the texture.
    UploadFailed,
    /// The asset failed to load before, and failures are cached.
    PreviouslyFailed,
    /// A glyph of the font is larger than the atlas packer's tile buffer.
    GlyphTooLarge,
    /// The glyph atlas didn't fit in the scratch arena.
    ScratchExhausted,
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotRegistered => write!(f, "no such asset was discovered"),
            LoadError::DecodeFailed(err) => write!(f, "decoding failed: {err}"),
            LoadError::UploadFailed => write!(f, "texture creation failed"),
            LoadError::PreviouslyFailed => write!(f, "loading failed previously"),
            LoadError::GlyphTooLarge => {
                write!(f, "a glyph is larger than {MAX_TILE_BYTES} pixels")
            }
            LoadError::ScratchExhausted => write!(f, "glyph atlas does not fit in scratch memory"),
        }
    }
}

/// A fixed-capacity table of assets, looked up by identity and kind, and
/// loaded on first access.
///
/// The records live in `arena` and are never moved, so the references
/// returned by [`AssetRegistry::load`] are valid as long as the registry is.
/// The registry is single-threaded: loading mutates records in place through
/// shared references.
pub struct AssetRegistry<'eng> {
    platform: &'eng dyn Pal,
    source: &'eng dyn AssetSource,
    arena: &'eng LinearAllocator<'eng>,
    config: RegistryConfig,
    records: FixedVec<'eng, AssetRecord<'eng>>,
}

impl<'eng> AssetRegistry<'eng> {
    /// Creates an empty registry with space for `config.max_assets` records.
    /// Returns None if `arena` doesn't have enough space for the records.
    pub fn new(
        platform: &'eng dyn Pal,
        source: &'eng dyn AssetSource,
        arena: &'eng LinearAllocator<'eng>,
        config: RegistryConfig,
    ) -> Option<AssetRegistry<'eng>> {
        Some(AssetRegistry {
            platform,
            source,
            arena,
            config,
            records: FixedVec::new(arena, config.max_assets)?,
        })
    }

    /// Registers every asset with a recognized extension under `base_path`.
    /// Assets are named by their path relative to `base_path`, without the
    /// extension. Returns the amount of new assets.
    ///
    /// ### Panics
    ///
    /// If more than `config.max_assets` assets are discovered in total, or if
    /// an asset's path is longer than
    /// [`ASSET_PATH_LENGTH`](crate::strings::ASSET_PATH_LENGTH).
    pub fn discover(&mut self, base_path: &str) -> usize {
        profiling::function_scope!();
        let platform = self.platform;
        let records = &mut self.records;
        let mut counts = EnumMap::<AssetKind, usize>::default();

        self.source.list_assets(base_path, &mut |relative_path| {
            let Some(kind) = AssetKind::from_path(relative_path) else {
                return;
            };
            let (Some(name), Some(path)) = (
                canonical_name(relative_path),
                join_path(base_path, relative_path),
            ) else {
                panic!("asset path is too long: {base_path}/{relative_path}");
            };
            let id = AssetId::new(&name);

            if let Some(existing) = records.iter().find(|r| r.id == id && r.kind == kind) {
                platform.log(
                    LogLevel::Warn,
                    format_args!(
                        "{relative_path} is already registered as {}, skipping it",
                        existing.path,
                    ),
                );
                return;
            }

            platform.log(
                LogLevel::Trace,
                format_args!("discovered {kind:?} {name} ({id}) at {path}"),
            );
            if records.push(AssetRecord::new(id, kind, name, path)).is_err() {
                panic!(
                    "asset registry is full, cannot register {relative_path} (capacity: {})",
                    records.capacity(),
                );
            }
            counts[kind] += 1;
        });

        let total: usize = counts.values().sum();
        platform.log(
            LogLevel::Info,
            format_args!(
                "discovered {total} assets under {base_path:?}: {} textures, {} fonts, {} audio clips",
                counts[AssetKind::Texture],
                counts[AssetKind::Font],
                counts[AssetKind::Audio],
            ),
        );
        total
    }

    /// Returns the loaded asset with the identity and kind, loading it first
    /// if needed. Failures are logged and returned as None.
    pub fn load(&self, id: AssetId, kind: AssetKind) -> Option<&AssetRecord<'eng>> {
        match self.try_load(id, kind) {
            Ok(record) => Some(record),
            Err(LoadError::NotRegistered) => {
                self.platform.log(
                    LogLevel::Warn,
                    format_args!("tried to load unregistered {kind:?} {id}"),
                );
                None
            }
            Err(LoadError::PreviouslyFailed) => None,
            Err(err) => {
                let path = self.record(id, kind).map(|record| record.path.as_str());
                self.platform.log(
                    LogLevel::Warn,
                    format_args!("failed to load {kind:?} {}: {err}", path.unwrap_or("?")),
                );
                None
            }
        }
    }

    /// Hashes `name` and loads the asset with that identity. See
    /// [`AssetRegistry::load`].
    pub fn find(&self, name: &str, kind: AssetKind) -> Option<&AssetRecord<'eng>> {
        self.load(AssetId::new(name), kind)
    }

    /// Returns the loaded asset with the identity and kind, loading it first
    /// if needed.
    ///
    /// Each asset is decoded at most once when loading succeeds: the returned
    /// reference is the same on every call.
    ///
    /// ### Panics
    ///
    /// If the registry's arena runs out of space for a font's glyph table or
    /// an audio clip's samples.
    pub fn try_load(&self, id: AssetId, kind: AssetKind) -> Result<&AssetRecord<'eng>, LoadError> {
        profiling::function_scope!();
        let record = self.record(id, kind).ok_or(LoadError::NotRegistered)?;

        match record.state() {
            LoadState::Loaded => return Ok(record),
            LoadState::Failed => {
                self.platform.log(
                    LogLevel::Debug,
                    format_args!("{} failed to load before, not retrying", record.path),
                );
                return Err(LoadError::PreviouslyFailed);
            }
            LoadState::Discovered => {}
        }

        let payload = match kind {
            AssetKind::Texture => self.load_texture(record).map(AssetPayload::Texture),
            AssetKind::Font => self.load_font(record).map(AssetPayload::Font),
            AssetKind::Audio => self.load_audio(record).map(AssetPayload::Audio),
        };

        match payload {
            Ok(payload) => {
                debug_assert_eq!(kind, payload.kind());
                if record.payload.set(payload).is_err() {
                    unreachable!("asset payload set twice");
                }
                record.state.set(LoadState::Loaded);
                Ok(record)
            }
            Err(err) => {
                if self.config.failure_policy == FailurePolicy::CacheFailures {
                    record.state.set(LoadState::Failed);
                }
                Err(err)
            }
        }
    }

    /// Marks every asset which failed to load as not loaded yet, so the next
    /// load tries decoding it again. Returns the amount of such assets.
    pub fn retry_failed(&self) -> usize {
        let mut count = 0;
        for record in self.records.iter() {
            if record.state() == LoadState::Failed {
                record.state.set(LoadState::Discovered);
                count += 1;
            }
        }
        count
    }

    /// Returns the record with the identity and kind without loading it.
    pub fn record(&self, id: AssetId, kind: AssetKind) -> Option<&AssetRecord<'eng>> {
        self.records.iter().find(|r| r.id == id && r.kind == kind)
    }

    /// Returns every discovered record, in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord<'eng>> {
        self.records.iter()
    }

    /// Returns the amount of discovered assets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no assets have been discovered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn load_texture(&self, record: &AssetRecord) -> Result<TextureAsset, LoadError> {
        let params = self.config.texture_params;
        let mut texture = None;
        self.source
            .decode_image(&record.path, &mut |image| {
                texture = Some(
                    self.platform
                        .create_texture(
                            image.width,
                            image.height,
                            PixelFormat::Rgba,
                            image.pixels,
                            params,
                        )
                        .map(|texture| TextureAsset {
                            texture,
                            width: image.width,
                            height: image.height,
                            channels: image.channels,
                            params,
                        }),
                );
            })
            .map_err(LoadError::DecodeFailed)?;
        texture
            .ok_or(LoadError::DecodeFailed(DecodeError::Malformed))?
            .ok_or(LoadError::UploadFailed)
    }

    fn load_font(&self, record: &AssetRecord) -> Result<FontAsset<'eng>, LoadError> {
        let pixel_size = self.config.font_pixel_size;
        let scratch = LinearAllocator::new(self.platform, self.config.scratch_arena_size)
            .ok_or(LoadError::ScratchExhausted)?;
        let mut sheet =
            TileSheet::new(&scratch, FONT_GLYPH_COUNT).ok_or(LoadError::ScratchExhausted)?;

        // Metrics by code point, and the index of the glyph's tile.
        let mut metrics: [Option<(Glyph, usize)>; FONT_GLYPH_COUNT] = [None; FONT_GLYPH_COUNT];
        let mut too_large = false;
        self.source
            .rasterize_font(&record.path, pixel_size, &mut |glyph| {
                let code = glyph.code as usize;
                let pixels = glyph.width as usize * glyph.height as usize;
                if too_large || code >= FONT_GLYPH_COUNT || metrics[code].is_some() {
                    return;
                }
                if pixels > MAX_TILE_BYTES {
                    too_large = true;
                    return;
                }
                if glyph.bitmap.len() < pixels {
                    // Left out of the table, like glyphs missing from the font.
                    return;
                }
                let tile = sheet.len();
                sheet.add_tile(glyph.width, glyph.height, glyph.bitmap);
                let metric = Glyph {
                    size: (glyph.width, glyph.height),
                    bearing: (glyph.bearing_x, glyph.bearing_y),
                    advance: glyph.advance,
                    uv: UvRect::default(),
                };
                metrics[code] = Some((metric, tile));
            })
            .map_err(LoadError::DecodeFailed)?;
        if too_large {
            return Err(LoadError::GlyphTooLarge);
        }

        let atlas = sheet.generate(&scratch).ok_or(LoadError::ScratchExhausted)?;
        let texture = self
            .platform
            .create_texture(
                atlas.width,
                atlas.height,
                atlas.format(),
                &atlas.pixels,
                self.config.font_texture_params,
            )
            .ok_or(LoadError::UploadFailed)?;

        let Some(mut glyphs) = FixedVec::new(self.arena, FONT_GLYPH_COUNT) else {
            panic!("asset registry arena is full, cannot store the glyphs of {}", record.path);
        };
        for metric in metrics {
            let glyph = match metric {
                Some((glyph, tile)) => Glyph {
                    uv: atlas.tile_uv(tile).unwrap_or_default(),
                    ..glyph
                },
                None => Glyph::default(),
            };
            // The capacity is FONT_GLYPH_COUNT, same as the metrics array.
            let _ = glyphs.push(glyph);
        }

        self.platform.log(
            LogLevel::Debug,
            format_args!(
                "packed {} glyphs of {} into a {}x{} atlas",
                atlas.tile_count(),
                record.path,
                atlas.width,
                atlas.height,
            ),
        );

        Ok(FontAsset {
            texture,
            width: atlas.width,
            height: atlas.height,
            pixel_size,
            glyphs,
        })
    }

    fn load_audio(&self, record: &AssetRecord) -> Result<AudioAsset<'eng>, LoadError> {
        let arena = self.arena;
        let mut clip = None;
        self.source
            .decode_audio(&record.path, &mut |audio| {
                let Some(mut pcm) = FixedVec::new(arena, audio.pcm.len()) else {
                    panic!(
                        "asset registry arena is full, cannot store the {} bytes of {}",
                        audio.pcm.len(),
                        record.path,
                    );
                };
                pcm.extend_from_slice(audio.pcm);
                clip = Some(AudioAsset {
                    channels: audio.channels,
                    sample_rate: audio.sample_rate,
                    bit_depth: audio.bit_depth,
                    pcm,
                });
            })
            .map_err(LoadError::DecodeFailed)?;
        clip.ok_or(LoadError::DecodeFailed(DecodeError::Malformed))
    }
}
