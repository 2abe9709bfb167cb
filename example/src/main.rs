// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::PathBuf};

use anyhow::Context;
use bpaf::{batteries::verbose_by_slice, construct, long, OptionParser, Parser};
use engine::{
    allocators::LinearAllocator,
    resources::{
        AssetKind, AssetPayload, AssetRegistry, FailurePolicy, PackedAssetSource, RegistryConfig,
    },
};
use platform_abstraction_layer::AssetSource;
use platform_desktop::{DesktopPlatform, LooseAssetSource};
use tracing::{info, level_filters::LevelFilter, warn};

const ARENA_SIZE: usize = 256 * 1024 * 1024;

#[derive(Debug, Clone)]
enum Source {
    Loose(PathBuf),
    Packed(PathBuf),
}

#[derive(Debug, Clone)]
struct Options {
    verbosity_level: LevelFilter,
    source: Source,
    font_size: u32,
    retry_failures: bool,
    text: String,
}

fn options() -> OptionParser<Options> {
    let verbosity_level = verbose_by_slice(
        3,
        [
            LevelFilter::OFF,
            LevelFilter::ERROR,
            LevelFilter::WARN,
            LevelFilter::INFO,
            LevelFilter::DEBUG,
            LevelFilter::TRACE,
        ],
    );
    let loose = long("assets")
        .help("Load loose asset files from this directory")
        .argument::<PathBuf>("DIR")
        .map(Source::Loose);
    let packed = long("pak")
        .help("Load assets from this packed asset file (see import-asset pack)")
        .argument::<PathBuf>("FILE")
        .map(Source::Packed);
    let source = construct!([loose, packed]);
    let font_size = long("font-size")
        .help("The size fonts are rasterized at, in pixels per em")
        .argument::<u32>("PX")
        .fallback(RegistryConfig::DEFAULT.font_pixel_size)
        .display_fallback();
    let retry_failures = long("retry-failures")
        .help("Try decoding failed assets again on every load instead of remembering the failure")
        .switch();
    let text = long("text")
        .help("Text to measure with every loaded font")
        .argument::<String>("TEXT")
        .fallback(String::from("Hello, world!"));

    construct!(Options {
        verbosity_level,
        source,
        font_size,
        retry_failures,
        text,
    })
    .to_options()
    .descr("Discovers and loads every asset from a directory or a packed asset file")
}

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "profile")]
    profiling::tracy_client::Client::start();

    let opts = options().run();
    tracing_subscriber::fmt()
        .with_max_level(opts.verbosity_level)
        .init();

    let platform = DesktopPlatform::new();
    let arena = LinearAllocator::new(&platform, ARENA_SIZE)
        .context("Failed to allocate the asset arena")?;

    let loose;
    let archive;
    let packed;
    let source: &dyn AssetSource = match &opts.source {
        Source::Loose(dir) => {
            loose = LooseAssetSource::new(dir);
            &loose
        }
        Source::Packed(path) => {
            archive = fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            packed = PackedAssetSource::new(&archive, &arena)
                .with_context(|| format!("{} is not a valid packed asset file", path.display()))?;
            &packed
        }
    };

    let config = RegistryConfig {
        font_pixel_size: opts.font_size,
        failure_policy: if opts.retry_failures {
            FailurePolicy::Retry
        } else {
            FailurePolicy::CacheFailures
        },
        ..RegistryConfig::DEFAULT
    };
    let mut registry = AssetRegistry::new(&platform, source, &arena, config)
        .context("The asset arena is too small for the asset registry")?;
    registry.discover("");

    let mut failed = 0;
    for record in registry.iter() {
        let Some(loaded) = registry.load(record.id, record.kind) else {
            failed += 1;
            continue;
        };
        match loaded.payload() {
            Some(AssetPayload::Texture(texture)) => info!(
                "{}: {}x{} texture with {} channels",
                loaded.name, texture.width, texture.height, texture.channels,
            ),
            Some(AssetPayload::Font(font)) => {
                let (width, height) = font.measure(&opts.text);
                info!(
                    "{}: font with a {}x{} atlas, {:?} measures {width}x{height} at {}px",
                    loaded.name, font.width, font.height, opts.text, font.pixel_size,
                );
            }
            Some(AssetPayload::Audio(audio)) => info!(
                "{}: {} frames of {}-channel {} Hz audio",
                loaded.name,
                audio.frames(),
                audio.channels,
                audio.sample_rate,
            ),
            None => {}
        }
    }

    let fonts = registry.iter().filter(|r| r.kind == AssetKind::Font).count();
    if fonts == 0 {
        warn!("No fonts were found, nothing to measure the text with.");
    }
    info!(
        "Loaded {} of {} assets into {} textures, using {} of {} bytes of the asset arena.",
        registry.len() - failed,
        registry.len(),
        platform.texture_count(),
        arena.allocated(),
        arena.total(),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::options;

    #[test]
    fn check_bpaf_invariants() {
        options().check_invariants(true);
    }
}
