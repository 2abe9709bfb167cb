// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use bpaf::{batteries::verbose_by_slice, construct, long, OptionParser, Parser};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Options {
    pub verbosity_level: LevelFilter,
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decode every asset in a directory into one packed asset file.
    Pack {
        assets: PathBuf,
        out: PathBuf,
        settings: Option<PathBuf>,
    },
    /// Rasterize a font and write its glyph atlas as an image, for checking
    /// what the engine will see.
    Atlas {
        font: PathBuf,
        out: PathBuf,
        size: u32,
    },
}

pub fn options() -> OptionParser<Options> {
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

    let pack = pack();
    let atlas = atlas();
    let command = construct!([pack, atlas]);

    construct!(Options {
        verbosity_level,
        command
    })
    .to_options()
    .descr("Conditions assets for the engine")
}

fn pack() -> impl Parser<Command> {
    let assets = long("assets")
        .help("The directory to pack the assets of")
        .argument::<PathBuf>("DIR")
        .complete_shell(bpaf::ShellComp::Dir { mask: None });
    let out = long("out")
        .help("The packed asset file to create (overwritten if it exists)")
        .argument::<PathBuf>("FILE")
        .complete_shell(bpaf::ShellComp::File { mask: None });
    let settings = long("settings")
        .help("The import settings file to use (a JSON file)")
        .argument::<PathBuf>("FILE")
        .complete_shell(bpaf::ShellComp::File {
            mask: Some("*.json"),
        })
        .optional();

    construct!(Command::Pack {
        assets,
        out,
        settings
    })
    .to_options()
    .descr("Decode every recognized asset under a directory into a packed asset file")
    .command("pack")
}

fn atlas() -> impl Parser<Command> {
    let font = long("font")
        .help("The font file to rasterize")
        .argument::<PathBuf>("FILE")
        .complete_shell(bpaf::ShellComp::File {
            mask: Some("*.ttf"),
        });
    let out = long("out")
        .help("The image file to write the atlas into")
        .argument::<PathBuf>("PNG")
        .complete_shell(bpaf::ShellComp::File {
            mask: Some("*.png"),
        });
    let size = long("size")
        .help("The size to rasterize the glyphs at, in pixels per em")
        .argument::<u32>("PX")
        .fallback(32)
        .display_fallback();

    construct!(Command::Atlas { font, out, size })
        .to_options()
        .descr("Rasterize the ASCII glyphs of a font into an atlas image")
        .command("atlas")
}
