// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

mod cli;
mod commands;
mod settings;

use cli::Command;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let opts = cli::options().run();

    tracing_subscriber::fmt()
        .with_max_level(opts.verbosity_level)
        .with_writer(std::io::stderr)
        .init();
    debug!("Options: {opts:?}");

    match opts.command {
        Command::Pack {
            assets,
            out,
            settings,
        } => {
            let settings = match settings {
                Some(path) => settings::read(&path)?,
                None => settings::ImportSettings::default(),
            };
            commands::pack::run(&assets, &out, &settings)
        }
        Command::Atlas { font, out, size } => commands::atlas::run(&font, &out, size),
    }
}
