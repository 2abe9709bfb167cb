// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// The import settings file, configuring how `pack` processes assets.
///
/// Has enum variants for breaking changes in the format of the settings file,
/// but [`read`] always returns the newest variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "settings_file_version", rename_all = "snake_case")]
pub enum ImportSettings {
    V1 {
        /// The size fonts are rasterized at, in pixels per em. Must match the
        /// size the engine's asset registry is configured with.
        #[serde(default = "default_font_pixel_size")]
        font_pixel_size: u32,
        /// Asset paths (relative to the asset directory) starting with any of
        /// these are left out of the packed file.
        #[serde(default)]
        skip: Vec<String>,
    },
}

fn default_font_pixel_size() -> u32 {
    engine::resources::RegistryConfig::DEFAULT.font_pixel_size
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings::V1 {
            font_pixel_size: default_font_pixel_size(),
            skip: Vec::new(),
        }
    }
}

impl ImportSettings {
    pub fn font_pixel_size(&self) -> u32 {
        match self {
            ImportSettings::V1 {
                font_pixel_size, ..
            } => *font_pixel_size,
        }
    }

    /// Returns true if the asset at `path` should not be packed.
    pub fn skips(&self, path: &str) -> bool {
        match self {
            ImportSettings::V1 { skip, .. } => skip.iter().any(|prefix| path.starts_with(prefix.as_str())),
        }
    }
}

/// Reads the settings file, or returns the default settings if there's no
/// such file.
pub fn read(settings: &Path) -> anyhow::Result<ImportSettings> {
    let settings = if settings.exists() {
        let settings =
            fs::read_to_string(settings).context("Failed to open the import settings file")?;
        serde_json::from_str(&settings).context("Failed to parse the import settings file")?
    } else {
        ImportSettings::default()
    };

    // NOTE: When there's new versions of ImportSettings, convert to the newest
    // here (the rest of the tool assumes it)

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::ImportSettings;

    #[test]
    fn parses_v1_settings() {
        let settings: ImportSettings = serde_json::from_str(
            r#"{"settings_file_version":"v1","font_pixel_size":16,"skip":["drafts/"]}"#,
        )
        .unwrap();
        assert_eq!(16, settings.font_pixel_size());
        assert!(settings.skips("drafts/ship.png"));
        assert!(!settings.skips("sprites/ship.png"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: ImportSettings =
            serde_json::from_str(r#"{"settings_file_version":"v1"}"#).unwrap();
        assert_eq!(ImportSettings::default(), settings);
        assert_eq!(32, settings.font_pixel_size());
    }

    #[test]
    fn unknown_versions_are_rejected() {
        assert!(serde_json::from_str::<ImportSettings>(r#"{"settings_file_version":"v9"}"#).is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let path = std::env::temp_dir().join("import-asset-settings-that-do-not-exist.json");
        assert_eq!(ImportSettings::default(), super::read(&path).unwrap());
    }
}
