use anyhow::Context;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::fit::Rotation;
use crate::geometry::{Axis, ReadingDirection};
use crate::layout::PAGE_GUTTER;
use crate::library::ScanOptions;
use crate::sort::FileSort;
use crate::spread::{AutoRotate, SpreadOptions, VirtualDoublePage};
use crate::zoom::{ZoomMode, ZoomModel};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pagefit";

/// Reader preferences, loaded once and handed to the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub reading_direction: ReadingDirection,

    #[serde(default)]
    pub double_page: bool,

    #[serde(default)]
    pub virtual_double_page: VirtualDoublePage,

    #[serde(default = "default_true")]
    pub double_step: bool,

    /// Extra pixels between pages of a spread
    #[serde(default)]
    pub spacing: i32,

    #[serde(default)]
    pub zoom_mode: ZoomMode,

    /// Axis fitted by the fixed-size zoom mode
    #[serde(default = "default_fit_to_size_axis")]
    pub fit_to_size_axis: Axis,

    #[serde(default = "default_fit_to_size_px")]
    pub fit_to_size_px: u32,

    #[serde(default)]
    pub scale_up: bool,

    #[serde(default = "default_true")]
    pub keep_ratio: bool,

    #[serde(default)]
    pub auto_rotate: AutoRotate,

    #[serde(default)]
    pub rotation: Rotation,

    #[serde(default)]
    pub sort: FileSort,

    #[serde(default)]
    pub recursive: bool,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_fit_to_size_axis() -> Axis {
    Axis::Vertical
}

fn default_fit_to_size_px() -> u32 {
    1800
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            reading_direction: ReadingDirection::default(),
            double_page: false,
            virtual_double_page: VirtualDoublePage::default(),
            double_step: true,
            spacing: 0,
            zoom_mode: ZoomMode::default(),
            fit_to_size_axis: default_fit_to_size_axis(),
            fit_to_size_px: default_fit_to_size_px(),
            scale_up: false,
            keep_ratio: true,
            auto_rotate: AutoRotate::default(),
            rotation: Rotation::None,
            sort: FileSort::default(),
            recursive: false,
        }
    }
}

impl Settings {
    /// `<config dir>/pagefit/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
    }

    /// Loads the settings from the default location, writing the defaults
    /// there on first run.
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::default_path() else {
            warn!("Could not determine config directory, using default settings");
            return Ok(Self::default());
        };
        if path.exists() {
            return Self::load_from_path(&path);
        }

        info!("Settings file not found, creating with defaults at {path:?}");
        let settings = Self::default();
        if let Err(e) = settings.save_to_path(&path) {
            error!("{e:#}");
        }
        Ok(settings)
    }

    pub fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read settings file {path:?}"))?;
        let mut settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {path:?}"))?;
        debug!("Loaded settings from {path:?}");
        settings.clamp_spacing();

        if settings.version < CURRENT_VERSION {
            settings.migrate();
            if let Err(e) = settings.save_to_path(path) {
                error!("{e:#}");
            }
        }
        Ok(settings)
    }

    pub fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory {parent:?}"))?;
            }
        }

        let body = serde_yaml::to_string(self).context("Failed to serialize settings")?;
        let content = format!("{SETTINGS_HEADER}{body}");
        fs::write(path, content).with_context(|| format!("Failed to save settings to {path:?}"))?;
        debug!("Saved settings to {path:?}");
        Ok(())
    }

    /// Pages may touch but never overlap
    fn clamp_spacing(&mut self) {
        if self.spacing < -PAGE_GUTTER {
            warn!("Spacing {} would overlap pages, using {}", self.spacing, -PAGE_GUTTER);
            self.spacing = -PAGE_GUTTER;
        }
    }

    fn migrate(&mut self) {
        info!("Migrating settings from v{} to v{}", self.version, CURRENT_VERSION);
        self.version = CURRENT_VERSION;
    }

    pub fn zoom_model(&self) -> ZoomModel {
        let mut zoom = ZoomModel::new(self.zoom_mode, self.scale_up);
        zoom.set_fit_to_size(self.fit_to_size_axis, self.fit_to_size_px);
        zoom
    }

    pub fn spread_options(&self) -> SpreadOptions {
        SpreadOptions {
            orientation: self.reading_direction.orientation(),
            double_page: self.double_page,
            virtual_double_page: self.virtual_double_page,
            double_step: self.double_step,
            spacing: self.spacing,
            zoom: self.zoom_model(),
            auto_rotate: self.auto_rotate,
            rotation: self.rotation,
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            sort: self.sort,
        }
    }
}

const SETTINGS_HEADER: &str = r#"# ============================================================================
# pagefit settings
# ============================================================================
# reading_direction:   western | manga
# virtual_double_page: never | as_one_title | as_one_wide | always
# zoom_mode:           best | width | height | manual | size
# auto_rotate:         never | width90 | width270 | height90 | height270
# rotation:            0 | 90 | 180 | 270
# sort.key:            name | name_literal | path | size | last_modified

"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Orientation;
    use crate::sort::{SortKey, SortOrder};
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILENAME);

        let settings = Settings {
            reading_direction: ReadingDirection::Manga,
            double_page: true,
            zoom_mode: ZoomMode::Width,
            rotation: Rotation::ThreeQuarter,
            sort: FileSort::new(SortKey::LastModified, SortOrder::Descending),
            ..Settings::default()
        };
        settings.save_to_path(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# ====="));
        assert!(content.contains("rotation: 270"));

        assert_eq!(Settings::load_from_path(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "double_page: true\nspacing: 4\n").unwrap();

        let settings = Settings::load_from_path(&path).unwrap();
        assert!(settings.double_page);
        assert_eq!(settings.spacing, 4);
        assert!(settings.keep_ratio);
        assert_eq!(settings.fit_to_size_px, 1800);
        assert_eq!(settings.version, CURRENT_VERSION);
    }

    #[test]
    fn test_old_version_is_migrated_and_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "version: 0\nzoom_mode: height\n").unwrap();

        let settings = Settings::load_from_path(&path).unwrap();
        assert_eq!(settings.version, CURRENT_VERSION);
        assert_eq!(settings.zoom_mode, ZoomMode::Height);

        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains(&format!("version: {CURRENT_VERSION}")));
    }

    #[test]
    fn test_overlapping_spacing_is_clamped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "spacing: -50\n").unwrap();

        let settings = Settings::load_from_path(&path).unwrap();
        assert_eq!(settings.spacing, -PAGE_GUTTER);
        assert!(
            crate::layout::compute_layout(
                &[crate::geometry::Size::new(10, 10); 2],
                crate::geometry::Size::new(100, 100),
                settings.reading_direction.orientation(),
                settings.spacing,
                1,
            )
            .is_ok()
        );
    }

    #[test]
    fn test_invalid_rotation_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "rotation: 45\n").unwrap();
        assert!(Settings::load_from_path(&path).is_err());
    }

    #[test]
    fn test_spread_options_follow_settings() {
        let settings = Settings {
            reading_direction: ReadingDirection::Manga,
            double_page: true,
            spacing: 3,
            ..Settings::default()
        };
        let options = settings.spread_options();
        assert_eq!(options.orientation, Orientation::MANGA);
        assert!(options.double_page);
        assert_eq!(options.spacing, 3);
        assert_eq!(options.zoom.fit_mode(), ZoomMode::Best);
        assert!(!settings.scan_options().recursive);
    }
}
