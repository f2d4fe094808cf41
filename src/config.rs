//! Gallery configuration module.
//!
//! Handles loading and validating the `shotwell-gallery.toml` file that drives
//! a run: which tag to export, where the Shotwell catalog lives, how large the
//! renditions are, and whose name goes into the stamped metadata.
//!
//! ## Configuration Options
//!
//! ```toml
//! [source]
//! tag = "web"                         # Shotwell tag selecting the photos (required)
//! catalog = "/home/me/.local/share/shotwell/data/photo.db"   # (required)
//! process_n_photos = 0                # Stop after N photos (0 = all)
//!
//! [renditions]
//! lg = "1280,960"                     # Bounding box "<width>,<height>"
//! sm = "178,100"
//!
//! [website]
//! title = "Gallery"
//! photographer_name = "Jane Doe"      # (required)
//! photographer_email = "jane@example.com"
//! photographer_www = "https://example.com"
//! legal_link = ["Legal notice", "https://example.com/legal"]
//! privacy_policy_link = ["Privacy", "https://example.com/privacy"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Output Layout
//!
//! Output locations are not configured in the file. They are carried by an
//! [`OutputLayout`] built from the CLI `--output` flag and passed by reference
//! through the pipeline, so tests can point a whole run at a temp directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config filename looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "shotwell-gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Run configuration loaded from `shotwell-gallery.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryConfig {
    /// Which photos to export and from which catalog.
    pub source: SourceConfig,
    /// Rendition bounding boxes.
    #[serde(default)]
    pub renditions: RenditionsConfig,
    /// Gallery page and photographer details.
    pub website: WebsiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Shotwell tag name selecting the photos.
    pub tag: String,
    /// Path to Shotwell's `photo.db`.
    pub catalog: PathBuf,
    /// Processing cap. `0` means every resolved photo is processed.
    #[serde(default)]
    pub process_n_photos: usize,
}

/// Rendition bounding boxes as `"<width>,<height>"` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenditionsConfig {
    pub lg: String,
    pub sm: String,
}

impl Default for RenditionsConfig {
    fn default() -> Self {
        Self {
            lg: "1280,960".to_string(),
            sm: "178,100".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebsiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    pub photographer_name: String,
    #[serde(default)]
    pub photographer_email: String,
    #[serde(default)]
    pub photographer_www: String,
    /// `[label, url]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_link: Option<(String, String)>,
    /// `[label, url]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy_link: Option<(String, String)>,
}

fn default_title() -> String {
    "Gallery".to_string()
}

/// A named rendition target with a maximum bounding box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSlot {
    pub slug: String,
    pub max_width: u32,
    pub max_height: u32,
}

impl SizeSlot {
    /// Build a slot from a `"<width>,<height>"` string.
    pub fn parse(slug: &str, size_max: &str) -> Result<Self, ConfigError> {
        let (max_width, max_height) = parse_size_max(size_max).ok_or_else(|| {
            ConfigError::Validation(format!(
                "renditions.{slug} must be \"<width>,<height>\" with positive integers, got {size_max:?}"
            ))
        })?;
        Ok(Self {
            slug: slug.to_string(),
            max_width,
            max_height,
        })
    }

    pub fn size_max(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }
}

/// Parse `"178, 100"` into `(178, 100)`. Both values must be positive.
pub fn parse_size_max(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.split_once(',')?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

impl GalleryConfig {
    /// Validate required values and rendition strings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.tag.trim().is_empty() {
            return Err(ConfigError::Validation("source.tag must not be empty".into()));
        }
        if self.source.catalog.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "source.catalog must not be empty".into(),
            ));
        }
        if self.website.photographer_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "website.photographer_name must not be empty".into(),
            ));
        }
        self.size_slots()?;
        Ok(())
    }

    /// Size slots in processing order: `lg` first, then `sm`.
    pub fn size_slots(&self) -> Result<Vec<SizeSlot>, ConfigError> {
        Ok(vec![
            SizeSlot::parse("lg", &self.renditions.lg)?,
            SizeSlot::parse("sm", &self.renditions.sm)?,
        ])
    }

    /// `None` when every resolved photo should be processed.
    pub fn processing_cap(&self) -> Option<usize> {
        match self.source.process_n_photos {
            0 => None,
            n => Some(n),
        }
    }
}

/// Load and validate a config file.
///
/// A missing file is reported as [`ConfigError::NotFound`] so the binary can
/// tell the user where it looked.
pub fn load_config(path: &Path) -> Result<GalleryConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let config: GalleryConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Where a run writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Root of the published site (`index.html`, `manifest.json`, `assets/`).
    pub public_dir: PathBuf,
    /// Root of the scaled images; one subdirectory per size slot.
    pub image_root: PathBuf,
}

impl OutputLayout {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        let public_dir = public_dir.into();
        let image_root = public_dir.join("img");
        Self {
            public_dir,
            image_root,
        }
    }

    pub fn slot_dir(&self, slug: &str) -> PathBuf {
        self.image_root.join(slug)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.public_dir.join("manifest.json")
    }

    pub fn index_path(&self) -> PathBuf {
        self.public_dir.join("index.html")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.public_dir.join("assets")
    }
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# shotwell-gallery configuration
# ==============================

[source]
# Shotwell tag whose photos are exported.
tag = "web"
# Shotwell catalog database (opened read-only).
catalog = "/home/me/.local/share/shotwell/data/photo.db"
# Stop after this many photos. 0 processes every tagged photo.
process_n_photos = 0

[renditions]
# Bounding boxes as "<width>,<height>". Images are scaled down to fit,
# keeping their aspect ratio, and never scaled up.
lg = "1280,960"
sm = "178,100"

[website]
title = "Gallery"
# Written into EXIF Artist/OwnerName/Copyright and XMP Creator/Credit.
photographer_name = "Your Name"
photographer_email = ""
photographer_www = ""
# Optional footer links as [label, url].
# legal_link = ["Legal notice", "https://example.com/legal"]
# privacy_policy_link = ["Privacy policy", "https://example.com/privacy"]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r##"
[source]
tag = "web"
catalog = "/tmp/photo.db"

[website]
photographer_name = "Jane Doe"
"##;

    // =========================================================================
    // Parsing
    // =========================================================================

    #[test]
    fn parse_minimal_config_uses_defaults() {
        let config: GalleryConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.source.tag, "web");
        assert_eq!(config.source.process_n_photos, 0);
        assert_eq!(config.renditions.lg, "1280,960");
        assert_eq!(config.renditions.sm, "178,100");
        assert_eq!(config.website.title, "Gallery");
        assert!(config.website.legal_link.is_none());
    }

    #[test]
    fn parse_links_as_label_url_pairs() {
        let toml = format!(
            "{MINIMAL}legal_link = [\"Legal\", \"https://example.com/legal\"]\n"
        );
        let config: GalleryConfig = toml::from_str(&toml).unwrap();
        assert_eq!(
            config.website.legal_link,
            Some(("Legal".to_string(), "https://example.com/legal".to_string()))
        );
    }

    #[test]
    fn missing_tag_is_rejected() {
        let toml = r##"
[source]
catalog = "/tmp/photo.db"

[website]
photographer_name = "Jane Doe"
"##;
        assert!(toml::from_str::<GalleryConfig>(toml).is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = format!("{MINIMAL}\n[renditions]\nxl = \"4000,3000\"\n");
        assert!(toml::from_str::<GalleryConfig>(&toml).is_err());
    }

    #[test]
    fn stock_config_parses_and_validates() {
        let config: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        config.validate().unwrap();
    }

    // =========================================================================
    // Size slots
    // =========================================================================

    #[test]
    fn parse_size_max_accepts_spaces() {
        assert_eq!(parse_size_max("178, 100"), Some((178, 100)));
        assert_eq!(parse_size_max(" 1280 ,960 "), Some((1280, 960)));
    }

    #[test]
    fn parse_size_max_rejects_garbage() {
        assert_eq!(parse_size_max("178x100"), None);
        assert_eq!(parse_size_max("178,"), None);
        assert_eq!(parse_size_max("0,100"), None);
        assert_eq!(parse_size_max("-1,100"), None);
    }

    #[test]
    fn size_slots_in_configured_order() {
        let config: GalleryConfig = toml::from_str(MINIMAL).unwrap();
        let slots = config.size_slots().unwrap();
        let slugs: Vec<&str> = slots.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["lg", "sm"]);
        assert_eq!(slots[1].size_max(), (178, 100));
    }

    #[test]
    fn invalid_size_fails_validation() {
        let mut config: GalleryConfig = toml::from_str(MINIMAL).unwrap();
        config.renditions.sm = "small".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("renditions.sm")
        ));
    }

    #[test]
    fn processing_cap_zero_means_unlimited() {
        let mut config: GalleryConfig = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.processing_cap(), None);
        config.source.process_n_photos = 3;
        assert_eq!(config.processing_cap(), Some(3));
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join(DEFAULT_CONFIG_FILENAME));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, MINIMAL).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.website.photographer_name, "Jane Doe");
    }

    #[test]
    fn load_config_empty_photographer_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, MINIMAL.replace("Jane Doe", " ")).unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILENAME);
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn output_layout_paths() {
        let layout = OutputLayout::new("/srv/public");
        assert_eq!(layout.image_root, PathBuf::from("/srv/public/img"));
        assert_eq!(layout.slot_dir("sm"), PathBuf::from("/srv/public/img/sm"));
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/srv/public/manifest.json")
        );
    }
}
