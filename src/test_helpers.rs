//! Shared test utilities for the shotwell-gallery test suite.
//!
//! Provides synthetic JPEG writers, a Shotwell catalog builder backed by a
//! real SQLite file, and stock config values.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_catalog(&tmp.path().join("photo.db"), &CatalogFixture {
//!     tags: vec![("web", Some("thumb00000000000003ff,"))],
//!     photos: vec![(1023, "/photos/a.jpg")],
//! });
//! create_tagged_jpeg(&tmp.path().join("a.jpg"), 400, 300,
//!     Some("2004:02:28 17:26:48"), Some("Colmar"));
//! ```

use exif::{Field, In, Tag, Value};
use image::{ImageEncoder, RgbImage};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

use crate::config::{
    GalleryConfig, RenditionsConfig, SizeSlot, SourceConfig, WebsiteConfig,
};
use crate::imaging::{exif_io, jpeg, xmp};
use crate::metadata::{MetadataField, MetadataTagSet};
use crate::tokens::PhotoId;

// =========================================================================
// Images
// =========================================================================

/// Encode a gradient image as JPEG bytes.
pub fn test_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Create a small valid JPEG file with the given dimensions and no metadata.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, test_jpeg_bytes(width, height)).unwrap();
}

/// Create a JPEG carrying an EXIF `DateTimeOriginal` and an XMP `dc:title`.
pub fn create_tagged_jpeg(
    path: &Path,
    width: u32,
    height: u32,
    timestamp: Option<&str>,
    title: Option<&str>,
) {
    let mut payloads = Vec::new();
    if let Some(ts) = timestamp {
        payloads.push(
            exif_io::encode_fields(&[Field {
                tag: Tag::DateTimeOriginal,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![ts.as_bytes().to_vec()]),
            }])
            .unwrap(),
        );
    }
    if let Some(title) = title {
        let mut tags = MetadataTagSet::new();
        tags.insert(MetadataField::XmpTitle, title.to_string());
        payloads.push(xmp::build_payload(&tags).unwrap());
    }
    let data = jpeg::rewrite_metadata(&test_jpeg_bytes(width, height), &payloads).unwrap();
    std::fs::write(path, data).unwrap();
}

// =========================================================================
// Catalog
// =========================================================================

/// Rows for a minimal Shotwell catalog.
pub struct CatalogFixture<'a> {
    /// `(name, photo_id_list)`; `None` stores SQL NULL.
    pub tags: Vec<(&'a str, Option<&'a str>)>,
    /// `(id, filename)`
    pub photos: Vec<(PhotoId, &'a str)>,
}

/// Write a SQLite file with Shotwell's `TagTable` and `PhotoTable` layout.
pub fn create_catalog(db: &Path, fixture: &CatalogFixture) {
    let conn = Connection::open(db).unwrap();
    conn.execute_batch(
        "CREATE TABLE TagTable (
             id INTEGER PRIMARY KEY,
             name TEXT UNIQUE NOT NULL,
             photo_id_list TEXT,
             time_created INTEGER
         );
         CREATE TABLE PhotoTable (
             id INTEGER PRIMARY KEY,
             filename TEXT UNIQUE NOT NULL,
             width INTEGER,
             height INTEGER
         );",
    )
    .unwrap();
    for (name, list) in &fixture.tags {
        conn.execute(
            "INSERT INTO TagTable (name, photo_id_list, time_created) VALUES (?1, ?2, 0)",
            params![name, list],
        )
        .unwrap();
    }
    for (id, filename) in &fixture.photos {
        conn.execute(
            "INSERT INTO PhotoTable (id, filename) VALUES (?1, ?2)",
            params![*id as i64, filename],
        )
        .unwrap();
    }
}

// =========================================================================
// Config
// =========================================================================

/// The two stock slots: `lg` 1280x960, `sm` 178x100.
pub fn default_slots() -> Vec<SizeSlot> {
    vec![
        SizeSlot::parse("lg", "1280,960").unwrap(),
        SizeSlot::parse("sm", "178,100").unwrap(),
    ]
}

/// Config for tag `web` with default renditions and the given cap.
pub fn test_config(process_n_photos: usize) -> GalleryConfig {
    GalleryConfig {
        source: SourceConfig {
            tag: "web".to_string(),
            catalog: PathBuf::from("/tmp/photo.db"),
            process_n_photos,
        },
        renditions: RenditionsConfig::default(),
        website: WebsiteConfig {
            title: "Gallery".to_string(),
            photographer_name: "Jane Doe".to_string(),
            photographer_email: "jane@example.com".to_string(),
            photographer_www: "https://example.com".to_string(),
            legal_link: None,
            privacy_policy_link: None,
        },
    }
}
