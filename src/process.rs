//! Rendition generation for a single source photo.
//!
//! Stage 2 of the pipeline. Takes one resolved source path and writes one
//! JPEG per size slot, each stamped with the photographer fields and the
//! photo's title.
//!
//! ## Output Structure
//!
//! ```text
//! public/img/
//! ├── lg/
//! │   └── 20040228172648.jpg     # fits 1280x960
//! └── sm/
//!     └── 20040228172648.jpg     # fits 178x100
//! ```
//!
//! ## Order of work
//!
//! 1. Read capture timestamp and title from the source.
//! 2. Derive the output filename from the timestamp.
//! 3. Overlay the title on the run's base tag set.
//! 4. Per slot, in configured order: decode, scale, encode, then stamp.
//!
//! The source is decoded once per slot and dropped before the next one, so
//! at most one full-size image is in memory at a time. Any failure aborts the
//! photo; nothing is retried or skipped.

use crate::config::{OutputLayout, SizeSlot};
use crate::imaging::{BackendError, ImageBackend, Quality, create_rendition};
use crate::metadata::{self, MetadataTagSet};
use crate::types::ManifestEntry;
use log::{debug, warn};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Write every slot's rendition of `source` and describe them.
pub fn process_photo(
    backend: &impl ImageBackend,
    source: &Path,
    slots: &[SizeSlot],
    base_tags: &MetadataTagSet,
    layout: &OutputLayout,
) -> Result<ManifestEntry, ProcessError> {
    if !source.exists() {
        return Err(ProcessError::SourceNotFound(source.to_path_buf()));
    }

    let source_meta = backend.read_metadata(source)?;
    if source_meta.capture_timestamp.is_none() {
        warn!(
            "No capture timestamp in {}; rendition will be named `{}`",
            source.display(),
            metadata::output_filename(None)
        );
    }
    let filename = metadata::output_filename(source_meta.capture_timestamp.as_deref());
    let tags = base_tags.with_title(source_meta.title.as_deref());
    let stamped: Vec<&str> = tags.iter().map(|(field, _)| field.key()).collect();
    debug!(
        "{} -> {} (stamping {})",
        source.display(),
        filename,
        stamped.join(", ")
    );

    let mut renditions = IndexMap::new();
    for slot in slots {
        let entry = create_rendition(
            backend,
            source,
            slot,
            &layout.slot_dir(&slot.slug),
            &filename,
            &tags,
            Quality::default(),
        )?;
        renditions.insert(slot.slug.clone(), entry);
    }

    Ok(ManifestEntry {
        filename,
        title: source_meta.title,
        renditions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::SourceMetadata;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::metadata::MetadataField;
    use crate::test_helpers::{create_tagged_jpeg, create_test_jpeg, default_slots};
    use crate::types::RenditionEntry;
    use tempfile::TempDir;

    fn base_tags() -> MetadataTagSet {
        let mut tags = MetadataTagSet::new();
        tags.insert(MetadataField::XmpCreator, "Jane Doe".to_string());
        tags
    }

    /// Mock source that exists on disk so the existence check passes.
    fn mock_source(tmp: &TempDir, name: &str) -> PathBuf {
        let path = tmp.path().join(name);
        std::fs::write(&path, b"placeholder").unwrap();
        path
    }

    // =========================================================================
    // Mock backend
    // =========================================================================

    #[test]
    fn process_with_mock_builds_entry_for_every_slot() {
        let tmp = TempDir::new().unwrap();
        let source = mock_source(&tmp, "a.jpg");
        let backend = MockBackend::new().with_source(
            source.to_str().unwrap(),
            (4000, 3000),
            SourceMetadata {
                capture_timestamp: Some("2004:02:28 17:26:48".to_string()),
                title: Some("Colmar".to_string()),
            },
        );
        let layout = OutputLayout::new(tmp.path().join("public"));

        let entry =
            process_photo(&backend, &source, &default_slots(), &base_tags(), &layout).unwrap();

        assert_eq!(entry.filename, "20040228172648.jpg");
        assert_eq!(entry.title.as_deref(), Some("Colmar"));
        assert_eq!(
            entry.rendition("lg"),
            Some(&RenditionEntry {
                slug: "lg".to_string(),
                size_max: (1280, 960),
                width: 1280,
                height: 960,
            })
        );
        assert_eq!(
            entry.rendition("sm"),
            Some(&RenditionEntry {
                slug: "sm".to_string(),
                size_max: (178, 100),
                width: 133,
                height: 100,
            })
        );
    }

    #[test]
    fn process_with_mock_records_operations_in_slot_order() {
        let tmp = TempDir::new().unwrap();
        let source = mock_source(&tmp, "a.jpg");
        let backend = MockBackend::new().with_source(
            source.to_str().unwrap(),
            (800, 600),
            SourceMetadata {
                capture_timestamp: Some("2004:02:28 17:26:48".to_string()),
                title: None,
            },
        );
        let layout = OutputLayout::new(tmp.path().join("public"));

        process_photo(&backend, &source, &default_slots(), &base_tags(), &layout).unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 5);
        assert!(matches!(&ops[0], RecordedOp::ReadMetadata(_)));
        assert!(matches!(&ops[1], RecordedOp::Scale { output, .. } if output.ends_with("img/lg/20040228172648.jpg")));
        assert!(matches!(&ops[2], RecordedOp::Stamp { path, .. } if path.ends_with("img/lg/20040228172648.jpg")));
        assert!(matches!(&ops[3], RecordedOp::Scale { output, .. } if output.ends_with("img/sm/20040228172648.jpg")));
        assert!(matches!(&ops[4], RecordedOp::Stamp { path, .. } if path.ends_with("img/sm/20040228172648.jpg")));
    }

    #[test]
    fn renditions_follow_configured_slot_order() {
        let tmp = TempDir::new().unwrap();
        let source = mock_source(&tmp, "a.jpg");
        let backend = MockBackend::new().with_source(
            source.to_str().unwrap(),
            (800, 600),
            SourceMetadata {
                capture_timestamp: Some("2004:02:28 17:26:48".to_string()),
                title: None,
            },
        );
        let layout = OutputLayout::new(tmp.path().join("public"));
        let mut slots = default_slots();
        slots.reverse();

        let entry = process_photo(&backend, &source, &slots, &base_tags(), &layout).unwrap();

        let slugs: Vec<&str> = entry.renditions.keys().map(String::as_str).collect();
        assert_eq!(slugs, vec!["sm", "lg"]);
    }

    #[test]
    fn title_is_added_to_stamped_tags() {
        let tmp = TempDir::new().unwrap();
        let source = mock_source(&tmp, "a.jpg");
        let backend = MockBackend::new().with_source(
            source.to_str().unwrap(),
            (800, 600),
            SourceMetadata {
                capture_timestamp: Some("2004:02:28 17:26:48".to_string()),
                title: Some("Colmar".to_string()),
            },
        );
        let layout = OutputLayout::new(tmp.path().join("public"));

        process_photo(&backend, &source, &default_slots(), &base_tags(), &layout).unwrap();

        let stamped: Vec<MetadataTagSet> = backend
            .get_operations()
            .into_iter()
            .filter_map(|op| match op {
                RecordedOp::Stamp { tags, .. } => Some(tags),
                _ => None,
            })
            .collect();
        assert_eq!(stamped.len(), 2);
        for tags in stamped {
            assert_eq!(tags.get(MetadataField::XmpTitle), Some("Colmar"));
            assert_eq!(tags.get(MetadataField::XmpCreator), Some("Jane Doe"));
        }
    }

    #[test]
    fn missing_timestamp_yields_bare_extension() {
        let tmp = TempDir::new().unwrap();
        let source = mock_source(&tmp, "a.jpg");
        let backend = MockBackend::new().with_source(
            source.to_str().unwrap(),
            (800, 600),
            SourceMetadata::default(),
        );
        let layout = OutputLayout::new(tmp.path().join("public"));

        let entry =
            process_photo(&backend, &source, &default_slots(), &base_tags(), &layout).unwrap();
        assert_eq!(entry.filename, ".jpg");
        assert_eq!(entry.title, None);
    }

    #[test]
    fn process_source_not_found_error() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let layout = OutputLayout::new(tmp.path().join("public"));

        let result = process_photo(
            &backend,
            &tmp.path().join("missing.jpg"),
            &default_slots(),
            &base_tags(),
            &layout,
        );
        assert!(matches!(result, Err(ProcessError::SourceNotFound(_))));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn unreadable_source_aborts() {
        let tmp = TempDir::new().unwrap();
        let source = mock_source(&tmp, "broken.jpg");
        let backend = MockBackend::new().with_unreadable(source.to_str().unwrap());
        let layout = OutputLayout::new(tmp.path().join("public"));

        let result = process_photo(&backend, &source, &default_slots(), &base_tags(), &layout);
        assert!(matches!(
            result,
            Err(ProcessError::Imaging(BackendError::Decode { .. }))
        ));
    }

    // =========================================================================
    // Real backend
    // =========================================================================

    #[test]
    fn process_generates_real_renditions() {
        use crate::imaging::RustBackend;

        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("dcp_4404.jpg");
        create_tagged_jpeg(&source, 400, 300, Some("2004:02:28 17:26:48"), Some("Colmar"));
        let layout = OutputLayout::new(tmp.path().join("public"));

        let entry = process_photo(
            &RustBackend::new(),
            &source,
            &default_slots(),
            &base_tags(),
            &layout,
        )
        .unwrap();

        let lg = layout.slot_dir("lg").join("20040228172648.jpg");
        let sm = layout.slot_dir("sm").join("20040228172648.jpg");
        assert_eq!(image::image_dimensions(&lg).unwrap(), (400, 300));
        assert_eq!(image::image_dimensions(&sm).unwrap(), (133, 100));
        assert_eq!(entry.rendition("sm").map(|r| (r.width, r.height)), Some((133, 100)));

        // Source capture time is not carried over, only the stamped fields
        let meta = RustBackend::new().read_metadata(&sm).unwrap();
        assert_eq!(meta.capture_timestamp, None);
        assert_eq!(meta.title.as_deref(), Some("Colmar"));
    }

    #[test]
    fn process_plain_jpeg_without_metadata() {
        use crate::imaging::RustBackend;

        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("plain.jpg");
        create_test_jpeg(&source, 50, 50);
        let layout = OutputLayout::new(tmp.path().join("public"));

        let entry = process_photo(
            &RustBackend::new(),
            &source,
            &default_slots(),
            &base_tags(),
            &layout,
        )
        .unwrap();
        assert_eq!(entry.filename, ".jpg");
        assert!(layout.slot_dir("lg").join(".jpg").exists());
    }
}
