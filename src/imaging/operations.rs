//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a size slot, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::params::{Quality, ScaleParams};
use crate::config::SizeSlot;
use crate::metadata::MetadataTagSet;
use crate::types::RenditionEntry;
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan a scale operation without executing it.
pub fn plan_rendition(
    source: &Path,
    slot: &SizeSlot,
    output_dir: &Path,
    filename: &str,
    quality: Quality,
) -> ScaleParams {
    ScaleParams {
        source: source.to_path_buf(),
        output: output_dir.join(filename),
        max_width: slot.max_width,
        max_height: slot.max_height,
        quality,
    }
}

/// Write one rendition of `source` into `output_dir/filename`.
///
/// Creates the slot directory when missing, scales the image into the
/// slot's bounding box, then replaces all metadata on the result with `tags`.
pub fn create_rendition(
    backend: &impl ImageBackend,
    source: &Path,
    slot: &SizeSlot,
    output_dir: &Path,
    filename: &str,
    tags: &MetadataTagSet,
    quality: Quality,
) -> Result<RenditionEntry> {
    std::fs::create_dir_all(output_dir)?;

    let params = plan_rendition(source, slot, output_dir, filename, quality);
    let dims = backend.scale(&params)?;
    backend.stamp(&params.output, tags)?;

    Ok(RenditionEntry {
        slug: slot.slug.clone(),
        size_max: slot.size_max(),
        width: dims.width,
        height: dims.height,
    })
}
