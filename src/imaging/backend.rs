//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the rendition
//! generator needs: read source metadata, scale into a bounding box, and
//! stamp metadata onto a written file.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, statically
//! linked.

use super::params::ScaleParams;
use crate::metadata::MetadataTagSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot decode image {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of a written rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Descriptive metadata read from a source photo.
///
/// Each field is read independently; an absent or unreadable field is `None`
/// and never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMetadata {
    /// EXIF capture time as stored, e.g. `"2004:02:28 17:26:48"`.
    pub capture_timestamp: Option<String>,
    /// XMP `dc:title`, else IPTC ObjectName.
    pub title: Option<String>,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Read capture timestamp and title.
    fn read_metadata(&self, path: &Path) -> Result<SourceMetadata, BackendError>;

    /// Decode the source, scale it to fit the bounding box, encode it as JPEG
    /// at `params.output`. Returns the written dimensions.
    fn scale(&self, params: &ScaleParams) -> Result<Dimensions, BackendError>;

    /// Remove all metadata from the JPEG at `path`, then write exactly `tags`.
    fn stamp(&self, path: &Path, tags: &MetadataTagSet) -> Result<(), BackendError>;
}
