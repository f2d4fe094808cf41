//! Manifest records shared between the process and generate stages.
//!
//! The manifest is serialized to `manifest.json` by the pipeline and read
//! back by the HTML stage, so both sides must agree on this shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One scaled file written for one size slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenditionEntry {
    /// Size slot name, also the subdirectory under the image root.
    pub slug: String,
    /// Configured bounding box `(width, height)`.
    pub size_max: (u32, u32),
    pub width: u32,
    pub height: u32,
}

/// Everything produced for one source photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Rendition filename, shared by every slot directory.
    pub filename: String,
    pub title: Option<String>,
    /// Slot slug → rendition, in configured slot order.
    pub renditions: IndexMap<String, RenditionEntry>,
}

impl ManifestEntry {
    pub fn rendition(&self, slug: &str) -> Option<&RenditionEntry> {
        self.renditions.get(slug)
    }
}

/// Ordered output of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub tag: String,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
