//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! [`operations`](super::operations), which decides which renditions to write,
//! and the [`backend`](super::backend), which does the pixel work, so the
//! backend can be swapped for a mock in tests.

use std::path::PathBuf;

/// JPEG encoding quality (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Renditions are written at 95.
impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Scale `source` down to fit a bounding box and write it to `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}
