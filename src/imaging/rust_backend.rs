//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder`, RGB8 |
//! | Capture timestamp | `kamadak-exif` via [`exif_io`](super::exif_io) |
//! | Title | [`xmp`](super::xmp) `dc:title`, else [`iptc_parser`](super::iptc_parser) |
//! | Metadata stamp | [`jpeg::rewrite_metadata`](super::jpeg::rewrite_metadata) |

use super::backend::{BackendError, Dimensions, ImageBackend, SourceMetadata};
use super::calculations::calculate_bounded_dimensions;
use super::jpeg::{self, APP1};
use super::params::ScaleParams;
use super::{exif_io, iptc_parser, xmp};
use crate::metadata::{self, MetadataTagSet};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Encode as baseline JPEG. Alpha and palette images are flattened to RGB8.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let rgb = img.to_rgb8();
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8)
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))
}

/// XMP `dc:title`, else IPTC ObjectName, from a JPEG byte stream.
fn read_title(data: &[u8]) -> Option<String> {
    let from_xmp = jpeg::split(data).ok().and_then(|parts| {
        jpeg::find_segment(&parts, APP1, xmp::XMP_HEADER)
            .and_then(|packet| xmp::read_title(&String::from_utf8_lossy(packet)))
    });
    let from_iptc = iptc_parser::read_object_name(data);
    metadata::resolve(&[from_xmp.as_deref(), from_iptc.as_deref()])
}

impl ImageBackend for RustBackend {
    fn read_metadata(&self, path: &Path) -> Result<SourceMetadata, BackendError> {
        let data = std::fs::read(path).map_err(BackendError::Io)?;
        Ok(SourceMetadata {
            capture_timestamp: exif_io::read_exif_bytes(&data)
                .as_ref()
                .and_then(exif_io::capture_timestamp),
            title: read_title(&data),
        })
    }

    fn scale(&self, params: &ScaleParams) -> Result<Dimensions, BackendError> {
        let img = load_image(&params.source)?;
        let (width, height) = calculate_bounded_dimensions(
            (img.width(), img.height()),
            (params.max_width, params.max_height),
        );

        let scaled = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };
        save_jpeg(&scaled, &params.output, params.quality.value())?;

        Ok(Dimensions { width, height })
    }

    fn stamp(&self, path: &Path, tags: &MetadataTagSet) -> Result<(), BackendError> {
        let data = std::fs::read(path).map_err(BackendError::Io)?;

        let mut payloads = Vec::with_capacity(2);
        if let Some(exif) = exif_io::build_payload(tags)? {
            payloads.push(exif);
        }
        if let Some(xmp) = xmp::build_payload(tags) {
            payloads.push(xmp);
        }

        let stamped = jpeg::rewrite_metadata(&data, &payloads)?;
        std::fs::write(path, stamped).map_err(BackendError::Io)
    }
}
