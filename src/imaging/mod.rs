//! Image processing — pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Scale → JPEG** | `resize_exact` (Lanczos3) + `JpegEncoder`, quality 95 |
//! | **EXIF** | `kamadak-exif` reader and experimental writer |
//! | **XMP** | packet builder + pattern reader |
//! | **IPTC title** | custom parser (JPEG APP13) |
//! | **Metadata stamp** | JPEG segment rewrite, pixels untouched |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod exif_io;
pub(crate) mod iptc_parser;
pub mod jpeg;
pub mod operations;
mod params;
pub mod rust_backend;
pub mod xmp;

pub use backend::{BackendError, Dimensions, ImageBackend, SourceMetadata};
pub use calculations::calculate_bounded_dimensions;
pub use operations::{create_rendition, plan_rendition};
pub use params::{Quality, ScaleParams};
pub use rust_backend::RustBackend;
