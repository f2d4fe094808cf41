//! # Shotwell Gallery
//!
//! Publishes a tagged selection of a [Shotwell](https://wiki.gnome.org/Apps/Shotwell)
//! photo library as a static web gallery. Tag photos `web` in Shotwell, run
//! `shotwell-gallery build`, upload `public/`.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Resolve   tag       →  photo ids  →  source paths   (catalog, read-only)
//! 2. Process   paths     →  public/img/{lg,sm}/*.jpg      (scale + stamp metadata)
//!                        →  public/manifest.json
//! 3. Generate  manifest  →  public/index.html             (Maud)
//! ```
//!
//! Resolution is deterministic: Shotwell stores a tag's members as an
//! unordered list of opaque `thumb<16 hex>` tokens, which are decoded to
//! integer ids and sorted before anything else happens. Every run regenerates
//! all renditions from scratch, one photo at a time.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `shotwell-gallery.toml` loading and validation, size slots, output layout |
//! | [`catalog`] | Read-only Shotwell SQLite queries behind the [`catalog::CatalogReader`] trait |
//! | [`tokens`] | `thumb<16 hex>` token validation, decode and encode |
//! | [`resolve`] | Tag → sorted photo ids → source paths |
//! | [`metadata`] | Stamped field set, title resolution, timestamp filenames |
//! | [`imaging`] | Pure-Rust scaling, JPEG metadata rewrite, EXIF/XMP/IPTC read and write |
//! | [`process`] | Stage 2 per photo — every size slot's rendition plus its manifest entry |
//! | [`pipeline`] | Drives stages 1 and 2 across the tag, honouring the processing cap |
//! | [`generate`] | Stage 3 — gallery page, output cleanup, static assets |
//! | [`types`] | Manifest records shared between stages 2 and 3 |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Read-Only Catalog Access
//!
//! The catalog is Shotwell's live database. Every query opens its own
//! connection with `SQLITE_OPEN_READ_ONLY` and closes it before returning, so
//! the tool can run while Shotwell is open and never holds a lock longer than
//! one statement.
//!
//! ## Fail Fast
//!
//! A tag that does not exist, an id without a path, or an image that cannot be
//! decoded aborts the run. Publishing a gallery with silently missing photos
//! is worse than publishing nothing. Malformed tokens are the exception: they
//! are skipped and counted, since Shotwell also stores video tokens in the
//! same list.
//!
//! ## Metadata Is Replaced, Not Merged
//!
//! Renditions carry exactly the photographer fields from the config plus the
//! photo's title. Everything else the source had (GPS, camera serials, face
//! regions) is removed by rewriting the JPEG header segments; pixel data is
//! never re-encoded for this step.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling, JPEG
//! encoding) and `kamadak-exif`. No exiftool, no ImageMagick, no Python: the
//! binary is self-contained.

pub mod catalog;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod resolve;
pub mod tokens;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
