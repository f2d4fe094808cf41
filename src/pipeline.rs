//! Tag → manifest pipeline driver.
//!
//! Resolves the configured tag to source paths, then hands each path to
//! [`process_photo`] in order. Processing is sequential: one photo is fully
//! written and stamped before the next one is opened.
//!
//! ```text
//! tag ──► photo ids (sorted) ──► source paths ──► process_photo × N ──► Manifest
//! ```
//!
//! A processing cap (`process_n_photos`) truncates the run to a prefix of the
//! resolved order. Any catalog or image failure aborts the run and no
//! manifest is returned.
//!
//! [`build`] wraps [`run`] with output cleanup before and page generation
//! after, the way the `build` command runs them.

use crate::catalog::{CatalogError, CatalogReader, ShotwellCatalog};
use crate::config::{ConfigError, GalleryConfig, OutputLayout};
use crate::generate::{self, GenerateError};
use crate::imaging::ImageBackend;
use crate::metadata::base_tag_set;
use crate::output::{format_found_summary, format_progress};
use crate::process::{ProcessError, process_photo};
use crate::resolve::resolve_tag;
use crate::types::Manifest;
use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Failed to process {path}: {source}")]
    Process {
        path: PathBuf,
        #[source]
        source: ProcessError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// What a [`build`] wrote.
#[derive(Debug)]
pub struct BuildOutput {
    pub manifest: Manifest,
    pub index: PathBuf,
}

/// Run the whole pipeline and return the manifest in processing order.
pub fn run(
    config: &GalleryConfig,
    catalog: &impl CatalogReader,
    backend: &impl ImageBackend,
    layout: &OutputLayout,
) -> Result<Manifest, PipelineError> {
    let slots = config.size_slots()?;
    let base_tags = base_tag_set(&config.website);
    let tag = &config.source.tag;

    let paths = resolve_tag(catalog, tag)?;
    info!(
        "{}",
        format_found_summary(paths.len(), tag, &config.source.catalog)
    );

    let planned = match config.processing_cap() {
        Some(cap) if cap < paths.len() => {
            warn!("Only processing {cap} images, as requested via `process_n_photos`");
            cap
        }
        _ => paths.len(),
    };

    let mut manifest = Manifest::new(tag.clone());
    for (i, path) in paths.iter().take(planned).enumerate() {
        let entry = process_photo(backend, path, &slots, &base_tags, layout).map_err(|source| {
            PipelineError::Process {
                path: path.clone(),
                source,
            }
        })?;
        info!("{}", format_progress(i + 1, planned, path, &entry.filename));
        manifest.entries.push(entry);
    }

    Ok(manifest)
}

/// Clean the output, run the pipeline, write the manifest and the page.
///
/// The catalog is opened before anything is deleted: a missing catalog
/// leaves the previous output untouched. `keep` lists extra paths that must
/// not live under the public directory.
pub fn build(
    config: &GalleryConfig,
    backend: &impl ImageBackend,
    layout: &OutputLayout,
    static_dir: &Path,
    keep: &[&Path],
) -> Result<BuildOutput, PipelineError> {
    let catalog = ShotwellCatalog::new(&config.source.catalog)?;

    let mut protected = keep.to_vec();
    protected.push(catalog.path());
    generate::cleanup(layout, static_dir, &protected)?;

    let manifest = run(config, &catalog, backend, layout)?;
    write_manifest(&manifest, &layout.manifest_path())?;
    let index = generate::generate(&manifest, &config.website, layout)?;
    Ok(BuildOutput { manifest, index })
}

/// Serialize the manifest as pretty JSON, creating parent directories.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    Ok(())
}
