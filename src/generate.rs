//! HTML gallery generation.
//!
//! Stage 3 of the pipeline. Takes the manifest written by the process stage
//! and renders a single static gallery page.
//!
//! ## Output Structure
//!
//! ```text
//! public/
//! ├── index.html                 # Gallery page
//! ├── manifest.json              # Written by the process stage
//! ├── assets/                    # Copy of the static asset directory
//! └── img/
//!     ├── lg/20040228172648.jpg
//!     └── sm/20040228172648.jpg
//! ```
//!
//! Each photo is shown as its `sm` rendition linking to the `lg` one, with
//! explicit width/height so the layout does not shift while loading. The
//! footer carries the photographer details from `[website]`.
//!
//! ## CSS
//!
//! `static/style.css` is embedded at compile time and inlined into the page,
//! so the gallery renders even when no asset directory is copied.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{OutputLayout, WebsiteConfig};
use crate::types::{Manifest, ManifestEntry};
use log::{debug, info};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Cannot copy static assets: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Refusing to clean {dir}: it contains {kept}")]
    UnsafeCleanup { dir: PathBuf, kept: PathBuf },
}

const CSS: &str = include_str!("../static/style.css");

/// Slot shown in the grid.
const PREVIEW_SLOT: &str = "sm";
/// Slot the preview links to.
const FULL_SLOT: &str = "lg";

/// Remove output from a previous run and re-add the static assets.
///
/// The public directory is deleted and recreated empty. When `static_dir`
/// exists its contents are copied into `<public>/assets`.
///
/// Nothing is deleted when the public directory is the working directory or
/// one of its ancestors, or when it contains `static_dir` or any of `keep`
/// (the config file and catalog, typically).
pub fn cleanup(
    layout: &OutputLayout,
    static_dir: &Path,
    keep: &[&Path],
) -> Result<(), GenerateError> {
    info!("Cleanup directory {}...", layout.public_dir.display());

    if layout.public_dir.is_dir() {
        check_disposable(&layout.public_dir, static_dir, keep)?;
        fs::remove_dir_all(&layout.public_dir)?;
    }
    fs::create_dir_all(&layout.public_dir)?;

    if static_dir.is_dir() {
        let copied = copy_tree(static_dir, &layout.assets_dir())?;
        debug!(
            "Copied {} static files from {}",
            copied,
            static_dir.display()
        );
    } else {
        debug!("No static directory at {}", static_dir.display());
    }
    Ok(())
}

fn check_disposable(dir: &Path, static_dir: &Path, keep: &[&Path]) -> Result<(), GenerateError> {
    let dir = dir.canonicalize()?;
    let cwd = std::env::current_dir().and_then(|d| d.canonicalize());
    let protected = cwd
        .into_iter()
        .chain(
            std::iter::once(static_dir)
                .chain(keep.iter().copied())
                .filter_map(|p| p.canonicalize().ok()),
        );
    for kept in protected {
        if kept.starts_with(&dir) {
            return Err(GenerateError::UnsafeCleanup { dir, kept });
        }
    }
    Ok(())
}

/// Copy every file below `src` into `dst`, keeping relative paths.
fn copy_tree(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Read a manifest written by the process stage.
pub fn load_manifest(path: &Path) -> Result<Manifest, GenerateError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Render `index.html` for `manifest` and return its path.
pub fn generate(
    manifest: &Manifest,
    website: &WebsiteConfig,
    layout: &OutputLayout,
) -> Result<PathBuf, GenerateError> {
    info!("Running generate_html for {} renditions...", manifest.len());

    let output_file = layout.index_path();
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, render_index(manifest, website).into_string())?;

    info!(
        "Done. Generated photo gallery for {} renditions",
        manifest.len()
    );
    info!("Your gallery: 'file://{}'", output_file.display());
    Ok(output_file)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Image URL relative to the public directory.
fn image_url(slot: &str, filename: &str) -> String {
    format!("img/{}/{}", slot, filename)
}

/// One gallery tile: preview linking to the full rendition.
fn render_figure(entry: &ManifestEntry) -> Markup {
    let preview = entry.rendition(PREVIEW_SLOT);
    let full = entry.rendition(FULL_SLOT);
    let alt = entry.title.as_deref().unwrap_or("");

    html! {
        figure {
            @if let Some(full) = full {
                a href=(image_url(FULL_SLOT, &entry.filename))
                    data-pswp-width=(full.width)
                    data-pswp-height=(full.height) {
                    @if let Some(preview) = preview {
                        img src=(image_url(PREVIEW_SLOT, &entry.filename))
                            width=(preview.width) height=(preview.height)
                            alt=(alt) loading="lazy";
                    } @else {
                        (alt)
                    }
                }
            } @else if let Some(preview) = preview {
                img src=(image_url(PREVIEW_SLOT, &entry.filename))
                    width=(preview.width) height=(preview.height)
                    alt=(alt) loading="lazy";
            }
            @if let Some(title) = &entry.title {
                figcaption { (title) }
            }
        }
    }
}

/// Photographer details and legal links.
fn render_footer(website: &WebsiteConfig) -> Markup {
    html! {
        footer.site-footer {
            p {
                "© " (website.photographer_name)
                @if !website.photographer_www.is_empty() {
                    " · "
                    a href=(website.photographer_www) { (website.photographer_www) }
                }
                @if !website.photographer_email.is_empty() {
                    " · "
                    a href={ "mailto:" (website.photographer_email) } { (website.photographer_email) }
                }
            }
            @if website.legal_link.is_some() || website.privacy_policy_link.is_some() {
                ul {
                    @if let Some((label, url)) = &website.legal_link {
                        li { a href=(url) { (label) } }
                    }
                    @if let Some((label, url)) = &website.privacy_policy_link {
                        li { a href=(url) { (label) } }
                    }
                }
            }
        }
    }
}

/// Renders the gallery page.
fn render_index(manifest: &Manifest, website: &WebsiteConfig) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="author" content=(website.photographer_name);
                title { (website.title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                header.site-header {
                    h1 { (website.title) }
                }
                main.gallery {
                    @for entry in &manifest.entries {
                        (render_figure(entry))
                    }
                }
                (render_footer(website))
            }
        }
    }
}
