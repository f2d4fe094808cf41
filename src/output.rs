//! CLI output formatting for all pipeline stages.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Tag `web` in /home/me/.local/share/shotwell/data/photo.db (2 photos)
//! 001 #1023
//!     Source: /photos/2004/02/28/dcp_4404.jpg
//! 002 #2829
//!     Source: /photos/2004/03/01/dcp_4511.jpg
//! ```
//!
//! ## Process
//!
//! Progress goes through the logger, one line per photo:
//!
//! ```text
//! * 001/002: 02/28/dcp_4404.jpg -> 20040228172648.jpg
//! ```
//!
//! followed by the manifest summary:
//!
//! ```text
//! 001 Colmar
//!     Output: 20040228172648.jpg
//!     lg: 1280x960 (max 1280x960)
//!     sm: 133x100 (max 178x100)
//! 002 (20040301101500.jpg)
//!     ...
//!
//! Processed 2 photos for tag `web`
//! ```
//!
//! ## Generate
//!
//! ```text
//! Gallery → index.html (2 photos)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::tokens::PhotoId;
use crate::types::Manifest;
use std::path::{Component, Path, PathBuf};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a photo line: titled photos show title, untitled show filename in parens.
///
/// ```text
/// 001 Colmar                  // titled
/// 001 (20040228172648.jpg)    // untitled — filename IS the identity
/// ```
fn photo_line(index: usize, title: Option<&str>, filename: &str) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => format!("{} ({})", format_index(index), filename),
    }
}

/// Last `n` normal components of a path joined with `/`.
fn tail_components(path: &Path, n: usize) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    parts[parts.len().saturating_sub(n)..].join("/")
}

// ============================================================================
// Process
// ============================================================================

/// `Found N photos for tag `T` in catalog `P``
pub fn format_found_summary(count: usize, tag: &str, catalog: &Path) -> String {
    format!(
        "Found {} photos for tag `{}` in catalog `{}`",
        count,
        tag,
        catalog.display()
    )
}

/// One progress line: `* 001/012: 02/28/dcp_4404.jpg -> 20040228172648.jpg`.
///
/// The source is shortened to its last three path components.
pub fn format_progress(pos: usize, total: usize, source: &Path, filename: &str) -> String {
    format!(
        "* {}/{}: {} -> {}",
        format_index(pos),
        format_index(total),
        tail_components(source, 3),
        filename
    )
}

/// Manifest summary after a process run.
pub fn format_manifest_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in manifest.entries.iter().enumerate() {
        lines.push(photo_line(i + 1, entry.title.as_deref(), &entry.filename));
        if entry.title.is_some() {
            lines.push(format!("{}Output: {}", indent(1), entry.filename));
        }
        for (slug, rendition) in &entry.renditions {
            lines.push(format!(
                "{}{}: {}x{} (max {}x{})",
                indent(1),
                slug,
                rendition.width,
                rendition.height,
                rendition.size_max.0,
                rendition.size_max.1
            ));
        }
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Processed {} photos for tag `{}`",
        manifest.len(),
        manifest.tag
    ));
    lines
}

pub fn print_manifest_output(manifest: &Manifest) {
    for line in format_manifest_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Dry resolution report: every photo id with its source path.
pub fn format_check_output(
    tag: &str,
    catalog: &Path,
    resolved: &[(PhotoId, PathBuf)],
) -> Vec<String> {
    let mut lines = vec![format!(
        "Tag `{}` in {} ({} photos)",
        tag,
        catalog.display(),
        resolved.len()
    )];
    for (i, (id, path)) in resolved.iter().enumerate() {
        lines.push(format!("{} #{}", format_index(i + 1), id));
        lines.push(format!("{}Source: {}", indent(1), path.display()));
    }
    lines
}

pub fn print_check_output(tag: &str, catalog: &Path, resolved: &[(PhotoId, PathBuf)]) {
    for line in format_check_output(tag, catalog, resolved) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

pub fn format_generate_output(title: &str, index_path: &Path, photo_count: usize) -> Vec<String> {
    let file = index_path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| index_path.display().to_string());
    vec![format!("{} → {} ({} photos)", title, file, photo_count)]
}

pub fn print_generate_output(title: &str, index_path: &Path, photo_count: usize) {
    for line in format_generate_output(title, index_path, photo_count) {
        println!("{}", line);
    }
}
