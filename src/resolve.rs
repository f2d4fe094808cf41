//! Tag → photo id → source path resolution.
//!
//! Both resolvers talk to the catalog through [`CatalogReader`] and keep the
//! order guarantees the rest of the pipeline relies on: ids come out sorted
//! ascending, paths come out 1:1 in id order.

use log::{debug, warn};
use std::path::PathBuf;

use crate::catalog::{CatalogError, CatalogReader};
use crate::tokens::{PhotoId, decode_token_list};

/// Resolve a tag to the ascending sequence of photo ids carrying it.
///
/// Malformed tokens are skipped; their count is logged once per tag.
/// A tag without a catalog row is [`CatalogError::TagNotFound`].
pub fn resolve_photo_ids(
    catalog: &impl CatalogReader,
    tag: &str,
) -> Result<Vec<PhotoId>, CatalogError> {
    let Some(list) = catalog.tag_token_list(tag)? else {
        debug!("Tag `{tag}` has no photos");
        return Ok(Vec::new());
    };

    let decoded = decode_token_list(&list);
    if decoded.dropped > 0 {
        warn!(
            "Skipped {} malformed or non-photo token(s) for tag `{}`",
            decoded.dropped, tag
        );
    }
    Ok(decoded.ids)
}

/// Look up the source path of every id, preserving input order.
///
/// A missing id aborts the whole resolution with
/// [`CatalogError::PhotoNotFound`].
pub fn resolve_photo_paths(
    catalog: &impl CatalogReader,
    ids: &[PhotoId],
) -> Result<Vec<PathBuf>, CatalogError> {
    ids.iter().map(|&id| catalog.photo_path(id)).collect()
}

/// Tag → ids → paths in one call.
pub fn resolve_tag(
    catalog: &impl CatalogReader,
    tag: &str,
) -> Result<Vec<PathBuf>, CatalogError> {
    let ids = resolve_photo_ids(catalog, tag)?;
    resolve_photo_paths(catalog, &ids)
}
