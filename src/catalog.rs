//! Read-only access to the Shotwell photo catalog.
//!
//! Shotwell keeps its library in a SQLite file (`photo.db`). Two tables matter
//! here:
//!
//! ```text
//! TagTable    name TEXT, photo_id_list TEXT   "thumb0000000000000b0d,thumb00...,"
//! PhotoTable  id INTEGER, filename TEXT        "/home/me/Pictures/2004/02/28/dcp_4404.jpg"
//! ```
//!
//! [`CatalogReader`] is the seam between the resolvers and the database, so
//! resolver logic can be exercised against an in-memory fake. The production
//! implementation, [`ShotwellCatalog`], opens a fresh read-only connection for
//! every query and never holds one across calls: at most one query is in
//! flight at any time.

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tokens::PhotoId;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog database not found: {0}")]
    MissingDatabase(PathBuf),
    #[error("Tag `{0}` not found in catalog")]
    TagNotFound(String),
    #[error("Photo id {0} not found in catalog")]
    PhotoNotFound(PhotoId),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Queries the resolvers need from a photo catalog.
pub trait CatalogReader {
    /// Raw comma-separated token list stored for `tag`.
    ///
    /// `Ok(None)` means the tag exists but carries no list (SQL `NULL`).
    /// A tag without a row is [`CatalogError::TagNotFound`].
    fn tag_token_list(&self, tag: &str) -> Result<Option<String>, CatalogError>;

    /// Source file path recorded for a photo id.
    fn photo_path(&self, id: PhotoId) -> Result<PathBuf, CatalogError>;
}

/// A Shotwell `photo.db` on disk.
#[derive(Debug, Clone)]
pub struct ShotwellCatalog {
    db_path: PathBuf,
}

impl ShotwellCatalog {
    /// Point at a catalog file. Fails with [`CatalogError::MissingDatabase`]
    /// if it does not exist.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let db_path = db_path.into();
        if !db_path.is_file() {
            return Err(CatalogError::MissingDatabase(db_path));
        }
        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection, CatalogError> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }
}

impl CatalogReader for ShotwellCatalog {
    fn tag_token_list(&self, tag: &str) -> Result<Option<String>, CatalogError> {
        let conn = self.connect()?;
        let row: Option<Option<String>> = conn
            .query_row(
                "SELECT photo_id_list FROM TagTable WHERE name = ?1",
                params![tag],
                |row| row.get(0),
            )
            .optional()?;
        row.ok_or_else(|| CatalogError::TagNotFound(tag.to_string()))
    }

    fn photo_path(&self, id: PhotoId) -> Result<PathBuf, CatalogError> {
        // SQLite integers are signed; ids beyond i64 cannot exist in the table.
        let key = i64::try_from(id).map_err(|_| CatalogError::PhotoNotFound(id))?;
        let conn = self.connect()?;
        let filename: Option<String> = conn
            .query_row(
                "SELECT filename FROM PhotoTable WHERE id = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        filename
            .map(PathBuf::from)
            .ok_or(CatalogError::PhotoNotFound(id))
    }
}
