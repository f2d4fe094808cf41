//! EXIF read and write via `kamadak-exif`.
//!
//! Reading covers the capture timestamp of a source photo. Writing produces
//! the APP1 payload (`Exif\0\0` + TIFF structure) for the EXIF part of a
//! [`MetadataTagSet`].
//!
//! | Field | EXIF tag | IFD |
//! |---|---|---|
//! | `EXIF:Artist` | Artist (0x013B) | IFD0 |
//! | `EXIF:Copyright` | Copyright (0x8298) | IFD0 |
//! | `EXIF:OwnerName` | CameraOwnerName (0xA430) | Exif IFD |

use exif::experimental::Writer;
use exif::{Exif, Field, In, Reader, Tag, Value};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use super::backend::BackendError;
use crate::metadata::{MetadataField, MetadataTagSet};

/// Prefix of an EXIF APP1 payload.
pub const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Parse EXIF from any container `kamadak-exif` understands (JPEG, TIFF,
/// PNG, WebP, HEIF). `None` when the file has no readable EXIF.
pub fn read_exif(path: &Path) -> Option<Exif> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    Reader::new().read_from_container(&mut reader).ok()
}

/// Parse EXIF from an in-memory image.
pub fn read_exif_bytes(data: &[u8]) -> Option<Exif> {
    Reader::new()
        .read_from_container(&mut Cursor::new(data))
        .ok()
}

/// First ASCII string of a field, trimmed; `None` when absent or empty.
fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(values) => values
            .first()
            .map(|v| String::from_utf8_lossy(v).trim_end_matches('\0').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Capture timestamp as stored (`"2004:02:28 17:26:48"`).
///
/// DateTimeOriginal wins; DateTimeDigitized (CreateDate) is the fallback.
pub fn capture_timestamp(exif: &Exif) -> Option<String> {
    ascii_field(exif, Tag::DateTimeOriginal).or_else(|| ascii_field(exif, Tag::DateTimeDigitized))
}

fn exif_tag(field: MetadataField) -> Option<Tag> {
    match field {
        MetadataField::ExifArtist => Some(Tag::Artist),
        MetadataField::ExifCopyright => Some(Tag::Copyright),
        MetadataField::ExifOwnerName => Some(Tag::CameraOwnerName),
        _ => None,
    }
}

/// Read the EXIF fields of a tag set back out of a parsed EXIF block.
pub fn read_tag_fields(exif: &Exif) -> MetadataTagSet {
    let mut tags = MetadataTagSet::new();
    for field in MetadataField::ALL {
        if let Some(value) = exif_tag(field).and_then(|tag| ascii_field(exif, tag)) {
            tags.insert(field, value);
        }
    }
    tags
}

/// Encode raw EXIF fields as an APP1 payload (big-endian TIFF).
pub fn encode_fields(fields: &[Field]) -> Result<Vec<u8>, BackendError> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer
        .write(&mut tiff, false)
        .map_err(|e| BackendError::ProcessingFailed(format!("EXIF encode failed: {e}")))?;

    let mut payload = EXIF_HEADER.to_vec();
    payload.extend_from_slice(&tiff.into_inner());
    Ok(payload)
}

/// APP1 payload for the EXIF fields of `tags`, or `None` if it has none.
pub fn build_payload(tags: &MetadataTagSet) -> Result<Option<Vec<u8>>, BackendError> {
    let fields: Vec<Field> = tags
        .iter()
        .filter_map(|(field, value)| {
            exif_tag(field).map(|tag| Field {
                tag,
                ifd_num: In::PRIMARY,
                value: Value::Ascii(vec![value.as_bytes().to_vec()]),
            })
        })
        .collect();

    if fields.is_empty() {
        return Ok(None);
    }
    encode_fields(&fields).map(Some)
}
