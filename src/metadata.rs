//! Descriptive metadata: what gets stamped onto every rendition, and the
//! output filename derived from a photo's capture time.
//!
//! ## The tag set
//!
//! Every rendition carries the same photographer fields, built once per run
//! from `[website]` in the config, plus the photo's own title when it has one:
//!
//! | Field | Value |
//! |---|---|
//! | `EXIF:Artist`, `EXIF:OwnerName`, `XMP:Creator` | photographer name |
//! | `EXIF:Copyright`, `XMP:Credit` | `© <name>, all rights reserved.` |
//! | `XMP:CreatorWorkURL` | photographer website |
//! | `XMP:CreatorWorkEmail` | photographer email |
//! | `XMP:Title` | title read from the source photo |
//!
//! Empty values are never stored, so an unset email does not produce an
//! empty XMP element.
//!
//! ## Title resolution
//!
//! The title is the first non-empty value of XMP `dc:title` and IPTC
//! ObjectName, see [`resolve`].
//!
//! ## Output filenames
//!
//! A rendition is named after the capture timestamp reduced to lowercase
//! ASCII alphanumerics: `2004:02:28 17:26:48` → `20040228172648.jpg`. Two
//! photos taken in the same second share a filename and the later one wins.

use std::collections::BTreeMap;

use crate::config::WebsiteConfig;

/// Extension of every rendition.
pub const RENDITION_EXTENSION: &str = "jpg";

/// A metadata field that can be stamped onto a rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetadataField {
    ExifArtist,
    ExifOwnerName,
    ExifCopyright,
    XmpCreator,
    XmpCreatorWorkUrl,
    XmpCreatorWorkEmail,
    XmpCredit,
    XmpTitle,
}

impl MetadataField {
    pub const ALL: [MetadataField; 8] = [
        MetadataField::ExifArtist,
        MetadataField::ExifOwnerName,
        MetadataField::ExifCopyright,
        MetadataField::XmpCreator,
        MetadataField::XmpCreatorWorkUrl,
        MetadataField::XmpCreatorWorkEmail,
        MetadataField::XmpCredit,
        MetadataField::XmpTitle,
    ];

    /// Group-qualified name, as shown by exiftool.
    pub fn key(self) -> &'static str {
        match self {
            MetadataField::ExifArtist => "EXIF:Artist",
            MetadataField::ExifOwnerName => "EXIF:OwnerName",
            MetadataField::ExifCopyright => "EXIF:Copyright",
            MetadataField::XmpCreator => "XMP:Creator",
            MetadataField::XmpCreatorWorkUrl => "XMP:CreatorWorkURL",
            MetadataField::XmpCreatorWorkEmail => "XMP:CreatorWorkEmail",
            MetadataField::XmpCredit => "XMP:Credit",
            MetadataField::XmpTitle => "XMP:Title",
        }
    }
}

/// Field → value mapping stamped onto a rendition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTagSet {
    fields: BTreeMap<MetadataField, String>,
}

impl MetadataTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Blank values remove it instead.
    pub fn insert(&mut self, field: MetadataField, value: String) {
        if value.trim().is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value);
        }
    }

    pub fn get(&self, field: MetadataField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetadataField, &str)> {
        self.fields.iter().map(|(field, value)| (*field, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this set with `XMP:Title` overlaid when a title is present.
    pub fn with_title(&self, title: Option<&str>) -> Self {
        let mut tags = self.clone();
        if let Some(title) = title {
            tags.insert(MetadataField::XmpTitle, title.to_string());
        }
        tags
    }
}

/// Copyright line written to `EXIF:Copyright` and `XMP:Credit`.
pub fn copyright_notice(name: &str) -> String {
    format!("© {name}, all rights reserved.")
}

/// Photographer fields shared by every photo of a run.
pub fn base_tag_set(website: &WebsiteConfig) -> MetadataTagSet {
    let name = website.photographer_name.trim();
    let copyright = copyright_notice(name);

    let mut tags = MetadataTagSet::new();
    tags.insert(MetadataField::ExifArtist, name.to_string());
    tags.insert(MetadataField::ExifOwnerName, name.to_string());
    tags.insert(MetadataField::ExifCopyright, copyright.clone());
    tags.insert(MetadataField::XmpCreator, name.to_string());
    tags.insert(
        MetadataField::XmpCreatorWorkUrl,
        website.photographer_www.trim().to_string(),
    );
    tags.insert(
        MetadataField::XmpCreatorWorkEmail,
        website.photographer_email.trim().to_string(),
    );
    tags.insert(MetadataField::XmpCredit, copyright);
    tags
}

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value, trimmed.
///
/// ```text
/// title: resolve(&[xmp_title, iptc_object_name])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Reduce a capture timestamp to lowercase ASCII alphanumerics.
///
/// This is not a general slugifier: non-ASCII characters are dropped rather
/// than transliterated. EXIF timestamps are plain ASCII, so nothing is lost.
pub fn timestamp_slug(timestamp: &str) -> String {
    timestamp
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Rendition filename for a capture timestamp.
///
/// Without a timestamp the slug is empty and the name is just `.jpg`; the
/// caller warns about it.
pub fn output_filename(timestamp: Option<&str>) -> String {
    let slug = timestamp.map(timestamp_slug).unwrap_or_default();
    format!("{slug}.{RENDITION_EXTENSION}")
}
