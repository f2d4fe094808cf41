//! JPEG marker segment handling.
//!
//! A JPEG file is a sequence of marker segments followed by entropy-coded
//! scan data:
//!
//! ```text
//! FF D8                      SOI
//! FF E0 <len> JFIF...        APP0
//! FF E1 <len> Exif\0\0...    APP1 (EXIF)
//! FF E1 <len> http://ns...   APP1 (XMP)
//! FF ED <len> Photoshop...   APP13 (IPTC)
//! FF DB <len> ...            DQT, SOF, DHT, ...
//! FF DA <len> ... scan data  SOS onwards, kept verbatim
//! ```
//!
//! Metadata lives in APP1–APP15 and COM segments. [`rewrite_metadata`] drops
//! all of them and inserts fresh APP1 payloads; everything that describes the
//! pixels (APP0, tables, frame header, scan data) is kept byte for byte.

use super::backend::BackendError;

const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const APP0: u8 = 0xE0;
pub const APP1: u8 = 0xE1;
pub const APP13: u8 = 0xED;
const COM: u8 = 0xFE;

/// Largest payload a length-prefixed segment can carry.
pub const MAX_SEGMENT_PAYLOAD: usize = u16::MAX as usize - 2;

/// One length-prefixed segment before the scan data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub marker: u8,
    pub payload: &'a [u8],
}

/// A JPEG split into header segments and the untouched remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegParts<'a> {
    pub segments: Vec<Segment<'a>>,
    /// Everything from the SOS (or EOI) marker to the end of the file.
    pub tail: &'a [u8],
}

fn malformed(reason: &str) -> BackendError {
    BackendError::ProcessingFailed(format!("Malformed JPEG: {reason}"))
}

/// Markers that stand alone without a length field.
fn is_standalone(marker: u8) -> bool {
    marker == 0x01 || (0xD0..=0xD7).contains(&marker)
}

/// APPn (n ≥ 1) and COM segments carry metadata, not pixels.
fn is_metadata_marker(marker: u8) -> bool {
    (APP1..=0xEF).contains(&marker) || marker == COM
}

/// Split a JPEG into its header segments and scan data.
pub fn split(data: &[u8]) -> Result<JpegParts<'_>, BackendError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != SOI {
        return Err(malformed("missing SOI marker"));
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        if pos + 1 >= data.len() {
            return Err(malformed("truncated before scan data"));
        }
        if data[pos] != 0xFF {
            return Err(malformed("expected marker"));
        }
        // Fill bytes: any number of 0xFF may precede a marker
        if data[pos + 1] == 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        if marker == SOS || marker == EOI {
            return Ok(JpegParts {
                segments,
                tail: &data[pos..],
            });
        }
        if is_standalone(marker) {
            segments.push(Segment {
                marker,
                payload: &[],
            });
            pos += 2;
            continue;
        }

        if pos + 4 > data.len() {
            return Err(malformed("truncated segment length"));
        }
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if len < 2 || pos + 2 + len > data.len() {
            return Err(malformed("segment length out of bounds"));
        }
        segments.push(Segment {
            marker,
            payload: &data[pos + 4..pos + 2 + len],
        });
        pos += 2 + len;
    }
}

/// Reassemble parts into a JPEG byte stream.
pub fn join(parts: &JpegParts<'_>) -> Vec<u8> {
    let header_len: usize = parts.segments.iter().map(|s| s.payload.len() + 4).sum();
    let mut out = Vec::with_capacity(2 + header_len + parts.tail.len());
    out.extend_from_slice(&[0xFF, SOI]);
    for segment in &parts.segments {
        out.extend_from_slice(&[0xFF, segment.marker]);
        if !is_standalone(segment.marker) {
            out.extend_from_slice(&((segment.payload.len() + 2) as u16).to_be_bytes());
            out.extend_from_slice(segment.payload);
        }
    }
    out.extend_from_slice(parts.tail);
    out
}

/// First segment with `marker` whose payload starts with `prefix`, prefix stripped.
pub fn find_segment<'a>(parts: &JpegParts<'a>, marker: u8, prefix: &[u8]) -> Option<&'a [u8]> {
    parts
        .segments
        .iter()
        .find(|s| s.marker == marker && s.payload.starts_with(prefix))
        .map(|s| &s.payload[prefix.len()..])
}

/// Drop every metadata segment and insert `app1_payloads` as new APP1
/// segments right after the leading APP0 (JFIF) segments.
pub fn rewrite_metadata(data: &[u8], app1_payloads: &[Vec<u8>]) -> Result<Vec<u8>, BackendError> {
    if let Some(oversized) = app1_payloads.iter().find(|p| p.len() > MAX_SEGMENT_PAYLOAD) {
        return Err(BackendError::ProcessingFailed(format!(
            "Metadata block of {} bytes does not fit in a JPEG segment",
            oversized.len()
        )));
    }

    let parts = split(data)?;
    let kept: Vec<Segment<'_>> = parts
        .segments
        .into_iter()
        .filter(|s| !is_metadata_marker(s.marker))
        .collect();

    let insert_at = kept.iter().take_while(|s| s.marker == APP0).count();
    let mut segments = Vec::with_capacity(kept.len() + app1_payloads.len());
    segments.extend_from_slice(&kept[..insert_at]);
    segments.extend(app1_payloads.iter().map(|payload| Segment {
        marker: APP1,
        payload,
    }));
    segments.extend_from_slice(&kept[insert_at..]);

    Ok(join(&JpegParts {
        segments,
        tail: parts.tail,
    }))
}
