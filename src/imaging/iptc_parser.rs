//! Minimal IPTC-IIM reader for JPEG files.
//!
//! Used as the title fallback when a photo has no XMP `dc:title`: older
//! tools (and Shotwell itself when "write metadata to files" is on) store the
//! title as IPTC ObjectName (2:05).
//!
//! The IIM block sits in the APP13 segment inside a Photoshop image resource
//! (`8BIM`, id 0x0404).

use super::jpeg::{self, APP13};

const PHOTOSHOP_HEADER: &[u8] = b"Photoshop 3.0\0";
const BIM_MARKER: &[u8] = b"8BIM";
const IPTC_RESOURCE_ID: u16 = 0x0404;

/// Application record, ObjectName dataset.
const RECORD_APPLICATION: u8 = 2;
const DATASET_OBJECT_NAME: u8 = 5;

/// IPTC ObjectName from a JPEG byte stream, if any.
pub fn read_object_name(data: &[u8]) -> Option<String> {
    let parts = jpeg::split(data).ok()?;
    let segment = jpeg::find_segment(&parts, APP13, PHOTOSHOP_HEADER)?;
    let iim = find_iptc_resource(segment)?;
    parse_object_name(iim)
}

/// Walk the IIM datasets and return the first non-empty ObjectName.
///
/// Each dataset: `0x1C`, record, dataset, big-endian u16 length, data.
fn parse_object_name(data: &[u8]) -> Option<String> {
    let mut pos = 0;

    while pos + 5 <= data.len() {
        if data[pos] != 0x1C {
            pos += 1;
            continue;
        }

        let record = data[pos + 1];
        let dataset = data[pos + 2];
        let length = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as usize;
        pos += 5;

        if pos + length > data.len() {
            break;
        }

        if record == RECORD_APPLICATION && dataset == DATASET_OBJECT_NAME {
            let value = String::from_utf8_lossy(&data[pos..pos + length])
                .trim()
                .to_string();
            if !value.is_empty() {
                return Some(value);
            }
        }

        pos += length;
    }

    None
}

/// Locate resource 0x0404 among the Photoshop `8BIM` resource blocks.
fn find_iptc_resource(data: &[u8]) -> Option<&[u8]> {
    let mut pos = 0;
    while pos + 12 <= data.len() {
        // "8BIM" (4) + resource_id (2) + pascal name (even-padded) + len (4) + data
        if &data[pos..pos + 4] != BIM_MARKER {
            pos += 1;
            continue;
        }
        pos += 4;

        let resource_id = u16::from_be_bytes([data[pos], data[pos + 1]]);
        pos += 2;

        let name_len = *data.get(pos)? as usize;
        pos += 1 + name_len + ((1 + name_len) % 2);

        let len_bytes = data.get(pos..pos + 4)?;
        let res_len =
            u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
        pos += 4;

        let resource = data.get(pos..pos + res_len)?;
        if resource_id == IPTC_RESOURCE_ID {
            return Some(resource);
        }
        pos += res_len + (res_len % 2);
    }
    None
}
