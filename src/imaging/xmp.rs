//! XMP packet read and write.
//!
//! The packet is embedded in a JPEG APP1 segment after the namespace header
//! `http://ns.adobe.com/xap/1.0/\0`. Only the handful of properties a
//! [`MetadataTagSet`] carries are written or read:
//!
//! | Field | XMP property |
//! |---|---|
//! | `XMP:Title` | `dc:title` (`rdf:Alt`, `x-default`) |
//! | `XMP:Creator` | `dc:creator` (`rdf:Seq`) |
//! | `XMP:Credit` | `photoshop:Credit` |
//! | `XMP:CreatorWorkURL` | `Iptc4xmpCore:CreatorContactInfo/CiUrlWork` |
//! | `XMP:CreatorWorkEmail` | `Iptc4xmpCore:CreatorContactInfo/CiEmailWork` |
//!
//! Reading is pattern based rather than a full RDF parse: it understands the
//! element forms written here and by Lightroom, darktable and Shotwell.

use regex::Regex;
use std::fmt::Write as _;
use std::sync::LazyLock;

use crate::metadata::{MetadataField, MetadataTagSet};

/// Namespace header that prefixes an XMP APP1 payload.
pub const XMP_HEADER: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

/// Escape text for use as XML element content.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Serialize the XMP fields of `tags` into a packet. `None` if there are none.
pub fn build_packet(tags: &MetadataTagSet) -> Option<String> {
    let creator = tags.get(MetadataField::XmpCreator);
    let title = tags.get(MetadataField::XmpTitle);
    let credit = tags.get(MetadataField::XmpCredit);
    let url = tags.get(MetadataField::XmpCreatorWorkUrl);
    let email = tags.get(MetadataField::XmpCreatorWorkEmail);

    if [creator, title, credit, url, email].iter().all(Option::is_none) {
        return None;
    }

    let mut body = String::new();
    if let Some(creator) = creator {
        let _ = writeln!(
            body,
            "   <dc:creator><rdf:Seq><rdf:li>{}</rdf:li></rdf:Seq></dc:creator>",
            escape(creator)
        );
    }
    if let Some(title) = title {
        let _ = writeln!(
            body,
            "   <dc:title><rdf:Alt><rdf:li xml:lang=\"x-default\">{}</rdf:li></rdf:Alt></dc:title>",
            escape(title)
        );
    }
    if let Some(credit) = credit {
        let _ = writeln!(
            body,
            "   <photoshop:Credit>{}</photoshop:Credit>",
            escape(credit)
        );
    }
    if url.is_some() || email.is_some() {
        body.push_str("   <Iptc4xmpCore:CreatorContactInfo rdf:parseType=\"Resource\">\n");
        if let Some(url) = url {
            let _ = writeln!(
                body,
                "    <Iptc4xmpCore:CiUrlWork>{}</Iptc4xmpCore:CiUrlWork>",
                escape(url)
            );
        }
        if let Some(email) = email {
            let _ = writeln!(
                body,
                "    <Iptc4xmpCore:CiEmailWork>{}</Iptc4xmpCore:CiEmailWork>",
                escape(email)
            );
        }
        body.push_str("   </Iptc4xmpCore:CreatorContactInfo>\n");
    }

    Some(format!(
        "<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n\
<x:xmpmeta xmlns:x=\"adobe:ns:meta/\">\n\
 <rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\n\
  <rdf:Description rdf:about=\"\"\n\
    xmlns:dc=\"http://purl.org/dc/elements/1.1/\"\n\
    xmlns:photoshop=\"http://ns.adobe.com/photoshop/1.0/\"\n\
    xmlns:Iptc4xmpCore=\"http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/\">\n\
{body}  </rdf:Description>\n\
 </rdf:RDF>\n\
</x:xmpmeta>\n\
<?xpacket end=\"w\"?>"
    ))
}

/// APP1 payload (header + packet) for the XMP fields of `tags`.
pub fn build_payload(tags: &MetadataTagSet) -> Option<Vec<u8>> {
    build_packet(tags).map(|packet| {
        let mut payload = XMP_HEADER.to_vec();
        payload.extend_from_slice(packet.as_bytes());
        payload
    })
}

static FIELD_PATTERNS: LazyLock<Vec<(MetadataField, Regex)>> = LazyLock::new(|| {
    [
        (
            MetadataField::XmpTitle,
            r"(?s)<dc:title>\s*<rdf:Alt>\s*<rdf:li[^>]*>(.*?)</rdf:li>",
        ),
        (
            MetadataField::XmpCreator,
            r"(?s)<dc:creator>\s*<rdf:Seq>\s*<rdf:li[^>]*>(.*?)</rdf:li>",
        ),
        (
            MetadataField::XmpCredit,
            r"(?s)<photoshop:Credit>(.*?)</photoshop:Credit>",
        ),
        (
            MetadataField::XmpCreatorWorkUrl,
            r"(?s)<Iptc4xmpCore:CiUrlWork>(.*?)</Iptc4xmpCore:CiUrlWork>",
        ),
        (
            MetadataField::XmpCreatorWorkEmail,
            r"(?s)<Iptc4xmpCore:CiEmailWork>(.*?)</Iptc4xmpCore:CiEmailWork>",
        ),
    ]
    .into_iter()
    .map(|(field, pattern)| (field, Regex::new(pattern).expect("static regex must compile")))
    .collect()
});

/// Read every known XMP field from a packet.
pub fn read_fields(packet: &str) -> MetadataTagSet {
    let mut tags = MetadataTagSet::new();
    for (field, pattern) in FIELD_PATTERNS.iter() {
        let value = pattern
            .captures(packet)
            .and_then(|caps| caps.get(1))
            .map(|m| unescape(m.as_str().trim()))
            .filter(|v| !v.is_empty());
        if let Some(value) = value {
            tags.insert(*field, value);
        }
    }
    tags
}

/// `dc:title` of a packet, if present.
pub fn read_title(packet: &str) -> Option<String> {
    read_fields(packet).get(MetadataField::XmpTitle).map(String::from)
}
