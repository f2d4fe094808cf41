//! Shotwell thumb tokens.
//!
//! Shotwell refers to photos in tag lists by an opaque token: the prefix
//! `thumb` followed by the photo's numeric id as 16 hexadecimal digits.
//! Videos use a `video` prefix and are not handled here.
//!
//! ```text
//! thumb0000000000003ecf  →  16079
//! ```
//!
//! Validation and decoding are separate steps: [`is_valid_token`] answers
//! whether a string is a thumb token at all, [`decode_token`] turns a token
//! that already passed validation into its id.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Canonical numeric photo identifier (`PhotoTable.id`).
pub type PhotoId = u64;

/// Prefix marking a photo (as opposed to a video) token.
pub const THUMB_PREFIX: &str = "thumb";

/// Number of hex digits following the prefix.
const HEX_DIGITS: usize = 16;

static THUMB_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^thumb[0-9A-Fa-f]{16}$").expect("static regex must compile"));

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("not a thumb token: {0:?}")]
    Malformed(String),
}

/// True when `token` is `thumb` followed by exactly 16 hex digits.
pub fn is_valid_token(token: &str) -> bool {
    THUMB_TOKEN.is_match(token)
}

/// Strip the prefix of a validated token and parse the rest as base 16.
///
/// Callers validate first; an invalid token yields [`TokenError::Malformed`]
/// rather than a wrong id.
pub fn decode_token(token: &str) -> Result<PhotoId, TokenError> {
    let malformed = || TokenError::Malformed(token.to_string());
    if !is_valid_token(token) {
        return Err(malformed());
    }
    let hex = token.strip_prefix(THUMB_PREFIX).ok_or_else(malformed)?;
    PhotoId::from_str_radix(hex, 16).map_err(|_| malformed())
}

/// Inverse of [`decode_token`]: lowercase, zero-padded to 16 digits.
pub fn encode_token(id: PhotoId) -> String {
    format!("{THUMB_PREFIX}{id:0width$x}", width = HEX_DIGITS)
}

/// Result of decoding a catalog token list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTokens {
    /// Valid ids, sorted ascending, without duplicates.
    pub ids: Vec<PhotoId>,
    /// Non-empty entries that failed validation.
    pub dropped: usize,
}

/// Split a comma-separated token list and decode every valid entry.
///
/// Shotwell terminates the list with a trailing comma; the resulting empty
/// entry is ignored and not counted as dropped.
pub fn decode_token_list(list: &str) -> DecodedTokens {
    let mut decoded = DecodedTokens::default();

    for token in list.split(',').filter(|t| !t.is_empty()) {
        match decode_token(token) {
            Ok(id) => decoded.ids.push(id),
            Err(_) => decoded.dropped += 1,
        }
    }

    decoded.ids.sort_unstable();
    decoded.ids.dedup();
    decoded
}
