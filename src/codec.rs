//! Share-link codec.
//!
//! Binary layout (version 1):
//!
//! ```text
//! [1 byte version = 1]
//! [1 byte palette length N, 1..=255]
//! [N * 3 bytes RGB]
//! [1024 bytes pixel indices]
//! ```
//!
//! The bytes travel as unpadded base64url text in a link fragment
//! (`read.html#p=<token>`). Decoding never fails outward: anything malformed
//! comes back as a blank drawing.

use crate::drawing::{Drawing, Rgb, CELLS, MAX_PALETTE};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use thiserror::Error;
use url::Url;

/// Payload format version
pub const VERSION: u8 = 1;

const HEADER_LEN: usize = 2;

const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Why a payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload is not valid base64url: {0}")]
    InvalidEncoding(String),
    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u8),
    #[error("payload truncated: need {expected} bytes, have {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Pack a drawing into the binary payload.
pub fn encode_bytes(drawing: &Drawing) -> Vec<u8> {
    let d = drawing.normalized();
    let pal_len = d.palette.len().clamp(1, MAX_PALETTE);
    let mut bytes = Vec::with_capacity(HEADER_LEN + pal_len * 3 + CELLS);
    bytes.push(VERSION);
    bytes.push(pal_len as u8);
    for color in d.palette.iter().take(pal_len) {
        bytes.extend_from_slice(&color.to_bytes());
    }
    let max = (pal_len - 1) as u16;
    bytes.extend(d.pixels.iter().map(|&p| p.min(max) as u8));
    bytes
}

/// Encode a drawing as a share token.
pub fn encode(drawing: &Drawing) -> String {
    TOKEN_ENGINE.encode(encode_bytes(drawing))
}

/// Parse the binary payload, reporting why it was rejected.
pub fn decode_bytes_strict(bytes: &[u8]) -> Result<Drawing, PayloadError> {
    if bytes.len() < HEADER_LEN {
        return Err(PayloadError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    if bytes[0] != VERSION {
        return Err(PayloadError::UnsupportedVersion(bytes[0]));
    }
    let pal_len = (bytes[1] as usize).max(1);
    let expected = HEADER_LEN + pal_len * 3 + CELLS;
    if bytes.len() < expected {
        return Err(PayloadError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }

    let (rgb, rest) = bytes[HEADER_LEN..].split_at(pal_len * 3);
    let palette: Vec<Rgb> = rgb
        .chunks_exact(3)
        .map(|c| Rgb::new(c[0], c[1], c[2]))
        .collect();
    let max = (pal_len - 1) as u8;
    let pixels = rest[..CELLS].iter().map(|&p| u16::from(p.min(max))).collect();
    Ok(Drawing { palette, pixels }.normalized())
}

/// Fail-soft variant of [`decode_bytes_strict`].
pub fn decode_bytes(bytes: &[u8]) -> Drawing {
    decode_bytes_strict(bytes).unwrap_or_else(|e| {
        log::debug!("share payload rejected: {}", e);
        Drawing::blank()
    })
}

/// Decode a share token, reporting why it was rejected.
pub fn decode_strict(token: &str) -> Result<Drawing, PayloadError> {
    // tolerate tokens that went through a standard-alphabet round trip
    let token: String = token
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    let bytes = TOKEN_ENGINE
        .decode(token.as_bytes())
        .map_err(|e| PayloadError::InvalidEncoding(e.to_string()))?;
    decode_bytes_strict(&bytes)
}

/// Decode a share token; malformed tokens yield a blank drawing.
pub fn decode(token: &str) -> Drawing {
    decode_strict(token).unwrap_or_else(|e| {
        log::debug!("share token rejected: {}", e);
        Drawing::blank()
    })
}

/// Link fragment (without `#`) carrying the drawing.
pub fn share_fragment(drawing: &Drawing) -> String {
    format!("p={}", encode(drawing))
}

/// Extract the token from a fragment such as `#p=<token>&x=y`.
///
/// Accepts a bare fragment, a fragment with `#`, or a whole URL.
pub fn payload_from_fragment(input: &str) -> Option<&str> {
    let rest = match input.find("#p=") {
        Some(i) => &input[i + 3..],
        None => input.strip_prefix("p=")?,
    };
    let token = rest.split('&').next().unwrap_or_default();
    (!token.is_empty()).then_some(token)
}

/// Viewer link for `drawing`, relative to the editor page at `base`.
///
/// The last path segment of `base` is replaced with `read.html`.
pub fn share_url(base: &str, drawing: &Drawing) -> Result<String, url::ParseError> {
    let mut url = viewer_url(base)?;
    url.set_query(None);
    url.set_fragment(Some(&share_fragment(drawing)));
    Ok(url.into())
}

/// Viewer link that renders the shared latest drawing from the API.
pub fn latest_url(base: &str) -> Result<String, url::ParseError> {
    let mut url = viewer_url(base)?;
    url.set_query(Some("src=/api/latest"));
    url.set_fragment(None);
    Ok(url.into())
}

fn viewer_url(base: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop()
        .push("read.html");
    Ok(url)
}
