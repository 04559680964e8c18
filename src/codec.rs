//! Inbound payload decoding.
//!
//! The bot hands data to the web app as base64url-encoded UTF-8 JSON in the
//! `payload` query parameter. Outbound messages are plain JSON strings and
//! never pass through this codec.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::error::{WebAppError, WebAppResult};

/// Decodes a raw `payload` parameter.
///
/// `Ok(None)` means no payload was supplied at all, which is not an error.
pub fn decode_payload(raw: Option<&str>) -> WebAppResult<Option<Value>> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };
    let text = b64url_to_utf8(raw)?;
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| WebAppError::Parse(e.to_string()))
}

fn b64url_to_utf8(raw: &str) -> WebAppResult<String> {
    let mut s: String = raw
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let pad = s.len() % 4;
    if pad != 0 {
        s.extend(std::iter::repeat('=').take(4 - pad));
    }

    let bytes = STANDARD
        .decode(s.as_bytes())
        .map_err(|e| WebAppError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| WebAppError::Parse(e.to_string()))
}

#[cfg(test)]
pub(crate) fn encode_base64url(text: &str) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    URL_SAFE_NO_PAD.encode(text.as_bytes())
}
