//! Opaque pagination cursors.
//!
//! A cursor is URL-safe base64 of `{"v":1,"offset":N}`: clients treat it as an
//! opaque token while the server maps it back to the upstream offset. Bare
//! decimal strings are still accepted as raw offsets from older clients.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

pub const CURSOR_VERSION: u32 = 1;

const MAX_CURSOR_CHARS: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("cursor must not be empty")]
    Empty,

    #[error("cursor too long ({0} chars)")]
    TooLong(usize),

    #[error("cursor is not a continuation token issued by this server")]
    Malformed,

    #[error("unsupported cursor version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Deserialize)]
struct OffsetCursor {
    v: u32,
    offset: u64,
}

pub fn encode_offset(offset: u64) -> String {
    let payload = json!({ "v": CURSOR_VERSION, "offset": offset }).to_string();
    URL_SAFE_NO_PAD.encode(payload)
}

pub fn decode_offset(cursor: &str) -> Result<u64, CursorError> {
    let cursor = cursor.trim();
    if cursor.is_empty() {
        return Err(CursorError::Empty);
    }
    if cursor.len() > MAX_CURSOR_CHARS {
        return Err(CursorError::TooLong(cursor.len()));
    }
    if cursor.bytes().all(|b| b.is_ascii_digit()) {
        return cursor.parse().map_err(|_| CursorError::Malformed);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(cursor.as_bytes())
        .map_err(|_| CursorError::Malformed)?;
    let decoded: OffsetCursor =
        serde_json::from_slice(&bytes).map_err(|_| CursorError::Malformed)?;
    if decoded.v != CURSOR_VERSION {
        return Err(CursorError::UnsupportedVersion(decoded.v));
    }
    Ok(decoded.offset)
}
