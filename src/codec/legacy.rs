//! Decode-only support for the pre-vector wire formats.
//!
//! Versions 1-3 have no drawing paths; whatever follows the text fields is a
//! WebP image, surfaced as a `data:` URI. The oldest format of all is not
//! binary: the base64 payload is plain JSON.
//!
//! ```text
//! V1 (gzip): [0x01][song_len: 2][song: raw url][message_len: 2][message][image...]
//! V2 (gzip): [0x02] then the V3 body
//! V3 (zlib): [0x03][song_len: 1][song: short form][message_len: 2][message][image...]
//! text:      {"s": "...", "m": "...", "i": "data:..." | null}
//! ```

use serde::Deserialize;

use super::reader::FrameReader;
use super::shortener::expand;
use crate::error::{BouquetError, Result};
use crate::model::{BouquetRecord, InlineImage};

/// Decode a version 1 frame.
///
/// The song field predates shortening and is returned as stored.
pub fn decode_v1(frame: &[u8]) -> Result<BouquetRecord> {
    let mut reader = FrameReader::after_tag(frame)?;

    let song_len = reader.u16_be("song length")? as usize;
    let song = reader.text("song", song_len)?;

    let message_len = reader.u16_be("message length")? as usize;
    let message = reader.text("message", message_len)?;

    Ok(with_trailing_image(song, message, reader.rest()))
}

/// Decode a version 2 frame.
///
/// REVIEW: V2 is read with the V3 layout (one-byte song length, short-form
/// song). V2 predates the one-byte layout, so frames written with a two-byte
/// song length will misparse here; this mirrors the behavior deployed clients
/// have always had.
pub fn decode_v2(frame: &[u8]) -> Result<BouquetRecord> {
    decode_v3(frame)
}

/// Decode a version 3 frame
pub fn decode_v3(frame: &[u8]) -> Result<BouquetRecord> {
    let mut reader = FrameReader::after_tag(frame)?;

    let song_len = reader.u8("song length")? as usize;
    let song = expand(&reader.text("song", song_len)?);

    let message_len = reader.u16_be("message length")? as usize;
    let message = reader.text("message", message_len)?;

    Ok(with_trailing_image(song, message, reader.rest()))
}

fn with_trailing_image(song: String, message: String, image: &[u8]) -> BouquetRecord {
    BouquetRecord {
        song,
        message,
        paths: Vec::new(),
        inline_image: (!image.is_empty()).then(|| InlineImage::from_webp_bytes(image)),
    }
}

/// Shape of the plain-text format. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct LegacyText {
    s: String,
    m: String,
    #[serde(default)]
    i: Option<String>,
}

/// Decode the uncompressed JSON format.
///
/// The song is returned as stored; this format never used short forms.
pub fn decode_legacy_text(bytes: &[u8]) -> Result<BouquetRecord> {
    let text: LegacyText = serde_json::from_slice(bytes)
        .map_err(|e| BouquetError::MalformedLegacyText(e.to_string()))?;

    Ok(BouquetRecord {
        song: text.s,
        message: text.m,
        paths: Vec::new(),
        inline_image: text.i.map(InlineImage::from_uri),
    })
}
