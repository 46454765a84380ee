//! Compression envelope and text framing.
//!
//! Binary frames travel as `base64url(zlib(frame))` with no padding. Reading
//! is lenient: the standard alphabet and `=` padding are both accepted, since
//! links get rewritten by mail clients and chat apps on the way through.

use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};

use super::Compression;
use crate::error::{BouquetError, Result};

/// URL-safe decoder that ignores padding and stray trailing bits
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Compress a frame with zlib at `level` (0-9).
pub fn wrap(frame: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::new(level.min(9)));
    encoder
        .write_all(frame)
        .map_err(|e| BouquetError::EncodeFailure(format!("zlib write: {e}")))?;
    encoder
        .finish()
        .map_err(|e| BouquetError::EncodeFailure(format!("zlib finish: {e}")))
}

/// Decompress an envelope under the given compression.
pub fn unwrap(data: &[u8], compression: Compression) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let read = match compression {
        Compression::Zlib => ZlibDecoder::new(data).read_to_end(&mut out),
        Compression::Gzip => GzDecoder::new(data).read_to_end(&mut out),
    };
    read.map_err(|e| BouquetError::UnwrapFailure {
        compression,
        reason: e.to_string(),
    })?;
    Ok(out)
}

/// Frame bytes as URL-safe base64 without padding
pub fn to_text(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode the text framing.
///
/// `+` and `/` are mapped onto the URL-safe alphabet and `=` is dropped
/// before decoding.
pub fn from_text(text: &str) -> Result<Vec<u8>> {
    let normalized: String = text
        .trim()
        .chars()
        .filter(|&c| c != '=')
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    Ok(LENIENT.decode(normalized)?)
}
