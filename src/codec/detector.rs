//! Wire version detection.
//!
//! There is no explicit version marker outside the compressed payload, so a
//! link is identified by trying each envelope in turn and reading the tag
//! byte of whatever comes out:
//!
//! 1. zlib: tag 4 (V4), tag 3 (V3)
//! 2. gzip: tag 2 (V2), tag 1 (V1)
//! 3. the raw base64 payload as JSON (legacy text)
//!
//! A probe that fails at any stage hands over to the next one; only running
//! out of probes is an error.

use super::envelope;
use super::frame::decode_v4;
use super::legacy::{decode_legacy_text, decode_v1, decode_v2, decode_v3};
use super::{Compression, WireVersion};
use crate::error::{BouquetError, Result};
use crate::model::BouquetRecord;

type FrameDecoder = fn(&[u8]) -> Result<BouquetRecord>;

/// Envelopes in probe order, with the versions each may carry
const PROBES: [(Compression, &[WireVersion]); 2] = [
    (Compression::Zlib, &[WireVersion::V4, WireVersion::V3]),
    (Compression::Gzip, &[WireVersion::V2, WireVersion::V1]),
];

fn frame_decoder(version: WireVersion) -> Option<FrameDecoder> {
    match version {
        WireVersion::V1 => Some(decode_v1 as FrameDecoder),
        WireVersion::V2 => Some(decode_v2 as FrameDecoder),
        WireVersion::V3 => Some(decode_v3 as FrameDecoder),
        WireVersion::V4 => Some(decode_v4 as FrameDecoder),
        WireVersion::LegacyText => None,
    }
}

/// A decoded link together with the format it was read as
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Format that matched
    pub version: WireVersion,
    /// Decoded content
    pub record: BouquetRecord,
}

/// Ordered probe over every supported wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolDetector;

impl ProtocolDetector {
    /// Create a detector
    pub fn new() -> Self {
        Self
    }

    /// Decode a wire string, trying each format in order.
    ///
    /// Fails with `InvalidText` when the base64 layer itself is broken, and
    /// with `MalformedLegacyText` when every probe misses.
    pub fn detect(&self, text: &str) -> Result<Decoded> {
        let raw = envelope::from_text(text)?;
        self.detect_bytes(&raw)
    }

    /// Decode already base64-decoded bytes
    pub fn detect_bytes(&self, raw: &[u8]) -> Result<Decoded> {
        for (compression, versions) in PROBES {
            match self.probe(raw, compression, versions) {
                Ok(decoded) => return Ok(decoded),
                Err(e) if e.is_probe_miss() => {
                    tracing::debug!("{} probe missed: {}", compression, e);
                },
                Err(e) => return Err(e),
            }
        }

        let record = decode_legacy_text(raw)?;
        tracing::debug!("Decoded as legacy text");
        Ok(Decoded {
            version: WireVersion::LegacyText,
            record,
        })
    }

    fn probe(
        &self,
        raw: &[u8],
        compression: Compression,
        versions: &[WireVersion],
    ) -> Result<Decoded> {
        let frame = envelope::unwrap(raw, compression)?;
        let tag = *frame.first().ok_or(BouquetError::TruncatedFrame {
            field: "tag",
            offset: 0,
            needed: 1,
            available: 0,
        })?;

        let version = WireVersion::from_tag(compression, tag)
            .filter(|v| versions.contains(v))
            .ok_or(BouquetError::UnrecognizedTag { tag, compression })?;
        let decode =
            frame_decoder(version).ok_or(BouquetError::UnrecognizedTag { tag, compression })?;

        let record = decode(&frame)?;
        tracing::debug!(
            "Decoded {} frame ({} bytes, {} paths)",
            version,
            frame.len(),
            record.paths.len()
        );
        Ok(Decoded { version, record })
    }

    /// Identify the format of a wire string without keeping the content
    pub fn detect_version(&self, text: &str) -> Option<WireVersion> {
        self.detect(text).ok().map(|d| d.version)
    }
}
