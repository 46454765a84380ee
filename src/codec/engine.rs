//! Codec engine: the encode and decode entry points.
//!
//! Encoding always produces the current format (V4 in a zlib envelope).
//! Decoding accepts every format ever shipped, via [`ProtocolDetector`].

use super::detector::{Decoded, ProtocolDetector};
use super::envelope;
use super::frame::V4Frame;
use super::EncodeResult;
use crate::config::CodecConfig;
use crate::error::Result;
use crate::model::BouquetRecord;

/// Bouquet encoder/decoder
#[derive(Debug, Clone, Default)]
pub struct BouquetCodec {
    config: CodecConfig,
    detector: ProtocolDetector,
}

impl BouquetCodec {
    /// Create codec with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create codec with custom settings
    pub fn with_config(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector: ProtocolDetector::new(),
        })
    }

    /// Active settings
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a record to its URL-safe wire string.
    pub fn encode(&self, record: &BouquetRecord) -> Result<EncodeResult> {
        let frame = V4Frame::from_record(record, &self.config)?;
        let bytes = frame.encode()?;
        let compressed = envelope::wrap(&bytes, self.config.compression_level)?;
        let data = envelope::to_text(&compressed);

        tracing::debug!(
            "Encoded V4 frame: {} bytes -> {} compressed -> {} text",
            bytes.len(),
            compressed.len(),
            data.len()
        );

        Ok(EncodeResult {
            data,
            frame_bytes: bytes.len(),
            compressed_bytes: compressed.len(),
            paths_in: record.paths.len(),
            paths_encoded: frame.paths.len(),
            points_in: record.point_count(),
            points_encoded: frame.point_count(),
        })
    }

    /// Encode for sharing; any failure yields an empty string.
    ///
    /// An empty result must never be passed to [`decode`](Self::decode).
    pub fn share(&self, record: &BouquetRecord) -> String {
        match self.encode(record) {
            Ok(result) => result.data,
            Err(e) => {
                tracing::error!("Failed to encode bouquet: {}", e);
                String::new()
            },
        }
    }

    /// Decode a wire string of any known version
    pub fn decode(&self, text: &str) -> Option<BouquetRecord> {
        match self.detector.detect(text) {
            Ok(decoded) => Some(decoded.record),
            Err(e) => {
                tracing::debug!("Failed to decode bouquet: {}", e);
                None
            },
        }
    }

    /// Decode and report which version matched
    pub fn detect(&self, text: &str) -> Result<Decoded> {
        self.detector.detect(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::WireVersion;
    use crate::config::OversizePolicy;
    use crate::error::BouquetError;
    use crate::model::{DrawingPath, Point};

    fn sample() -> BouquetRecord {
        BouquetRecord::new("https://open.spotify.com/track/abc123", "Happy Birthday!").with_paths(
            vec![DrawingPath::new(
                "#A855F7",
                4,
                vec![Point::new(10.0, 10.0), Point::new(400.0, 20.0), Point::new(790.0, 790.0)],
            )],
        )
    }

    #[test]
    fn test_encode_decode() {
        let codec = BouquetCodec::new();
        let result = codec.encode(&sample()).unwrap();

        assert!(result
            .data
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
        assert_eq!(result.paths_in, 1);
        assert_eq!(result.paths_encoded, 1);
        assert_eq!(result.points_in, 3);
        assert_eq!(result.points_encoded, 3);
        assert_eq!(result.wire_bytes(), result.data.len());

        let decoded = codec.detect(&result.data).unwrap();
        assert_eq!(decoded.version, WireVersion::V4);
        assert_eq!(decoded.record.song, "https://open.spotify.com/track/abc123");
        assert_eq!(decoded.record.message, "Happy Birthday!");
        assert_eq!(decoded.record.paths[0].color, "#A855F7");
        assert_eq!(decoded.record.paths[0].width, 4);
    }

    #[test]
    fn test_share_oversized_is_empty() {
        let codec = BouquetCodec::new();
        let record = BouquetRecord::new("x".repeat(300), "hi");
        assert!(matches!(
            codec.encode(&record),
            Err(BouquetError::OversizedField { field: "song", .. })
        ));
        assert_eq!(codec.share(&record), "");
    }

    #[test]
    fn test_truncate_policy() {
        let codec = BouquetCodec::with_config(CodecConfig {
            oversize: OversizePolicy::Truncate,
            ..Default::default()
        })
        .unwrap();
        let record = BouquetRecord::new("x".repeat(300), "hi");
        let decoded = codec.decode(&codec.share(&record)).unwrap();
        assert_eq!(decoded.song, "x".repeat(255));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CodecConfig {
            simplify_epsilon: f64::NAN,
            ..Default::default()
        };
        assert!(BouquetCodec::with_config(config).is_err());
    }

    #[test]
    fn test_decode_garbage() {
        let codec = BouquetCodec::new();
        assert!(codec.decode("!!!").is_none());
        assert!(codec.decode("AAAAAAAA").is_none());
    }

    #[test]
    fn test_compression_level_does_not_change_content() {
        let fast = BouquetCodec::with_config(CodecConfig {
            compression_level: 0,
            ..Default::default()
        })
        .unwrap();
        let text = fast.share(&sample());
        assert_eq!(BouquetCodec::new().decode(&text), fast.decode(&text));
        assert!(fast.decode(&text).is_some());
    }
}
