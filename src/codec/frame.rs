//! Protocol version 4 frame: song, message and vector paths.
//!
//! # Layout
//!
//! All multi-byte integers are big-endian.
//!
//! ```text
//! [tag: 1 = 0x04]
//! [song_len: 1][song: utf8, shortened]
//! [message_len: 2][message: utf8]
//! [path_count: 1]
//!   per path:
//!   [style: 1]        color index << 4 | width
//!   [point_count: 2]
//!   [x: 1][y: 1] * point_count
//! ```
//!
//! Bytes after the last path are ignored on decode.

use super::palette::{color_at, color_index};
use super::quantize::{clamp_width, dequantize, pack_style, quantize, unpack_style};
use super::reader::FrameReader;
use super::shortener::{expand, shorten};
use super::simplify::simplify;
use super::Compression;
use crate::config::{CodecConfig, OversizePolicy};
use crate::error::{BouquetError, Result};
use crate::model::{BouquetRecord, DrawingPath};

/// Version 4 tag byte
pub const TAG_V4: u8 = 4;

/// Song reference limit, after shortening
pub const MAX_SONG_BYTES: usize = u8::MAX as usize;

/// Message limit
pub const MAX_MESSAGE_BYTES: usize = u16::MAX as usize;

/// Paths per frame
pub const MAX_PATHS: usize = u8::MAX as usize;

/// Points per path
pub const MAX_POINTS: usize = u16::MAX as usize;

/// A path in wire form: style byte plus quantized points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPath {
    /// `color_index << 4 | width`
    pub style: u8,
    /// Quantized `(x, y)` pairs in stroke order
    pub points: Vec<(u8, u8)>,
}

impl PackedPath {
    /// Simplify, cap and quantize a drawing path
    pub fn from_path(path: &DrawingPath, epsilon: f64) -> Self {
        let style = pack_style(color_index(&path.color), clamp_width(path.width));
        let points = simplify(&path.points, epsilon)
            .iter()
            .take(MAX_POINTS)
            .map(quantize)
            .collect();
        Self { style, points }
    }

    /// Palette index from the high nibble
    pub fn color_index(&self) -> u8 {
        unpack_style(self.style).0
    }

    /// Width from the low nibble
    pub fn width(&self) -> u8 {
        unpack_style(self.style).1
    }

    /// Rebuild a drawing path in canvas units
    pub fn to_path(&self) -> DrawingPath {
        let (color, width) = unpack_style(self.style);
        DrawingPath {
            color: color_at(color).to_string(),
            width: u32::from(width),
            points: self.points.iter().map(|&(x, y)| dequantize(x, y)).collect(),
        }
    }
}

/// A decoded or ready-to-encode V4 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V4Frame {
    /// Song reference in short form
    pub song: String,
    /// Message text
    pub message: String,
    /// Packed paths
    pub paths: Vec<PackedPath>,
}

impl V4Frame {
    /// Prepare a record for the wire.
    ///
    /// Drops single-point paths, simplifies the rest, applies the path and
    /// point caps, shortens the song and applies the oversize policy to the
    /// text fields.
    pub fn from_record(record: &BouquetRecord, config: &CodecConfig) -> Result<Self> {
        let song = fit_field(&shorten(&record.song), "song", MAX_SONG_BYTES, config.oversize)?;
        let message = fit_field(&record.message, "message", MAX_MESSAGE_BYTES, config.oversize)?;

        let drawable: Vec<&DrawingPath> = record.paths.iter().filter(|p| !p.is_dot()).collect();
        if drawable.len() > MAX_PATHS {
            tracing::debug!("Path count {} capped at {}", drawable.len(), MAX_PATHS);
        }

        let paths = drawable
            .into_iter()
            .take(MAX_PATHS)
            .map(|p| PackedPath::from_path(p, config.simplify_epsilon))
            .collect();

        Ok(Self {
            song,
            message,
            paths,
        })
    }

    /// Exact size of the encoded frame
    pub fn encoded_size(&self) -> usize {
        let drawing: usize = self
            .paths
            .iter()
            .take(MAX_PATHS)
            .map(|p| 3 + p.points.len().min(MAX_POINTS) * 2)
            .sum();
        1 + 1 + self.song.len() + 2 + self.message.len() + 1 + drawing
    }

    /// Total quantized points
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.points.len()).sum()
    }

    /// Encode frame to wire bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        check_len("song", self.song.len(), MAX_SONG_BYTES)?;
        check_len("message", self.message.len(), MAX_MESSAGE_BYTES)?;

        let mut buf = Vec::with_capacity(self.encoded_size());
        buf.push(TAG_V4);

        buf.push(self.song.len() as u8);
        buf.extend_from_slice(self.song.as_bytes());

        buf.extend_from_slice(&(self.message.len() as u16).to_be_bytes());
        buf.extend_from_slice(self.message.as_bytes());

        let paths = &self.paths[..self.paths.len().min(MAX_PATHS)];
        buf.push(paths.len() as u8);
        for path in paths {
            let points = &path.points[..path.points.len().min(MAX_POINTS)];
            buf.push(path.style);
            buf.extend_from_slice(&(points.len() as u16).to_be_bytes());
            for &(x, y) in points {
                buf.push(x);
                buf.push(y);
            }
        }

        Ok(buf)
    }

    /// Decode frame from wire bytes
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = FrameReader::new(data);
        let tag = reader.u8("tag")?;
        if tag != TAG_V4 {
            return Err(BouquetError::UnrecognizedTag {
                tag,
                compression: Compression::Zlib,
            });
        }

        let song_len = reader.u8("song length")? as usize;
        let song = reader.text("song", song_len)?;

        let message_len = reader.u16_be("message length")? as usize;
        let message = reader.text("message", message_len)?;

        let path_count = reader.u8("path count")? as usize;
        let mut paths = Vec::with_capacity(path_count);
        for _ in 0..path_count {
            let style = reader.u8("path style")?;
            let point_count = reader.u16_be("point count")? as usize;
            let raw = reader.bytes("points", point_count * 2)?;
            let points = raw.chunks_exact(2).map(|xy| (xy[0], xy[1])).collect();
            paths.push(PackedPath { style, points });
        }

        if reader.remaining() > 0 {
            tracing::debug!(
                "Ignoring {} trailing bytes after V4 frame at offset {}",
                reader.remaining(),
                reader.position()
            );
        }

        Ok(Self {
            song,
            message,
            paths,
        })
    }

    /// Rebuild the record, expanding the song reference
    pub fn into_record(self) -> BouquetRecord {
        BouquetRecord {
            song: expand(&self.song),
            message: self.message,
            paths: self.paths.iter().map(PackedPath::to_path).collect(),
            inline_image: None,
        }
    }
}

/// Decode a V4 frame straight to a record
pub fn decode_v4(frame: &[u8]) -> Result<BouquetRecord> {
    V4Frame::decode(frame).map(V4Frame::into_record)
}

fn check_len(field: &'static str, len: usize, max: usize) -> Result<()> {
    if len > max {
        return Err(BouquetError::OversizedField { field, len, max });
    }
    Ok(())
}

/// Apply the oversize policy to a text field
pub(crate) fn fit_field(
    text: &str,
    field: &'static str,
    max: usize,
    policy: OversizePolicy,
) -> Result<String> {
    if text.len() <= max {
        return Ok(text.to_string());
    }
    match policy {
        OversizePolicy::Reject => Err(BouquetError::OversizedField {
            field,
            len: text.len(),
            max,
        }),
        OversizePolicy::Truncate => {
            let mut end = max;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            tracing::warn!(
                "Truncating {} from {} to {} bytes to fit the wire format",
                field,
                text.len(),
                end
            );
            Ok(text[..end].to_string())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::palette::PALETTE;
    use crate::codec::quantize::MAX_AXIS_ERROR;
    use crate::model::Point;
    use hex_literal::hex;

    fn line(color: &str, width: u32, coords: &[(f64, f64)]) -> DrawingPath {
        DrawingPath::new(
            color,
            width,
            coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        )
    }

    #[test]
    fn test_text_only_layout() {
        let record = BouquetRecord::new("https://open.spotify.com/track/abc123", "Hi");
        let frame = V4Frame::from_record(&record, &CodecConfig::default()).unwrap();
        let bytes = frame.encode().unwrap();

        assert_eq!(
            bytes,
            hex!("04 08 733a616263313233 0002 4869 00").to_vec()
        );
        assert_eq!(bytes.len(), frame.encoded_size());
    }

    #[test]
    fn test_diagonal_path_layout() {
        let record = BouquetRecord::new("x", "").with_paths(vec![line(
            PALETTE[3],
            7,
            &[(0.0, 0.0), (800.0, 800.0)],
        )]);
        let frame = V4Frame::from_record(&record, &CodecConfig::default()).unwrap();
        let bytes = frame.encode().unwrap();

        assert_eq!(
            bytes,
            hex!("04 01 78 0000 01 37 0002 0000 ffff").to_vec()
        );

        let decoded = decode_v4(&bytes).unwrap();
        assert_eq!(decoded.paths.len(), 1);
        assert_eq!(decoded.paths[0].color, PALETTE[3]);
        assert_eq!(decoded.paths[0].width, 7);
        assert_eq!(
            decoded.paths[0].points,
            vec![Point::new(0.0, 0.0), Point::new(800.0, 800.0)]
        );
    }

    #[test]
    fn test_roundtrip_within_error_bound() {
        let original = line(
            PALETTE[1],
            4,
            &[(10.3, 700.9), (200.0, 50.5), (401.7, 399.2), (799.9, 0.1)],
        );
        let record = BouquetRecord::new("https://youtu.be/abc", "hello").with_paths(vec![original.clone()]);
        let frame = V4Frame::from_record(&record, &CodecConfig::default()).unwrap();
        let decoded = decode_v4(&frame.encode().unwrap()).unwrap();

        assert_eq!(decoded.song, "https://www.youtube.com/watch?v=abc");
        assert_eq!(decoded.message, "hello");
        let path = &decoded.paths[0];
        assert_eq!(path.points.len(), original.points.len());
        for (a, b) in original.points.iter().zip(&path.points) {
            assert!((a.x - b.x).abs() <= MAX_AXIS_ERROR);
            assert!((a.y - b.y).abs() <= MAX_AXIS_ERROR);
        }
    }

    #[test]
    fn test_dots_are_dropped() {
        let record = BouquetRecord::new("x", "m").with_paths(vec![
            line(PALETTE[0], 3, &[(5.0, 5.0)]),
            line(PALETTE[2], 3, &[(0.0, 0.0), (10.0, 10.0)]),
            line(PALETTE[0], 3, &[]),
        ]);
        let frame = V4Frame::from_record(&record, &CodecConfig::default()).unwrap();
        assert_eq!(frame.paths.len(), 1);
        assert_eq!(frame.paths[0].color_index(), 2);
    }

    #[test]
    fn test_style_clamping_and_fallback() {
        let record = BouquetRecord::new("x", "m").with_paths(vec![line(
            "#123456",
            99,
            &[(0.0, 0.0), (1.0, 1.0)],
        )]);
        let frame = V4Frame::from_record(&record, &CodecConfig::default()).unwrap();
        assert_eq!(frame.paths[0].color_index(), 0);
        assert_eq!(frame.paths[0].width(), 15);
    }

    #[test]
    fn test_path_count_saturates() {
        let paths = (0..300)
            .map(|i| line(PALETTE[0], 1, &[(i as f64, 0.0), (i as f64, 100.0)]))
            .collect();
        let record = BouquetRecord::new("x", "m").with_paths(paths);
        let frame = V4Frame::from_record(&record, &CodecConfig::default()).unwrap();
        assert_eq!(frame.paths.len(), MAX_PATHS);

        let bytes = frame.encode().unwrap();
        let decoded = V4Frame::decode(&bytes).unwrap();
        assert_eq!(decoded.paths.len(), MAX_PATHS);
    }

    #[test]
    fn test_point_count_saturates() {
        let frame = V4Frame {
            song: String::new(),
            message: String::new(),
            paths: vec![PackedPath {
                style: 0x01,
                points: vec![(1, 2); MAX_POINTS + 10],
            }],
        };
        let bytes = frame.encode().unwrap();
        assert_eq!(bytes.len(), frame.encoded_size());

        let decoded = V4Frame::decode(&bytes).unwrap();
        assert_eq!(decoded.paths[0].points.len(), MAX_POINTS);
    }

    #[test]
    fn test_unknown_color_index_decodes_to_first_entry() {
        let bytes = hex!("04 00 0000 01 9a 0002 0000 0101");
        let record = decode_v4(&bytes).unwrap();
        assert_eq!(record.paths[0].color, PALETTE[0]);
        assert_eq!(record.paths[0].width, 10);
    }

    #[test]
    fn test_truncated_frames() {
        let full = hex!("04 01 78 0002 6869 01 37 0002 0000 ffff");
        for cut in 1..full.len() {
            let err = V4Frame::decode(&full[..cut]).unwrap_err();
            assert!(
                matches!(err, BouquetError::TruncatedFrame { .. }),
                "cut at {cut}: {err:?}"
            );
        }
        assert!(V4Frame::decode(&full).is_ok());
    }

    #[test]
    fn test_wrong_tag() {
        assert!(matches!(
            V4Frame::decode(&hex!("03 00 0000")),
            Err(BouquetError::UnrecognizedTag { tag: 3, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let bytes = hex!("04 00 0001 41 00 dead");
        let record = decode_v4(&bytes).unwrap();
        assert_eq!(record.message, "A");
        assert!(record.paths.is_empty());
    }

    #[test]
    fn test_oversized_song_rejected_by_default() {
        let song = format!("https://example.com/{}", "a".repeat(300));
        let record = BouquetRecord::new(song, "m");
        assert!(matches!(
            V4Frame::from_record(&record, &CodecConfig::default()),
            Err(BouquetError::OversizedField { field: "song", .. })
        ));
    }

    #[test]
    fn test_oversized_message_truncated_on_char_boundary() {
        let message = "é".repeat(40_000);
        let record = BouquetRecord::new("x", message);
        let config = CodecConfig {
            oversize: OversizePolicy::Truncate,
            ..Default::default()
        };
        let frame = V4Frame::from_record(&record, &config).unwrap();
        assert_eq!(frame.message.len(), MAX_MESSAGE_BYTES - 1);
        assert!(frame.message.chars().all(|c| c == 'é'));
        assert!(frame.encode().is_ok());
    }

    #[test]
    fn test_encode_checks_hand_built_frames() {
        let frame = V4Frame {
            song: "s".repeat(256),
            message: String::new(),
            paths: Vec::new(),
        };
        assert!(matches!(
            frame.encode(),
            Err(BouquetError::OversizedField { field: "song", .. })
        ));
    }
}
