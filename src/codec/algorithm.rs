//! Envelope compressions, wire versions, and encode results.

use serde::{Deserialize, Serialize};

/// Outer compression wrapped around a binary frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// zlib stream (RFC 1950), used for V3 and V4
    Zlib,
    /// gzip member (RFC 1952), used for V1 and V2
    Gzip,
}

impl Compression {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Compression::Zlib => "ZLIB",
            Compression::Gzip => "GZIP",
        }
    }

    /// Envelopes in probe order
    pub fn probe_order() -> &'static [Compression] {
        &[Compression::Zlib, Compression::Gzip]
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A recognized wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireVersion {
    /// gzip, u16 song length, raw song URL, trailing image
    V1,
    /// gzip, decoded with the V3 layout
    V2,
    /// zlib, u8 shortened song, trailing image
    V3,
    /// zlib, u8 shortened song, vector paths (current)
    V4,
    /// Uncompressed JSON `{s, m, i?}`
    LegacyText,
}

impl WireVersion {
    /// Tag byte for binary versions
    pub fn tag(&self) -> Option<u8> {
        match self {
            WireVersion::V1 => Some(1),
            WireVersion::V2 => Some(2),
            WireVersion::V3 => Some(3),
            WireVersion::V4 => Some(4),
            WireVersion::LegacyText => None,
        }
    }

    /// Envelope the version is carried in
    pub fn compression(&self) -> Option<Compression> {
        match self {
            WireVersion::V1 | WireVersion::V2 => Some(Compression::Gzip),
            WireVersion::V3 | WireVersion::V4 => Some(Compression::Zlib),
            WireVersion::LegacyText => None,
        }
    }

    /// Resolve a tag byte read from a frame unwrapped with `compression`.
    ///
    /// Tags are only meaningful under the envelope that produced them: a zlib
    /// frame starting with 1 is not V1.
    pub fn from_tag(compression: Compression, tag: u8) -> Option<Self> {
        match (compression, tag) {
            (Compression::Zlib, 4) => Some(WireVersion::V4),
            (Compression::Zlib, 3) => Some(WireVersion::V3),
            (Compression::Gzip, 2) => Some(WireVersion::V2),
            (Compression::Gzip, 1) => Some(WireVersion::V1),
            _ => None,
        }
    }

    /// Whether frames of this version carry vector paths
    pub fn has_paths(&self) -> bool {
        matches!(self, WireVersion::V4)
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            WireVersion::V1 => "V1",
            WireVersion::V2 => "V2",
            WireVersion::V3 => "V3",
            WireVersion::V4 => "V4",
            WireVersion::LegacyText => "LEGACY_TEXT",
        }
    }
}

impl std::fmt::Display for WireVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Result of an encode
#[derive(Debug, Clone)]
pub struct EncodeResult {
    /// URL-safe wire string
    pub data: String,
    /// Binary frame size before compression
    pub frame_bytes: usize,
    /// Size after compression, before text framing
    pub compressed_bytes: usize,
    /// Paths in the input record
    pub paths_in: usize,
    /// Paths written to the frame
    pub paths_encoded: usize,
    /// Points in the input record
    pub points_in: usize,
    /// Points written to the frame
    pub points_encoded: usize,
}

impl EncodeResult {
    /// Length of the wire string
    pub fn wire_bytes(&self) -> usize {
        self.data.len()
    }

    /// Frame size over compressed size
    pub fn byte_ratio(&self) -> f64 {
        if self.compressed_bytes == 0 {
            0.0
        } else {
            self.frame_bytes as f64 / self.compressed_bytes as f64
        }
    }

    /// Fraction of input points dropped by filtering, simplification and caps
    pub fn point_reduction(&self) -> f64 {
        if self.points_in == 0 {
            0.0
        } else {
            1.0 - self.points_encoded as f64 / self.points_in as f64
        }
    }
}
