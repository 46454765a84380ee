//! Bouquet data model.
//!
//! A [`BouquetRecord`] is the version-independent logical payload. It is
//! built once by the authoring flow, encoded once, and read-only after
//! decoding. Field names serialize to the short keys used by the oldest
//! plain-text format (`s`, `m`, `i`) so the same JSON shape works across
//! every layer that handles records.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{BouquetError, Result};

/// Side of the square logical drawing surface, in canvas units.
pub const CANVAS_SIZE: f64 = 800.0;

/// Media type of images embedded by the legacy V1-V3 layouts.
pub const LEGACY_IMAGE_MEDIA_TYPE: &str = "image/webp";

/// The shareable payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BouquetRecord {
    /// Absolute song reference URL
    #[serde(rename = "s")]
    pub song: String,
    /// Free-text message
    #[serde(rename = "m")]
    pub message: String,
    /// Drawing strokes in stroke order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<DrawingPath>,
    /// Raster image carried by legacy layouts only
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    pub inline_image: Option<InlineImage>,
}

impl BouquetRecord {
    /// Create a record without drawing
    pub fn new(song: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            song: song.into(),
            message: message.into(),
            paths: Vec::new(),
            inline_image: None,
        }
    }

    /// Add drawing paths
    pub fn with_paths(mut self, paths: Vec<DrawingPath>) -> Self {
        self.paths = paths;
        self
    }

    /// Total number of points across all paths
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.points.len()).sum()
    }

    /// Whether the record carries a drawing
    pub fn has_drawing(&self) -> bool {
        !self.paths.is_empty()
    }
}

/// One stroke of the drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingPath {
    /// Stroke color; one of the palette entries
    pub color: String,
    /// Brush width; values above 15 are clamped on encode
    pub width: u32,
    /// Points in stroke order
    pub points: Vec<Point>,
}

impl DrawingPath {
    /// Create a new path
    pub fn new(color: impl Into<String>, width: u32, points: Vec<Point>) -> Self {
        Self {
            color: color.into(),
            width,
            points,
        }
    }

    /// A single point carries no reconstructable shape
    pub fn is_dot(&self) -> bool {
        self.points.len() < 2
    }
}

/// A point on the 800x800 drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Embeddable image reference, stored as a `data:` URI.
///
/// Legacy layouts append raw image bytes after the text fields; they are
/// surfaced as `data:image/webp;base64,...` so the caller can embed them
/// directly. The plain-text format already carries a URI string, which is
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineImage(String);

impl InlineImage {
    /// Wrap raw WebP bytes as a data URI
    pub fn from_webp_bytes(bytes: &[u8]) -> Self {
        Self::from_bytes(LEGACY_IMAGE_MEDIA_TYPE, bytes)
    }

    /// Wrap raw bytes of the given media type as a data URI
    pub fn from_bytes(media_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{media_type};base64,{}", BASE64.encode(bytes)))
    }

    /// Keep an existing URI verbatim
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The URI text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Media type of a `data:` URI, if it is one
    pub fn media_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        let header = rest.split_once(',')?.0;
        Some(header.split(';').next().unwrap_or(header))
    }

    /// Decode the body of a base64 `data:` URI back to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let (header, body) = self
            .0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .ok_or_else(|| BouquetError::InvalidText("Not a data URI".to_string()))?;

        if !header.ends_with(";base64") {
            return Err(BouquetError::InvalidText(
                "Data URI is not base64 encoded".to_string(),
            ));
        }
        Ok(BASE64.decode(body)?)
    }
}

impl std::fmt::Display for InlineImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
