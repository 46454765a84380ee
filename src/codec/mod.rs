//! Bouquet wire codec.
//!
//! A record goes out as a compact binary frame, compressed and framed as
//! URL-safe base64. Four binary versions and one plain-text format have
//! shipped; only the newest is written, all of them are read.
//!
//! # Wire Versions
//!
//! | Version      | Envelope | Song field           | Body                  |
//! |--------------|----------|----------------------|-----------------------|
//! | [`V4`]       | zlib     | u8 len, short form   | vector paths          |
//! | [`V3`]       | zlib     | u8 len, short form   | trailing WebP image   |
//! | [`V2`]       | gzip     | read as V3           | trailing WebP image   |
//! | [`V1`]       | gzip     | u16 len, full URL    | trailing WebP image   |
//! | [`LegacyText`] | none   | JSON `s`             | JSON `i` (data URI)   |
//!
//! # V4 Frame
//!
//! ```text
//! [0x04][song_len: 1][song][msg_len: 2 BE][msg][path_count: 1]
//!   per path: [style: (color << 4) | width][point_count: 2 BE][(x, y) bytes...]
//! ```
//!
//! Coordinates are quantized from the 800x800 canvas to a byte per axis, and
//! every path is simplified with Ramer-Douglas-Peucker before quantizing.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bouquet::{BouquetCodec, BouquetRecord};
//!
//! let codec = BouquetCodec::new();
//! let record = BouquetRecord::new("https://open.spotify.com/track/abc123", "Hi!");
//! let link = codec.share(&record);
//! let back = codec.decode(&link).unwrap();
//! ```
//!
//! [`V4`]: WireVersion::V4
//! [`V3`]: WireVersion::V3
//! [`V2`]: WireVersion::V2
//! [`V1`]: WireVersion::V1
//! [`LegacyText`]: WireVersion::LegacyText

mod algorithm;
mod detector;
mod engine;
pub mod envelope;
pub mod frame;
pub mod legacy;
pub mod palette;
pub mod quantize;
mod reader;
pub mod shortener;
pub mod simplify;

pub use algorithm::{Compression, EncodeResult, WireVersion};
pub use detector::{Decoded, ProtocolDetector};
pub use engine::BouquetCodec;
pub use frame::{PackedPath, V4Frame};
pub use palette::PALETTE;
pub use simplify::DEFAULT_EPSILON;

/// Identify the wire version of an encoded string
pub fn detect_version(text: &str) -> Option<WireVersion> {
    ProtocolDetector::new().detect_version(text)
}
