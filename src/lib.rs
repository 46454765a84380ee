//! # Bouquet Codec - Shareable Song, Message and Drawing Links
//!
//! Packs a song reference, a short message and an optional free-hand drawing
//! into a single URL-safe string small enough to travel as a link, and reads
//! back every link format that has ever been shared.
//!
//! ## Features
//!
//! - **Compact binary frames**: shortened song URLs, byte-quantized points
//! - **Path simplification**: Ramer-Douglas-Peucker before quantizing
//! - **Backward compatibility**: V1-V3 binary links and the plain JSON form
//! - **Storage boundary**: pluggable key-value store for received bouquets
//!
//! ## Pipeline
//!
//! ```text
//!  encode:  record -> V4 frame -> zlib -> base64url (no padding)
//!
//!  decode:  text -> base64 -+-> zlib -> tag 4 | tag 3
//!                           +-> gzip -> tag 2 | tag 1
//!                           +-> JSON {s, m, i}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bouquet::{BouquetCodec, BouquetRecord, DrawingPath, Point};
//!
//! let codec = BouquetCodec::new();
//! let record = BouquetRecord::new("https://open.spotify.com/track/abc123", "Happy Birthday!")
//!     .with_paths(vec![DrawingPath::new(
//!         "#E31B44",
//!         4,
//!         vec![Point::new(0.0, 0.0), Point::new(800.0, 800.0)],
//!     )]);
//!
//! let result = codec.encode(&record).unwrap();
//! println!("{} chars, {:.1}x", result.wire_bytes(), result.byte_ratio());
//!
//! let back = codec.decode(&result.data).unwrap();
//! assert_eq!(back.message, "Happy Birthday!");
//! ```
//!
//! ## Modules
//!
//! - [`codec`]: Frame layouts, envelope, version detection
//! - [`model`]: Records, paths, points
//! - [`validate`]: Authoring-side input checks
//! - [`store`]: Persistence boundary for received links
//! - [`config`]: Configuration management
//! - [`error`]: Error types and result aliases

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod validate;

// Re-exports for convenience
pub use codec::{BouquetCodec, Decoded, EncodeResult, ProtocolDetector, WireVersion};
pub use config::{CodecConfig, Config, OversizePolicy};
pub use error::{BouquetError, Result};
pub use model::{BouquetRecord, DrawingPath, InlineImage, Point};
pub use store::{BouquetStore, FileStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire version written by the encoder
pub const PROTOCOL_VERSION: u8 = codec::frame::TAG_V4;

/// Encode a record with default settings; empty on failure
pub fn encode(record: &BouquetRecord) -> String {
    BouquetCodec::new().share(record)
}

/// Decode a link of any known version
pub fn decode(text: &str) -> Option<BouquetRecord> {
    BouquetCodec::new().decode(text)
}

/// Identify the wire version of a link
pub fn detect_version(text: &str) -> Option<WireVersion> {
    codec::detect_version(text)
}
