//! Bouquet codec error types.
//!
//! # Error Classification
//!
//! Decode-side errors are mostly *probe* errors: the detector expects most
//! candidates to fail and turns each failure into "try the next one".
//!
//! - [`BouquetError::UnwrapFailure`] and [`BouquetError::UnrecognizedTag`] are
//!   routing signals and never reach callers of [`crate::BouquetCodec::decode`]
//! - [`BouquetError::TruncatedFrame`] means a tag matched but the frame body
//!   is shorter than one of its declared fields
//! - [`BouquetError::MalformedLegacyText`] is the last probe failing, which
//!   is what exhaustion looks like
//!
//! Encode-side errors ([`BouquetError::EncodeFailure`],
//! [`BouquetError::OversizedField`]) are converted to the empty-string
//! sentinel by [`crate::BouquetCodec::share`].

use thiserror::Error;

use crate::codec::Compression;

/// Bouquet codec errors.
#[derive(Error, Debug)]
pub enum BouquetError {
    /// A frame field declares more bytes than the buffer holds.
    #[error("Truncated frame: {field} needs {needed} bytes at offset {offset}, {available} available")]
    TruncatedFrame {
        /// Field being read.
        field: &'static str,
        /// Offset of the field in the frame.
        offset: usize,
        /// Bytes the field declares.
        needed: usize,
        /// Bytes left in the buffer.
        available: usize,
    },

    /// The envelope could not be unwrapped under the given compression.
    #[error("Unwrap failure ({compression}): {reason}")]
    UnwrapFailure {
        /// Compression that was attempted.
        compression: Compression,
        /// Underlying decompressor message.
        reason: String,
    },

    /// The envelope unwrapped but its tag byte is not a version known under
    /// that compression.
    #[error("Unrecognized tag {tag} under {compression}")]
    UnrecognizedTag {
        /// Leading byte of the unwrapped frame.
        tag: u8,
        /// Compression the frame was unwrapped with.
        compression: Compression,
    },

    /// The final plain-text fallback is not the expected `{s, m, i?}` shape.
    #[error("Malformed legacy text: {0}")]
    MalformedLegacyText(String),

    /// The text framing is not decodable base64.
    #[error("Invalid text framing: {0}")]
    InvalidText(String),

    /// Internal failure while encoding (compression, buffer writes).
    #[error("Encode failure: {0}")]
    EncodeFailure(String),

    /// A text field exceeds its structural wire limit.
    #[error("Oversized field: {field} is {len} bytes, limit is {max}")]
    OversizedField {
        /// Field name.
        field: &'static str,
        /// Actual byte length.
        len: usize,
        /// Wire limit in bytes.
        max: usize,
    },

    /// Authoring-side validation rejected the record.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Key-value store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for bouquet operations
pub type Result<T> = std::result::Result<T, BouquetError>;

impl BouquetError {
    /// Whether the detector should move on to the next probe.
    ///
    /// Every decode-side failure is recoverable during probing; only
    /// exhaustion of all probes is reported to the caller.
    pub fn is_probe_miss(&self) -> bool {
        matches!(
            self,
            BouquetError::TruncatedFrame { .. }
                | BouquetError::UnwrapFailure { .. }
                | BouquetError::UnrecognizedTag { .. }
        )
    }
}

impl From<toml::de::Error> for BouquetError {
    fn from(err: toml::de::Error) -> Self {
        BouquetError::Config(err.to_string())
    }
}

impl From<base64::DecodeError> for BouquetError {
    fn from(err: base64::DecodeError) -> Self {
        BouquetError::InvalidText(format!("Base64 decode error: {err}"))
    }
}
