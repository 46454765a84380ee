//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables (`BOUQUET_*`)
//!
//! Every field has a default, so an empty file or environment yields the
//! wire-compatible defaults (epsilon 2.5, zlib level 6, reject oversize).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::codec::DEFAULT_EPSILON;
use crate::error::{BouquetError, Result};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Codec configuration
    #[serde(default)]
    pub codec: CodecConfig,

    /// Storage boundary configuration
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| BouquetError::Config(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| BouquetError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from any variable lookup.
    ///
    /// Unparseable values are ignored and the default kept.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("BOUQUET_SIMPLIFY_EPSILON") {
            if let Ok(val) = val.parse() {
                config.codec.simplify_epsilon = val;
            }
        }
        if let Some(val) = lookup("BOUQUET_OVERSIZE_POLICY") {
            if let Ok(val) = val.parse() {
                config.codec.oversize = val;
            }
        }
        if let Some(val) = lookup("BOUQUET_COMPRESSION_LEVEL") {
            if let Ok(val) = val.parse() {
                config.codec.compression_level = val;
            }
        }
        if let Some(dir) = lookup("BOUQUET_STORE_DIR") {
            config.store.dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Merge with another config (other takes precedence where it differs
    /// from the defaults)
    #[allow(clippy::float_cmp)]
    pub fn merge(self, other: Self) -> Self {
        let defaults = CodecConfig::default();
        Self {
            codec: CodecConfig {
                simplify_epsilon: if other.codec.simplify_epsilon != defaults.simplify_epsilon {
                    other.codec.simplify_epsilon
                } else {
                    self.codec.simplify_epsilon
                },
                oversize: if other.codec.oversize != defaults.oversize {
                    other.codec.oversize
                } else {
                    self.codec.oversize
                },
                compression_level: if other.codec.compression_level != defaults.compression_level {
                    other.codec.compression_level
                } else {
                    self.codec.compression_level
                },
            },
            store: StoreConfig {
                dir: other.store.dir.or(self.store.dir),
            },
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        self.codec.validate()
    }
}

/// What to do with a text field longer than its wire length prefix allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Fail the encode with `OversizedField`
    #[default]
    Reject,
    /// Cut at the last character boundary that fits
    Truncate,
}

impl std::str::FromStr for OversizePolicy {
    type Err = BouquetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(OversizePolicy::Reject),
            "truncate" => Ok(OversizePolicy::Truncate),
            other => Err(BouquetError::Config(format!(
                "Unknown oversize policy: {other} (use reject or truncate)"
            ))),
        }
    }
}

/// Codec configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Path simplification tolerance, in canvas units
    pub simplify_epsilon: f64,

    /// Handling of song/message fields above their wire limits
    pub oversize: OversizePolicy,

    /// zlib level (0-9) used for the envelope
    pub compression_level: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            simplify_epsilon: DEFAULT_EPSILON,
            oversize: OversizePolicy::Reject,
            compression_level: 6,
        }
    }
}

impl CodecConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.simplify_epsilon.is_finite() || self.simplify_epsilon < 0.0 {
            return Err(BouquetError::Config(format!(
                "simplify_epsilon must be finite and >= 0, got {}",
                self.simplify_epsilon
            )));
        }
        if self.compression_level > 9 {
            return Err(BouquetError::Config(format!(
                "compression_level must be 0-9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }
}

/// Storage boundary configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory for the file store
    pub dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Configured directory, or the platform data directory
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("bouquet")))
    }
}
