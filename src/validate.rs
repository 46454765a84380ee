//! Authoring-side input checks.
//!
//! These run in the composition flow before a record is encoded. The codec
//! does not call them: a link that was shared without passing them still
//! decodes.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{BouquetError, Result};
use crate::model::BouquetRecord;

/// Longest message the composer accepts, in characters
pub const MAX_MESSAGE_CHARS: usize = 100;

/// An accepted song host
#[derive(Debug, Clone)]
pub struct SongSource {
    /// Service name
    pub name: &'static str,
    /// Regex the whole link must match
    pub pattern: &'static str,
}

/// Song hosts the composer accepts
pub static SONG_SOURCES: &[SongSource] = &[
    SongSource {
        name: "spotify",
        pattern: r"^(https?://)?open\.spotify\.com/.+$",
    },
    SongSource {
        name: "youtube",
        pattern: r"^(https?://)?(www\.|m\.)?(youtube\.com|youtu\.be)/.+$",
    },
];

lazy_static! {
    /// Compiled song source patterns
    static ref SONG_REGEX: Vec<(Regex, &'static SongSource)> = {
        SONG_SOURCES
            .iter()
            .filter_map(|s| Regex::new(s.pattern).ok().map(|r| (r, s)))
            .collect()
    };
}

/// Name of the service a link belongs to, if accepted
pub fn song_source(url: &str) -> Option<&'static str> {
    SONG_REGEX
        .iter()
        .find(|(regex, _)| regex.is_match(url))
        .map(|(_, source)| source.name)
}

/// Whether the link points at an accepted song host
pub fn is_valid_song_link(url: &str) -> bool {
    song_source(url).is_some()
}

/// Whether the message is non-blank and within [`MAX_MESSAGE_CHARS`]
pub fn is_valid_message(message: &str) -> bool {
    let trimmed = message.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_MESSAGE_CHARS
}

/// Check a record before it is shared, reporting the first failing rule.
pub fn validate_record(record: &BouquetRecord) -> Result<()> {
    if !is_valid_song_link(&record.song) {
        return Err(BouquetError::Validation(format!(
            "Song link must be a Spotify or YouTube URL: {}",
            record.song
        )));
    }
    if record.message.trim().is_empty() {
        return Err(BouquetError::Validation("Message is empty".to_string()));
    }
    if !is_valid_message(&record.message) {
        return Err(BouquetError::Validation(format!(
            "Message exceeds {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(SONG_REGEX.len(), SONG_SOURCES.len());
    }

    #[test]
    fn test_spotify_links() {
        assert!(is_valid_song_link("https://open.spotify.com/track/abc123"));
        assert!(is_valid_song_link("open.spotify.com/album/xyz"));
        assert_eq!(song_source("http://open.spotify.com/x"), Some("spotify"));
        assert!(!is_valid_song_link("https://open.spotify.com/"));
        assert!(!is_valid_song_link("https://spotify.com/track/abc"));
    }

    #[test]
    fn test_youtube_links() {
        assert!(is_valid_song_link("https://www.youtube.com/watch?v=abc"));
        assert!(is_valid_song_link("https://m.youtube.com/watch?v=abc"));
        assert!(is_valid_song_link("youtu.be/abc"));
        assert_eq!(song_source("https://youtube.com/watch?v=a"), Some("youtube"));
        assert!(!is_valid_song_link("https://music.youtube.com/watch?v=abc"));
        assert!(!is_valid_song_link("ftp://youtube.com/abc"));
    }

    #[test]
    fn test_message_rules() {
        assert!(is_valid_message("Happy Birthday!"));
        assert!(is_valid_message(&"a".repeat(100)));
        assert!(is_valid_message(&format!("  {}  ", "a".repeat(100))));
        assert!(!is_valid_message(&"a".repeat(101)));
        assert!(!is_valid_message("   "));
        assert!(!is_valid_message(""));
        // counted in characters, not bytes
        assert!(is_valid_message(&"é".repeat(100)));
    }

    #[test]
    fn test_validate_record() {
        let good = BouquetRecord::new("https://open.spotify.com/track/abc123", "Hi");
        assert!(validate_record(&good).is_ok());

        let bad_song = BouquetRecord::new("https://example.com/song", "Hi");
        assert!(matches!(
            validate_record(&bad_song),
            Err(BouquetError::Validation(_))
        ));

        let blank = BouquetRecord::new("https://youtu.be/abc", " ");
        match validate_record(&blank) {
            Err(BouquetError::Validation(msg)) => assert!(msg.contains("empty")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
