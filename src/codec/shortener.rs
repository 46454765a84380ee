//! Host-specific song reference shortening.
//!
//! Known streaming URLs are reduced to a two-character prefix plus the
//! track/video identifier before they go on the wire:
//!
//! | Input shape                               | Short form |
//! |-------------------------------------------|------------|
//! | `...open.spotify.com/track/<id>[?...]`    | `s:<id>`   |
//! | `...youtube.com/watch?v=<id>[&...]`       | `y:<id>`   |
//! | `...youtu.be/<id>[?...]`                  | `y:<id>`   |
//!
//! Expansion always produces the canonical host URL, so query parameters
//! beyond the identifier do not survive a round trip.

use phf::phf_map;

/// Short prefix -> canonical URL stem
pub static PREFIX_EXPAND: phf::Map<&'static str, &'static str> = phf_map! {
    "s:" => "https://open.spotify.com/track/",
    "y:" => "https://www.youtube.com/watch?v=",
};

/// A recognized URL shape.
struct ShortForm {
    /// Substring that identifies the shape
    marker: &'static str,
    /// Delimiter the identifier follows
    split_on: &'static str,
    /// First character after the identifier
    terminator: char,
    /// Short prefix emitted on match
    prefix: &'static str,
}

/// Checked in order; the first shape whose marker is present decides.
static SHORT_FORMS: &[ShortForm] = &[
    ShortForm {
        marker: "open.spotify.com/track/",
        split_on: "/track/",
        terminator: '?',
        prefix: "s:",
    },
    ShortForm {
        marker: "youtube.com/watch?v=",
        split_on: "v=",
        terminator: '&',
        prefix: "y:",
    },
    ShortForm {
        marker: "youtu.be/",
        split_on: "youtu.be/",
        terminator: '?',
        prefix: "y:",
    },
];

/// Shorten a recognized song URL; anything else is returned unchanged.
pub fn shorten(url: &str) -> String {
    let Some(form) = SHORT_FORMS.iter().find(|f| url.contains(f.marker)) else {
        return url.to_string();
    };

    // Text between the first and second occurrence of the delimiter, cut at
    // the terminator.
    let id = url
        .split(form.split_on)
        .nth(1)
        .and_then(|rest| rest.split(form.terminator).next())
        .unwrap_or("");

    if id.is_empty() {
        url.to_string()
    } else {
        format!("{}{}", form.prefix, id)
    }
}

/// Expand a short form to its canonical URL; anything else is returned
/// unchanged.
pub fn expand(short: &str) -> String {
    let Some(prefix) = short.get(..2) else {
        return short.to_string();
    };
    match PREFIX_EXPAND.get(prefix) {
        Some(stem) => format!("{}{}", stem, &short[2..]),
        None => short.to_string(),
    }
}

/// Whether a string is in short form
pub fn is_short_form(s: &str) -> bool {
    s.get(..2).is_some_and(|p| PREFIX_EXPAND.contains_key(p))
}
