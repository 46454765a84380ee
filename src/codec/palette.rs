//! Shared stroke palette.
//!
//! The wire format stores a 4-bit index into this table instead of a color
//! string. Encoder and decoder both read this single table; an index that
//! does not resolve falls back to entry 0.

/// Allowed stroke colors, in wire index order.
pub static PALETTE: [&str; 5] = ["#E31B44", "#ED4B92", "#A855F7", "#3B82F6", "#1E293B"];

/// Palette index of a color, or 0 when the color is not in the palette.
///
/// Hex digits compare case-insensitively.
pub fn color_index(color: &str) -> u8 {
    PALETTE
        .iter()
        .position(|entry| entry.eq_ignore_ascii_case(color))
        .map(|idx| idx as u8)
        .unwrap_or(0)
}

/// Color at a palette index, or entry 0 for indices past the table.
pub fn color_at(index: u8) -> &'static str {
    PALETTE
        .get(index as usize)
        .copied()
        .unwrap_or(PALETTE[0])
}
