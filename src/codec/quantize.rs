//! Coordinate quantization and style packing.
//!
//! Each coordinate on the 800-unit canvas maps to one byte; dequantization
//! returns the low edge of the bucket, so the per-axis error is below one
//! bucket width (`800 / 255`). Style packing is exact.

use crate::model::{Point, CANVAS_SIZE};

/// Largest quantized value
pub const QUANT_MAX: f64 = 255.0;

/// Upper bound on the per-axis round-trip error, in canvas units.
pub const MAX_AXIS_ERROR: f64 = CANVAS_SIZE / QUANT_MAX;

/// Largest encodable brush width
pub const MAX_WIDTH: u8 = 15;

/// Quantize one coordinate to a byte.
///
/// Values outside the canvas saturate; non-finite values map to 0.
pub fn quantize_coord(v: f64) -> u8 {
    let q = (v / CANVAS_SIZE * QUANT_MAX).floor();
    if q.is_nan() {
        return 0;
    }
    q.clamp(0.0, QUANT_MAX) as u8
}

/// Map a quantized byte back to canvas units
pub fn dequantize_coord(q: u8) -> f64 {
    f64::from(q) / QUANT_MAX * CANVAS_SIZE
}

/// Quantize a point to an `(x, y)` byte pair
pub fn quantize(point: &Point) -> (u8, u8) {
    (quantize_coord(point.x), quantize_coord(point.y))
}

/// Map a byte pair back to a point
pub fn dequantize(x: u8, y: u8) -> Point {
    Point::new(dequantize_coord(x), dequantize_coord(y))
}

/// Pack a palette index (high nibble) and width (low nibble).
///
/// Both inputs are masked to four bits; callers clamp width first.
pub fn pack_style(color_index: u8, width: u8) -> u8 {
    ((color_index & 0x0f) << 4) | (width & 0x0f)
}

/// Split a style byte into `(color_index, width)`
pub fn unpack_style(byte: u8) -> (u8, u8) {
    ((byte >> 4) & 0x0f, byte & 0x0f)
}

/// Truncate a brush width to the encodable range
pub fn clamp_width(width: u32) -> u8 {
    width.min(u32::from(MAX_WIDTH)) as u8
}
