//! Ramer-Douglas-Peucker stroke simplification.
//!
//! Recursion is replaced with an explicit stack of index ranges, so stack
//! usage does not grow with stroke length. A point survives when some range
//! containing it splits there; the result is the surviving points in their
//! original order, which is exactly what the recursive split-and-join form
//! produces.

use crate::model::Point;

/// Tolerance used by the encoder, in canvas units.
pub const DEFAULT_EPSILON: f64 = 2.5;

/// Simplify a stroke, keeping every point farther than `epsilon` from the
/// chord of the range it falls in.
///
/// Strokes of two points or fewer are returned unchanged. The first and last
/// points always survive.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end - start < 2 {
            continue;
        }

        let (index, dmax) = farthest_point(points, start, end);
        // index == start only when no interior point beat 0.0
        if dmax > epsilon && index > start {
            keep[index] = true;
            stack.push((index, end));
            stack.push((start, index));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

/// First interior point with the strictly greatest distance from the chord.
fn farthest_point(points: &[Point], start: usize, end: usize) -> (usize, f64) {
    let (a, b) = (&points[start], &points[end]);
    let mut index = start;
    let mut dmax = 0.0;
    for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
        let d = line_distance(p, a, b);
        if d > dmax {
            index = i;
            dmax = d;
        }
    }
    (index, dmax)
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
///
/// Falls back to the distance from `a` when the line is degenerate.
pub fn line_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    if dx == 0.0 && dy == 0.0 {
        return p.distance(a);
    }
    (dy * p.x - dx * p.y + b.x * a.y - b.y * a.x).abs() / dx.hypot(dy)
}
