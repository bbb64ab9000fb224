//! Geometry primitives
//!
//! Angle-at-vertex and scaled Euclidean distance over landmark points.

use crate::types::Landmark;

/// Angle at vertex `b` between rays `b→a` and `b→c`, in degrees within [0, 180].
///
/// Returns 0° when either ray has zero length, so coincident points read as a
/// fully bent joint instead of producing NaN.
pub fn angle(a: Landmark, b: Landmark, c: Landmark) -> f64 {
    let (ux, uy) = (a.x - b.x, a.y - b.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);

    let norms = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
    if norms == 0.0 || !norms.is_finite() {
        return 0.0;
    }

    let cosine = ((ux * vx + uy * vy) / norms).clamp(-1.0, 1.0);
    cosine.acos().to_degrees()
}

/// Euclidean distance between two landmarks after mapping normalized
/// coordinates onto a `scale`-sized reference grid.
pub fn distance(points: [Landmark; 2], scale: f64) -> f64 {
    let [p, q] = points;
    let dx = (q.x - p.x) * scale;
    let dy = (q.y - p.y) * scale;
    dx.hypot(dy)
}
