use super::{Point2, TOLERANCE};

/// Sign of the 2D cross product of `(b - a)` and `(c - a)`.
///
/// Returns `1` for a counter-clockwise turn, `-1` for clockwise, and `0`
/// when the three points are collinear within [`TOLERANCE`].
#[must_use]
pub fn orientation(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    let cross = cross_2d(a, b, c);
    if cross > TOLERANCE {
        1
    } else if cross < -TOLERANCE {
        -1
    } else {
        0
    }
}

/// 2D cross product of `(b - a)` and `(c - a)`.
#[must_use]
pub fn cross_2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Returns true if `p` lies strictly inside triangle `abc`.
///
/// All three edge cross products must agree strictly in sign, so a point
/// exactly on an edge or vertex is reported as outside. Works for either
/// triangle winding.
#[must_use]
pub fn point_in_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let s0 = cross_2d(a, b, p);
    let s1 = cross_2d(b, c, p);
    let s2 = cross_2d(c, a, p);
    (s0 > 0.0 && s1 > 0.0 && s2 > 0.0) || (s0 < 0.0 && s1 < 0.0 && s2 < 0.0)
}
