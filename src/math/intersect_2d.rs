use super::{Point2, TOLERANCE};

/// Proper crossing test for two open 2D segments.
///
/// Solves the parametric system `a0 + ua * (a1 - a0) = b0 + ub * (b1 - b0)`
/// and reports a crossing only when `0 < ua < 1` and `0 < ub < 1`, so shared
/// endpoints and mere touching do not count. A near-zero denominator
/// (parallel or collinear segments) reports no intersection; collinear
/// overlapping segments are deliberately not flagged.
#[must_use]
pub fn segments_properly_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let da_x = a1.x - a0.x;
    let da_y = a1.y - a0.y;
    let db_x = b1.x - b0.x;
    let db_y = b1.y - b0.y;

    let denominator = da_x * db_y - da_y * db_x;
    if denominator.abs() < TOLERANCE {
        return false;
    }

    let dx = a0.x - b0.x;
    let dy = a0.y - b0.y;
    let ua = (db_x * dy - db_y * dx) / denominator;
    let ub = (da_x * dy - da_y * dx) / denominator;

    ua > 0.0 && ua < 1.0 && ub > 0.0 && ub < 1.0
}
