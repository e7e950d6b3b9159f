use crate::error::PolygonError;
use crate::math::polygon_2d::{is_counter_clockwise, signed_area_2d};
use crate::math::triangle_2d::{orientation, point_in_triangle};
use crate::math::Point2;

/// Triangulates a simple 2D polygon by ear clipping.
///
/// Handles concave shapes and either input winding. The returned index
/// triples always wind counter-clockwise in the 2D plane of the input;
/// clockwise input is normalized by swapping the last two indices of every
/// triple, which flips winding without reordering the emitted triangles.
/// Which 3D facing that corresponds to is up to the caller and its
/// projection (see [`crate::extrude::ExtrudeRoom`] for the floor plane).
///
/// The input is assumed simple (see [`crate::polygon::FloorPolygon::validate`]).
/// If numerical degeneracy stalls the scan with no ear available, the
/// triangles clipped so far are returned together with one best-effort
/// closing triangle from the last three remaining indices and a warning is
/// logged. That closing triangle may be degenerate or overlapping on
/// pathological input; this path is a diagnostic, not a guarantee.
///
/// # Errors
///
/// Returns [`PolygonError::InsufficientPoints`] for fewer than 3 points.
#[allow(clippy::cast_possible_truncation)]
pub fn triangulate_polygon(points: &[Point2]) -> Result<Vec<[u32; 3]>, PolygonError> {
    let n = points.len();
    if n < 3 {
        return Err(PolygonError::InsufficientPoints { count: n });
    }

    // Convexity below is judged against the polygon's own winding; the
    // output is normalized to counter-clockwise at the end.
    let winding: i8 = if signed_area_2d(points) >= 0.0 { 1 } else { -1 };

    let mut remaining: Vec<u32> = (0..n as u32).collect();
    let mut triangles: Vec<[u32; 3]> = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let mut clipped = false;
        for i in 0..remaining.len() {
            let len = remaining.len();
            let prev = remaining[(i + len - 1) % len];
            let curr = remaining[i];
            let next = remaining[(i + 1) % len];

            if is_ear(points, &remaining, prev, curr, next, winding) {
                triangles.push([prev, curr, next]);
                remaining.remove(i);
                clipped = true;
                break;
            }
        }
        if !clipped {
            tracing::warn!(
                remaining = remaining.len(),
                "ear clipping stalled; emitting best-effort closing triangle"
            );
            break;
        }
    }

    let m = remaining.len();
    triangles.push([remaining[m - 3], remaining[m - 2], remaining[m - 1]]);

    if !is_counter_clockwise(points) {
        flip_winding(&mut triangles);
    }
    Ok(triangles)
}

/// An ear is a vertex whose triangle with its cyclic neighbours turns the
/// same way as the polygon and contains no other remaining vertex.
fn is_ear(points: &[Point2], remaining: &[u32], prev: u32, curr: u32, next: u32, winding: i8) -> bool {
    let a = &points[prev as usize];
    let b = &points[curr as usize];
    let c = &points[next as usize];

    if orientation(a, b, c) != winding {
        return false;
    }

    for &other in remaining {
        if other == prev || other == curr || other == next {
            continue;
        }
        if point_in_triangle(&points[other as usize], a, b, c) {
            return false;
        }
    }
    true
}

/// Reverses the winding of every triangle in place by swapping its last two
/// indices. Used to normalize clockwise floor output and to mirror the
/// floor triangulation into a downward-facing ceiling.
pub fn flip_winding(triangles: &mut [[u32; 3]]) {
    for tri in triangles {
        tri.swap(1, 2);
    }
}
