use super::{Point2, Point3};

/// Computes the signed area of a 2D polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns true if the polygon winds counter-clockwise.
#[must_use]
pub fn is_counter_clockwise(points: &[Point2]) -> bool {
    signed_area_2d(points) > 0.0
}

/// Projects a 3D point onto the XZ floor plane.
///
/// Y is the vertical axis; floor capture happens on a horizontal surface, so
/// the planar coordinates are `(x, z)`.
#[must_use]
pub fn project_to_floor(point: &Point3) -> Point2 {
    Point2::new(point.x, point.z)
}

/// Projects a loop of 3D floor points onto the XZ plane.
#[must_use]
pub fn project_loop_to_floor(points: &[Point3]) -> Vec<Point2> {
    points.iter().map(project_to_floor).collect()
}
